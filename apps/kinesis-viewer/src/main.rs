use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec3;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use kinesis_render_wgpu::WgpuSceneRenderer;
use kinesis_scene::OrbitCamera;
use kinesis_sync::rig::{spawn_rig, RigHandles, RigMeshes};
use kinesis_sync::{BindingId, FrameReport, PhysicsStage, SimulationClock};

#[derive(Parser)]
#[command(name = "kinesis-viewer", about = "Interactive rigid-body demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Largest timestep one frame may consume, in seconds
    #[arg(long, default_value = "0.1")]
    max_step: f32,

    /// Upward impulse magnitude applied to picked bodies
    #[arg(long, default_value = "5.0")]
    impulse: f32,

    /// Vertical gravity, in m/s^2
    #[arg(long, default_value = "-9.81", allow_hyphen_values = true)]
    gravity: f32,
}

/// Simulation-side state, independent of the GPU objects.
struct AppState {
    stage: PhysicsStage,
    meshes: RigMeshes,
    handles: Option<RigHandles>,
    camera: OrbitCamera,
    clock: SimulationClock,
    paused: bool,
    show_panel: bool,
    impulse_magnitude: f32,
    last_report: Option<FrameReport>,
    last_error: Option<String>,
    cursor: (f32, f32),
    orbiting: bool,
}

impl AppState {
    fn new(cli: &Cli) -> Self {
        let mut stage = PhysicsStage::with_gravity(Vec3::new(0.0, cli.gravity, 0.0));
        stage.step_config.max_step = cli.max_step;
        stage.pick_config.impulse = Vec3::new(0.0, cli.impulse, 0.0);
        Self {
            stage,
            meshes: RigMeshes::generate(),
            handles: None,
            camera: OrbitCamera::default(),
            clock: SimulationClock::new(),
            paused: false,
            show_panel: true,
            impulse_magnitude: cli.impulse,
            last_report: None,
            last_error: None,
            cursor: (0.0, 0.0),
            orbiting: false,
        }
    }

    /// Advance the simulation by the elapsed wall time. A failed frame keeps
    /// the previous poses and is surfaced in the panel instead of crashing
    /// the loop.
    fn update(&mut self) {
        let raw_dt = self.clock.tick();
        if self.paused {
            return;
        }
        match self.stage.frame(raw_dt) {
            Ok(report) => {
                self.last_report = Some(report);
                self.last_error = None;
            }
            Err(err) => {
                tracing::error!("frame skipped: {err}");
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            // Don't feed the pause into the next step.
            self.clock.reset();
        }
        self.paused = paused;
    }

    fn click(&mut self, width: f32, height: f32) {
        let (x, y) = self.cursor;
        match self.stage.pointer_event(x, y, width, height, &self.camera) {
            Some(binding) => tracing::debug!(binding = ?binding.id, "picked body"),
            None => tracing::debug!("pick missed"),
        }
    }

    /// Tear the rig down and drop it from the spawn height again.
    fn respawn(&mut self) {
        let Some(handles) = self.handles else {
            return;
        };
        let ids: Vec<BindingId> = self.stage.registry().bindings().map(|b| b.id).collect();
        for id in ids {
            if let Err(err) = self.stage.despawn(id) {
                tracing::error!("despawn failed: {err}");
            }
        }
        if let Err(err) = spawn_rig(&mut self.stage, &self.meshes, &handles) {
            tracing::error!("respawn failed: {err}");
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }
        match key {
            KeyCode::Space => self.set_paused(!self.paused),
            KeyCode::KeyR => self.respawn(),
            KeyCode::F1 => self.show_panel = !self.show_panel,
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::SidePanel::left("stage_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Kinesis");
                ui.separator();

                match self.last_report {
                    Some(report) => {
                        ui.label(format!(
                            "dt raw {:.1} ms / stepped {:.1} ms",
                            report.step.raw_dt * 1000.0,
                            report.step.dt * 1000.0
                        ));
                        ui.label(format!(
                            "synced {} proxies, {} overlay segments",
                            report.synced, report.overlay_segments
                        ));
                    }
                    None => {
                        ui.label("no frame yet");
                    }
                }
                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, format!("frame error: {err}"));
                }
                ui.separator();

                ui.checkbox(&mut self.stage.overlay_enabled, "Collider wireframe");

                let mut paused = self.paused;
                if ui.checkbox(&mut paused, "Pause (Space)").changed() {
                    self.set_paused(paused);
                }
                if ui.button("Respawn bodies (R)").clicked() {
                    self.respawn();
                }

                ui.add(
                    egui::Slider::new(&mut self.impulse_magnitude, 0.0..=20.0)
                        .text("pick impulse"),
                );
                self.stage.pick_config.impulse = Vec3::new(0.0, self.impulse_magnitude, 0.0);

                ui.separator();
                ui.heading("Bodies");
                for binding in self.stage.registry().bindings() {
                    let Some(proxy) = self.stage.scene().get(binding.proxy) else {
                        continue;
                    };
                    let pos = proxy.transform.position;
                    ui.label(format!(
                        "#{} ({:.2}, {:.2}, {:.2})",
                        binding.id.0, pos.x, pos.y, pos.z
                    ));
                }

                ui.separator();
                ui.small("LMB: launch body | RMB drag: orbit | scroll: zoom | F1: panel");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuSceneRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Kinesis")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("kinesis_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.camera.set_viewport(size.width, size.height);

        let mut renderer = WgpuSceneRenderer::new(&device, surface_format, size.width, size.height);

        // Upload the rig meshes once, then drop the bodies into the scene.
        let meshes = &self.state.meshes;
        let handles = RigHandles {
            cube: renderer.register_mesh(&device, &meshes.cube),
            sphere: renderer.register_mesh(&device, &meshes.sphere),
            cylinder: renderer.register_mesh(&device, &meshes.cylinder),
            icosahedron: renderer.register_mesh(&device, &meshes.icosahedron),
            torus: renderer.register_mesh(&device, &meshes.torus),
            floor: renderer.register_mesh(&device, &meshes.floor),
        };
        self.state.handles = Some(handles);
        spawn_rig(&mut self.state.stage, &self.state.meshes, &handles).expect("spawn demo rig");
        self.state.clock.reset();

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.camera.set_viewport(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if let Some(config) = &self.config {
                    self.state
                        .click(config.width as f32, config.height as f32);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.orbiting = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                };
                self.state.camera.zoom(amount);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        self.state.stage.scene(),
                        self.state.stage.overlay(),
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                ..Default::default()
                            })
                            .forget_lifetime();
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.orbiting {
                self.state.camera.orbit(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("kinesis-viewer starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(&cli));
    event_loop.run_app(&mut app)?;

    Ok(())
}
