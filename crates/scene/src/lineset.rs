/// Flat line-segment buffers in the layout debug overlays produce them:
/// interleaved endpoint positions (three floats each) and RGBA colors (four
/// floats each), two entries per segment.
#[derive(Debug, Clone, Default)]
pub struct LineSet {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole buffer. Callers hand in per-frame data; nothing is
    /// retained across calls.
    pub fn replace(&mut self, positions: &[f32], colors: &[f32]) {
        debug_assert_eq!(positions.len() % 6, 0, "positions must hold whole segments");
        debug_assert_eq!(colors.len() % 8, 0, "colors must hold whole segments");
        debug_assert_eq!(positions.len() / 3, colors.len() / 4);
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.colors.clear();
        self.colors.extend_from_slice(colors);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn segment_count(&self) -> usize {
        self.vertex_count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let lines = LineSet::new();
        assert!(lines.is_empty());
        assert_eq!(lines.segment_count(), 0);
    }

    #[test]
    fn replace_swaps_contents_wholesale() {
        let mut lines = LineSet::new();
        lines.replace(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
        );
        assert_eq!(lines.segment_count(), 1);
        assert_eq!(lines.vertex_count(), 2);

        lines.replace(&[], &[]);
        assert!(lines.is_empty());
    }

    #[test]
    fn replace_does_not_accumulate() {
        let mut lines = LineSet::new();
        let positions = [0.0; 12];
        let colors = [0.5; 16];
        lines.replace(&positions, &colors);
        lines.replace(&positions, &colors);
        assert_eq!(lines.segment_count(), 2);
        assert_eq!(lines.positions().len(), 12);
        assert_eq!(lines.colors().len(), 16);
    }
}
