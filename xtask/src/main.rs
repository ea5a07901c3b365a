use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for kinesis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests, and doc in sequence
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the frame benchmarks for the sync crate
    Bench,
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"];
const TEST: &[&str] = &["test", "--workspace"];
const DOC: &[&str] = &["doc", "--workspace", "--no-deps"];
const BUILD: &[&str] = &["build", "--workspace"];
const BENCH: &[&str] = &["bench", "-p", "kinesis-sync"];

const CHECK_STEPS: [&[&str]; 4] = [FMT, CLIPPY, TEST, DOC];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in CHECK_STEPS {
                run(step)?;
            }
            Ok(())
        }
        Commands::Fmt => run(FMT),
        Commands::Clippy => run(CLIPPY),
        Commands::Test => run(TEST),
        Commands::Doc => run(DOC),
        Commands::Build => run(BUILD),
        Commands::Bench => run(BENCH),
    }
}

fn run(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    anyhow::ensure!(status.success(), "cargo {} failed", args[0]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_runs_fmt_before_the_expensive_steps() {
        assert_eq!(CHECK_STEPS[0], FMT);
        assert!(CHECK_STEPS.contains(&TEST));
    }

    #[test]
    fn every_task_names_a_cargo_subcommand() {
        for task in [FMT, CLIPPY, TEST, DOC, BUILD, BENCH] {
            assert!(!task.is_empty());
        }
    }
}
