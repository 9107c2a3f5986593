use anyhow::Result;
use clap::Parser;

mod allocate;
mod cli;
mod config;
mod formats;
mod model;
mod pipeline;
mod probe;
mod segment;
mod timemap;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "timemap starting");

    match args.command {
        cli::Command::Build(cmd) => pipeline::run_build(cmd, &cfg),
        cli::Command::Segment(cmd) => pipeline::run_segment(cmd, &cfg),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
