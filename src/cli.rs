use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "timemap")]
#[command(about = "Build scene/subtitle timemaps from narrated audio chunks.")]
pub struct Args {
    /// Path to config TOML (defaults to ./timemap.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe chunks and write <final-audio>.timemap.json
    Build(BuildCmd),
    /// Show how a piece of text would be split into cues
    Segment(SegmentCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct BuildCmd {
    /// JSON file with the scenes (array, or object with a "scenes" array), or '-' for stdin
    #[arg(long)]
    pub scenes: String,

    /// Per-scene audio chunk, in scene order; repeat once per scene
    #[arg(long = "chunk", required = false)]
    pub chunks: Vec<PathBuf>,

    /// Where the merged audio lives (or will live)
    #[arg(long)]
    pub final_audio: String,

    /// Also write subtitles next to the final audio
    #[arg(long, value_enum)]
    pub export: Vec<ExportFormat>,

    /// Allow overwriting existing subtitle exports
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct SegmentCmd {
    /// Scene text, or '-' for stdin
    pub text: String,

    /// Also allocate cues over this many seconds
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Srt,
    Vtt,
    Tsv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Srt => "srt",
            ExportFormat::Vtt => "vtt",
            ExportFormat::Tsv => "tsv",
        }
    }
}
