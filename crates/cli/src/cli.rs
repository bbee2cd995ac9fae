//! Command-line surface (spec.md §6).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "east-asian-spacing", version)]
#[command(about = "Add chws/vchw/halt/vhal GPOS spacing features to CJK fonts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by `build` and `noto` (spec.md §6's flag table).
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Input font files or directories (searched recursively).
    pub inputs: Vec<PathBuf>,

    /// Output directory.
    #[arg(short = 'o', long)]
    pub out_dir: PathBuf,

    /// TTC face indices to process; others are copied unchanged.
    /// Comma-separated, e.g. `--index=0,1`.
    #[arg(long, value_delimiter = ',')]
    pub index: Option<Vec<u32>>,

    /// Per-face language tag(s): JAN, KOR, ZHS, ZHT. Comma-separated,
    /// aligned positionally with `--index`.
    #[arg(long, value_delimiter = ',')]
    pub language: Option<Vec<String>>,

    /// Dump final L/R/M/F glyph sets to text files in this directory.
    #[arg(long)]
    pub glyphs: Option<PathBuf>,

    /// Print input<TAB>output path pairs to stdout, for piping.
    #[arg(short = 'p', long = "path-out")]
    pub path_out: bool,

    /// FeatureTester level: 0=off, 1=smoke, 2=exhaustive.
    #[arg(long, default_value_t = 1)]
    pub test: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process the given font files or directories directly.
    Build(BuildArgs),

    /// Auto-derive `--index`/`--language` from Noto CJK filenames and
    /// skip files whose name contains "Mono".
    Noto(BuildArgs),

    /// Developer tooling: diff two outputs for regression testing.
    #[command(subcommand)]
    Dev(DevCommands),
}

#[derive(Subcommand)]
pub enum DevCommands {
    /// Compare two `-glyphs` sidecar files or two font outputs,
    /// reporting the first difference.
    Diff {
        left: PathBuf,
        right: PathBuf,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build(args) => crate::pipeline::run_build(args, false),
            Commands::Noto(args) => crate::pipeline::run_build(args, true),
            Commands::Dev(DevCommands::Diff { left, right }) => crate::diff::run(&left, &right),
        }
    }
}
