//! Command-line surface, one flag per [`roc_core::config::RunConfig`]
//! field, kebab-cased from the original prototype's `argparse` flag names.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "roc-emu", about = "Deterministic HGCROC -> ECON-D stream emulator")]
pub struct Cli {
    /// Optional TOML config file; CLI flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output CSV path. Defaults to a name derived from the run parameters.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub n: Option<u32>,
    #[arg(long = "bx-start")]
    pub bx_start: Option<u32>,
    #[arg(long)]
    pub delay: Option<u32>,

    #[arg(long)]
    pub bcr: bool,
    #[arg(long = "missing-bcr")]
    pub missing_bcr: bool,
    #[arg(long = "extra-bcr")]
    pub extra_bcr: bool,

    #[arg(long)]
    pub ecr: bool,
    #[arg(long = "ecr-bx", value_delimiter = ',')]
    pub ecr_bx: Vec<u32>,

    #[arg(long)]
    pub ocr: bool,
    #[arg(long = "ocr-bx", value_delimiter = ',')]
    pub ocr_bx: Vec<u32>,

    #[arg(long)]
    pub ebr: bool,
    #[arg(long = "ebr-bx", value_delimiter = ',')]
    pub ebr_bx: Vec<u32>,

    #[arg(long = "link-reset-rocd-bx", value_delimiter = ',')]
    pub link_reset_rocd_bx: Vec<u32>,
    #[arg(long = "link-reset-econd-bx", value_delimiter = ',')]
    pub link_reset_econd_bx: Vec<u32>,

    /// Explicit L1A BXs, comma-separated. Takes priority over `--l1a-program`.
    #[arg(long = "l1a-bx", value_delimiter = ',')]
    pub l1a_bx: Vec<u32>,

    /// Program entries of the form `fixed:<count|*>:<freq>` or `random:<freq>`,
    /// repeatable, applied in order.
    #[arg(long = "l1a-program")]
    pub l1a_program: Vec<String>,
    #[arg(long = "l1a-start")]
    pub l1a_start: Option<u32>,

    #[arg(long = "ham-err-rate")]
    pub ham_err_rate: Option<f64>,

    /// Suppress the start/reset/finish framing rows (on by default).
    #[arg(long = "no-framing")]
    pub no_framing: bool,

    #[arg(long = "payload-mode")]
    pub payload_mode: Option<String>,
    #[arg(long = "physics-table")]
    pub physics_table: Option<PathBuf>,
    #[arg(long = "event-numbers", value_delimiter = ',')]
    pub event_numbers: Vec<u64>,
}
