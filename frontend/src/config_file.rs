//! Optional TOML config file. CLI flags always take priority over a loaded
//! file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub n: Option<u32>,
    pub bx_start: Option<u32>,
    pub delay: Option<u32>,

    pub bcr: bool,
    pub missing_bcr: bool,
    pub extra_bcr: bool,

    pub ecr: bool,
    pub ecr_bx: Vec<u32>,

    pub ocr: bool,
    pub ocr_bx: Vec<u32>,

    pub ebr: bool,
    pub ebr_bx: Vec<u32>,

    pub link_reset_rocd_bx: Vec<u32>,
    pub link_reset_econd_bx: Vec<u32>,

    pub l1a_bx: Vec<u32>,
    pub l1a_program: Vec<String>,
    pub l1a_start: Option<u32>,

    pub ham_err_rate: Option<f64>,
    pub no_framing: bool,

    pub payload_mode: Option<String>,
    pub physics_table: Option<PathBuf>,
    pub event_numbers: Vec<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        toml::from_str(&text).map_err(|e| format!("failed to parse config {}: {e}", path.display()))
    }
}
