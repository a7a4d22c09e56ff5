//! The configuration surface: everything a caller can set to shape one run
//! of the ROC emulator. Plain data, validated up front in
//! [`RunConfig::validate`] so no configuration error can surface mid-BX.

use crate::constants::{IDLEWORD, IDLEWORD_BC0};

/// Fallback L1A frequency used when a program entry specifies zero.
const DEFAULT_L1A_FREQ: u32 = 53;

/// One entry of an L1A placement program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L1AProgramEntry {
    /// `BX = k * freq` for `k` drawn from a running counter shared across
    /// the whole program. `count = None` means "fill to `N`".
    Fixed { count: Option<u32>, freq: u32 },
    /// `Poisson((N - l1a_start) / freq)` distinct BXs drawn without
    /// replacement from `[l1a_start, N)`.
    Random { freq: u32 },
}

/// How L1A BXs are scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L1ASpec {
    /// An explicit, caller-supplied list of global BXs.
    Explicit(Vec<u32>),
    /// A program of fixed/random entries, processed in order.
    Program {
        entries: Vec<L1AProgramEntry>,
        l1a_start: u32,
    },
}

impl Default for L1ASpec {
    fn default() -> Self {
        L1ASpec::Program {
            entries: Vec::new(),
            l1a_start: 0,
        }
    }
}

/// The full configuration surface for one emulator run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Nominal length of the stream in BX. The run may extend past this to
    /// finish draining the event queue.
    pub n: u32,
    /// First `CLK_N` value / first global BX processed.
    pub bx_start: u32,
    /// BX latency from L1A acceptance to the start of its readout.
    pub delay: u32,

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

    pub l1a: L1ASpec,

    /// Probability of header Hamming-bit injection, `[0.0, 1.0]`.
    pub ham_err_rate: f64,

    /// Idle word patterns (Design Note: these vary between source versions;
    /// exposed as configuration rather than hard-coded).
    pub idle_word: u32,
    pub idle_word_bc0: u32,

    /// Whether to emit the start/reset/finish framing rows alongside the
    /// per-BX data rows. On by default.
    pub include_framing: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n: 10_000,
            bx_start: 0,
            delay: 7,
            bcr: false,
            missing_bcr: false,
            extra_bcr: false,
            ecr: false,
            ecr_bx: Vec::new(),
            ocr: false,
            ocr_bx: Vec::new(),
            ebr: false,
            ebr_bx: Vec::new(),
            link_reset_rocd_bx: Vec::new(),
            link_reset_econd_bx: Vec::new(),
            l1a: L1ASpec::default(),
            ham_err_rate: 0.0,
            idle_word: IDLEWORD,
            idle_word_bc0: IDLEWORD_BC0,
            include_framing: true,
        }
    }
}

impl RunConfig {
    /// Validate the configuration surface, correcting malformed fields to
    /// documented defaults and reporting the correction rather than
    /// aborting the run.
    pub fn validate(mut self) -> Self {
        if self.n == 0 {
            let default_n = RunConfig::default().n;
            eprintln!("warning: N must be nonzero, falling back to {default_n}");
            self.n = default_n;
        }
        if !(0.0..=1.0).contains(&self.ham_err_rate) {
            eprintln!(
                "warning: hamErrRate {} out of [0,1], clamping",
                self.ham_err_rate
            );
            self.ham_err_rate = self.ham_err_rate.clamp(0.0, 1.0);
        }
        if let L1ASpec::Program { entries, .. } = &mut self.l1a {
            for entry in entries.iter_mut() {
                let freq = match entry {
                    L1AProgramEntry::Fixed { freq, .. } => freq,
                    L1AProgramEntry::Random { freq } => freq,
                };
                if *freq == 0 {
                    eprintln!(
                        "warning: L1A frequency must be nonzero, falling back to {DEFAULT_L1A_FREQ}"
                    );
                    *freq = DEFAULT_L1A_FREQ;
                }
            }
        }
        self
    }
}
