//! Bit-exact constants shared across the simulation core.
//!
//! Kept in one place because several source versions of the emulated chip
//! disagree on the idle-word patterns (`0xAAAAAAAA` vs `0xACCCCCCC`); this
//! module pins the set used here and [`crate::config::RunConfig`] exposes
//! them as overridable configuration rather than baking in a single choice.

/// BX per orbit (LHC revolution period).
pub const ORBIT_LAST: u32 = 3564;
/// BX value the bunch counter resets to on a BCR.
pub const ORBIT_BCR: u32 = ORBIT_LAST - 50;
/// Number of parallel electrical links (e-links) per ROC.
pub const NELINKS: usize = 12;
/// Words per readout packet: HDR, CM, CH0..CH36, CRC, IDLE.
pub const NWORDS: usize = 41;
/// Pipeline delay applied to the fast-command channel before output.
pub const FASTCMD_INTERNAL_LATENCY: u32 = 7;

/// Default non-BC0 idle pattern.
pub const IDLEWORD: u32 = 0xAAAA_AAAA;
/// Default BC0 idle pattern (marks bunch 0).
pub const IDLEWORD_BC0: u32 = 0x9AAA_AAAA;
/// All-ones pattern used in the closing framing row.
pub const ONEWORD: u32 = 0xFFFF_FFFF;
/// The packet's own trailing `IDLE` word (word 40 of the packet layout),
/// distinct from the idle patterns emitted between readouts.
pub const IDLE_TRAILER: u32 = 0xACCC_CCCC;

/// Non-reflected CRC-32 polynomial, textbook (degree-33) form.
pub const CRC_POLY: u32 = 0x04C1_1DB7;

/// BX countdown armed by a LinkResetROCD fast command.
pub const LINK_RESET_ROCD_IDLE_BX: u32 = 400;

/// Channels per readout packet (CH0..CH36).
pub const NCHANNELS: usize = 37;

/// How many preceding emitted words on a link feed the CRC.
pub const CRC_WINDOW: usize = 39;
