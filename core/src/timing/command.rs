use std::fmt;

/// Fast command issued to the ROC on a single global BX.
///
/// Variant names match the symbolic `FASTCMD_*` tokens the original
/// firmware tooling emits on the command channel (see [`FastCommand`]'s
/// `Display` impl), not the DAQ-side enum names used elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FastCommand {
    #[default]
    Idle,
    L1A,
    Bcr,
    Ocr,
    BcrOcr,
    Ecr,
    Ebr,
    LinkResetRocd,
    LinkResetEcond,
    AllOne,
}

impl fmt::Display for FastCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "FASTCMD_IDLE",
            Self::L1A => "FASTCMD_L1A",
            Self::Bcr => "FASTCMD_BCR",
            Self::Ocr => "FASTCMD_OCR",
            Self::BcrOcr => "FASTCMD_BCR_OCR",
            Self::Ecr => "FASTCMD_ECR",
            Self::Ebr => "FASTCMD_EBR",
            Self::LinkResetRocd => "FASTCMD_LINKRESET_ROCD",
            Self::LinkResetEcond => "FASTCMD_LINKRESET_ECOND",
            Self::AllOne => "FASTCMD_ALLONE",
        };
        f.write_str(s)
    }
}

/// Identifies one of the twelve parallel e-links, `[0, NELINKS)`.
pub type LinkId = usize;

/// A single 32-bit word carried on one e-link for one BX.
pub type Word = u32;

/// Packet word positions, in emission order, for one readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSlot {
    Hdr,
    Cm,
    Channel(u8), // 0..=36
    Crc,
    Idle,
}

impl WordSlot {
    /// Word-slot layout for one `NWORDS`-long readout, indexed by word cursor.
    pub fn layout() -> [WordSlot; crate::constants::NWORDS] {
        let mut slots = [WordSlot::Idle; crate::constants::NWORDS];
        slots[0] = WordSlot::Hdr;
        slots[1] = WordSlot::Cm;
        for (ch, slot) in slots[2..2 + crate::constants::NCHANNELS].iter_mut().enumerate() {
            *slot = WordSlot::Channel(ch as u8);
        }
        slots[2 + crate::constants::NCHANNELS] = WordSlot::Crc;
        slots[3 + crate::constants::NCHANNELS] = WordSlot::Idle;
        slots
    }
}
