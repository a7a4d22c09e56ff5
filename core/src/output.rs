//! Output assembly: turns the per-BX word stream plus the optional framing
//! rows into an ordered sequence the frontend serializes. No I/O happens
//! here — `core` only ever builds this structure in memory.

use crate::constants::{NELINKS, ONEWORD};
use crate::timing::command::{FastCommand, Word};

/// One data-region row: a sample taken at global BX `clk_n`.
#[derive(Debug, Clone)]
pub struct DataRow {
    pub clk_n: u32,
    pub reset_b: bool,
    pub soft_reset_b: bool,
    pub links: [Word; NELINKS],
    pub command: FastCommand,
}

/// A framing row: the start/reset/finish rows written around the main data
/// loop. These carry no `CLK_N` — they sit outside the BX-indexed stream
/// entirely.
#[derive(Debug, Clone)]
pub struct FramingRow {
    pub reset_b: bool,
    pub soft_reset_b: bool,
    pub links: [Word; NELINKS],
    pub command: FastCommand,
}

#[derive(Debug, Clone)]
pub enum OutputRow {
    Framing(FramingRow),
    Data(DataRow),
}

/// Ordered sequence of output rows for one run.
pub struct OutputAssembler {
    pub rows: Vec<OutputRow>,
}

impl OutputAssembler {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// The opening framing row: `(RESET_B=1, SOFT_RESET_B=1, links=idle, IDLE)`.
    pub fn push_framing_start(&mut self, idle_word: Word) {
        self.rows.push(OutputRow::Framing(FramingRow {
            reset_b: true,
            soft_reset_b: true,
            links: [idle_word; NELINKS],
            command: FastCommand::Idle,
        }));
    }

    /// Three `(RESET_B=0, SOFT_RESET_B=1, links=idle, IDLE)` reset rows.
    pub fn push_framing_resets(&mut self, idle_word: Word) {
        for _ in 0..3 {
            self.rows.push(OutputRow::Framing(FramingRow {
                reset_b: false,
                soft_reset_b: true,
                links: [idle_word; NELINKS],
                command: FastCommand::Idle,
            }));
        }
    }

    /// The closing framing row: `(RESET_B=1, SOFT_RESET_B=1, links=ONEWORD, ALLONE)`.
    pub fn push_framing_finish(&mut self) {
        self.rows.push(OutputRow::Framing(FramingRow {
            reset_b: true,
            soft_reset_b: true,
            links: [ONEWORD; NELINKS],
            command: FastCommand::AllOne,
        }));
    }

    pub fn push_data(&mut self, clk_n: u32, links: [Word; NELINKS], command: FastCommand) {
        self.rows.push(OutputRow::Data(DataRow {
            clk_n,
            reset_b: true,
            soft_reset_b: true,
            links,
            command,
        }));
    }

    /// Iterate only the data rows, in order.
    pub fn data_rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter().filter_map(|r| match r {
            OutputRow::Data(d) => Some(d),
            OutputRow::Framing(_) => None,
        })
    }
}

impl Default for OutputAssembler {
    fn default() -> Self {
        Self::new()
    }
}
