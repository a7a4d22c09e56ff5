//! Physics payload: channel words from a precomputed table indexed by
//! `(eventNumber, linkId)`, with columns `entry`, `eLink`, `CH0..CH36`.

use std::collections::HashMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use roc_core::constants::NCHANNELS;
use roc_core::core::PayloadSource;
use roc_core::error::{ConfigError, RocError};

use crate::provider::EventSelection;

/// One physics event's 37 channel words per link, loaded from a CSV table
/// with columns `entry, eLink, CH0, CH1, ..., CH36`.
pub struct PhysicsTable {
    rows: HashMap<(u64, usize), [u32; NCHANNELS]>,
}

impl PhysicsTable {
    pub fn load(path: &Path) -> Result<Self, RocError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| {
                RocError::Config(ConfigError::Invalid(format!(
                    "failed to open physics table {}: {e}",
                    path.display()
                )))
            })?;

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                RocError::Config(ConfigError::Invalid(format!("malformed physics table row: {e}")))
            })?;
            let entry: u64 = record
                .get(0)
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| RocError::Config(ConfigError::Invalid("missing entry column".into())))?;
            let elink: usize = record
                .get(1)
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| RocError::Config(ConfigError::Invalid("missing eLink column".into())))?;

            let mut channels = [0u32; NCHANNELS];
            for (ch, slot) in channels.iter_mut().enumerate() {
                let raw = record.get(2 + ch).ok_or_else(|| {
                    RocError::Config(ConfigError::Invalid(format!("missing CH{ch} column")))
                })?;
                *slot = parse_word(raw)?;
            }
            rows.insert((entry, elink), channels);
        }
        Ok(Self { rows })
    }

    /// All distinct event numbers present in the table, sorted.
    pub fn available_events(&self) -> Vec<u64> {
        let mut events: Vec<u64> = self.rows.keys().map(|(e, _)| *e).collect();
        events.sort_unstable();
        events.dedup();
        events
    }

    fn word(&self, event: u64, link: usize, channel: u8) -> Option<u32> {
        self.rows.get(&(event, link)).map(|chs| chs[channel as usize])
    }
}

fn parse_word(raw: &str) -> Result<u32, RocError> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse::<u32>(),
    };
    parsed.map_err(|_| RocError::Config(ConfigError::Invalid(format!("malformed word '{raw}'"))))
}

/// Selects and caches one table event number per accepted readout, then
/// answers channel lookups against it.
pub struct PhysicsPayloadSource {
    table: PhysicsTable,
    selection: EventSelection,
    available: Vec<u64>,
    explicit_cursor: usize,
    assigned: HashMap<u64, u64>,
}

impl PhysicsPayloadSource {
    pub fn new(table: PhysicsTable, selection: EventSelection) -> Self {
        let available = table.available_events();
        if available.is_empty() {
            eprintln!("warning: physics table contains no events; all channel lookups will emit zero");
        }

        let selection = match selection {
            EventSelection::Explicit(wanted) => {
                let mut kept = Vec::new();
                for ev in wanted {
                    if available.contains(&ev) {
                        kept.push(ev);
                    } else {
                        eprintln!("warning: physics event {ev} absent from table, dropping");
                    }
                }
                if kept.is_empty() {
                    eprintln!(
                        "warning: all explicitly-requested physics events were missing from the table, falling back to random selection"
                    );
                    EventSelection::Random
                } else {
                    EventSelection::Explicit(kept)
                }
            }
            EventSelection::Random => EventSelection::Random,
        };

        Self {
            table,
            selection,
            available,
            explicit_cursor: 0,
            assigned: HashMap::new(),
        }
    }

    /// Resolve (and cache) the table event number for `source_event_index`,
    /// so repeated channel lookups for the same accepted readout agree.
    fn event_number_for(&mut self, source_event_index: u64) -> u64 {
        if let Some(&ev) = self.assigned.get(&source_event_index) {
            return ev;
        }
        let ev = match &mut self.selection {
            EventSelection::Random => {
                let mut rng = StdRng::seed_from_u64(source_event_index);
                self.available.choose(&mut rng).copied().unwrap_or(0)
            }
            EventSelection::Explicit(list) => {
                let ev = list[self.explicit_cursor % list.len()];
                self.explicit_cursor += 1;
                ev
            }
        };
        self.assigned.insert(source_event_index, ev);
        ev
    }
}

impl PayloadSource for PhysicsPayloadSource {
    fn word(&mut self, event_index: u64, link: usize, channel: u8) -> u32 {
        let ev = self.event_number_for(event_index);
        self.table.word(ev, link, channel).unwrap_or_else(|| {
            eprintln!("warning: physics table missing (event {ev}, link {link}); emitting zero");
            0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PhysicsTable {
        let mut rows = HashMap::new();
        rows.insert((5u64, 0usize), [0xAB; NCHANNELS]);
        rows.insert((7u64, 0usize), [0xCD; NCHANNELS]);
        PhysicsTable { rows }
    }

    #[test]
    fn explicit_selection_cycles() {
        let table = sample_table();
        let mut src = PhysicsPayloadSource::new(table, EventSelection::Explicit(vec![5, 7]));
        assert_eq!(src.word(0, 0, 0), 0xAB);
        assert_eq!(src.word(1, 0, 0), 0xCD);
        assert_eq!(src.word(2, 0, 0), 0xAB);
    }

    #[test]
    fn same_event_index_is_stable_across_channels() {
        let table = sample_table();
        let mut src = PhysicsPayloadSource::new(table, EventSelection::Random);
        let first = src.word(9, 0, 0);
        let second = src.word(9, 0, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_explicit_events_fall_back_to_random_selection() {
        let table = sample_table();
        let mut src = PhysicsPayloadSource::new(table, EventSelection::Explicit(vec![999]));
        assert!(matches!(src.selection, EventSelection::Random));
        let word = src.word(0, 0, 0);
        assert!(word == 0xAB || word == 0xCD);
    }
}
