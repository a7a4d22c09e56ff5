//! Inputs the provider registry hands each factory function. Only the
//! fields a given provider cares about are populated — `synthetic`/`zero`
//! ignore all of them.

use std::path::PathBuf;

/// How physics event numbers are chosen for successive accepted L1As.
#[derive(Debug, Clone, Default)]
pub enum EventSelection {
    /// Drawn from the available set, keyed deterministically off the
    /// accepting event's `sourceEventIndex` so repeated channel lookups for
    /// the same event agree without any shared mutable RNG state.
    #[default]
    Random,
    /// A caller-supplied sequence, cycled to fill the run. Event numbers
    /// absent from the table are dropped at construction time.
    Explicit(Vec<u64>),
}

#[derive(Debug, Clone, Default)]
pub struct ProviderArgs {
    pub table_path: Option<PathBuf>,
    pub event_selection: EventSelection,
}
