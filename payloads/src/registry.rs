//! Payload provider registry for automatic front-end discovery.
//!
//! Each provider self-registers via [`inventory::submit!`] with a
//! [`PayloadProviderEntry`] containing its CLI name and a factory function.
//! The front-end discovers available payload modes at runtime without any
//! central list.

use roc_core::core::PayloadSource;
use roc_core::error::RocError;

use crate::provider::ProviderArgs;

/// Describes a selectable payload-source implementation.
pub struct PayloadProviderEntry {
    /// CLI name used to select this provider (e.g., "synthetic").
    pub name: &'static str,
    /// Factory: construct a boxed `PayloadSource` from the run's provider args.
    pub create: fn(&ProviderArgs) -> Result<Box<dyn PayloadSource>, RocError>,
}

impl PayloadProviderEntry {
    pub const fn new(
        name: &'static str,
        create: fn(&ProviderArgs) -> Result<Box<dyn PayloadSource>, RocError>,
    ) -> Self {
        Self { name, create }
    }
}

inventory::collect!(PayloadProviderEntry);

/// Return all registered payload providers, sorted by name.
pub fn all() -> Vec<&'static PayloadProviderEntry> {
    let mut entries: Vec<_> = inventory::iter::<PayloadProviderEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a payload provider by its CLI name.
pub fn find(name: &str) -> Option<&'static PayloadProviderEntry> {
    inventory::iter::<PayloadProviderEntry>
        .into_iter()
        .find(|e| e.name == name)
}
