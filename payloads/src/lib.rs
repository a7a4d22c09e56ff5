pub mod physics;
pub mod provider;
pub mod registry;
pub mod synthetic;
pub mod zero;

pub use physics::{PhysicsPayloadSource, PhysicsTable};
pub use provider::{EventSelection, ProviderArgs};
pub use registry::{all, find, PayloadProviderEntry};
pub use synthetic::SyntheticPayloadSource;
pub use zero::ZeroPayloadSource;

use roc_core::error::{ConfigError, RocError};

inventory::submit! {
    PayloadProviderEntry::new("synthetic", |_args| {
        Ok(Box::new(SyntheticPayloadSource::new()))
    })
}

inventory::submit! {
    PayloadProviderEntry::new("zero", |_args| {
        Ok(Box::new(ZeroPayloadSource::new()))
    })
}

inventory::submit! {
    PayloadProviderEntry::new("physics", |args| {
        let path = args.table_path.as_ref().ok_or_else(|| {
            RocError::Config(ConfigError::Invalid(
                "physics payload mode requires --physics-table <path>".into(),
            ))
        })?;
        let table = PhysicsTable::load(path)?;
        let source = PhysicsPayloadSource::new(table, args.event_selection.clone());
        Ok(Box::new(source))
    })
}
