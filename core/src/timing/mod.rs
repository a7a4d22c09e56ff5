pub mod clock;
pub mod command;
pub mod scheduler;

pub use clock::BxClock;
pub use command::FastCommand;
pub use scheduler::{build_fast_commands, FastCommandSchedule};
