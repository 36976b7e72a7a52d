pub mod locks;
pub mod regenerator;
pub mod stores;

pub use locks::{CycleGuard, CycleLocks};
pub use regenerator::{GenerationReport, ScheduleRegenerator};
pub use stores::LeagueStore;
