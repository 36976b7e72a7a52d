pub mod intersection;
pub mod merge;
pub mod slots;

pub use intersection::{compute_overlap, OverlapResult, PlayerSlots};
pub use merge::{IntervalKind, SlotPoint, TimeInterval};
pub use slots::SlotGrid;
