pub mod models;
pub mod round_robin;

pub use models::{DropReason, Player, PlayerPair, RequestStatus, Round, TourStatus};
pub use round_robin::build_rounds;
