pub mod availability;
pub mod generation;
pub mod requests;
pub mod schedule;
pub mod server;

pub use availability::AvailabilityService;
pub use generation::GenerationService;
pub use requests::ScheduleRequestService;
pub use schedule::ScheduleViewService;
pub use server::ServerService;
