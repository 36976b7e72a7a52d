pub mod availability;
pub mod connection;
pub mod cycles;
pub mod models;
pub mod players;
pub mod schedule_requests;
pub mod setup;
pub mod store;
pub mod templates;
pub mod tour_players;
pub mod tours;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;
pub use store::SqliteStore;
