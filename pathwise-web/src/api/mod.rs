//! HTTP API handlers for pathwise-web

pub mod health;
pub mod interests;
pub mod result;
pub mod users;

pub use health::health_routes;
pub use interests::{list_interests, select_interest, validate_interest};
pub use result::get_result;
pub use users::{login, register};
