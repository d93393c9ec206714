mod compare;
mod error_response;
mod health;
mod publish;

pub use compare::{CompareRequest, CompareResponse, compare_handler};
pub use error_response::{ErrorResponse, status_for};
pub use health::health_handler;
pub use publish::{PublishRequest, PublishResponse, publish_handler};
