mod init_tracing;
mod locator_sanitizer;
mod request_id;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use locator_sanitizer::sanitize_locator;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use tracing_config::TracingConfig;
