use std::sync::Arc;

use crate::application::services::VerificationService;

#[derive(Clone)]
pub struct AppState {
    pub verification_service: Arc<VerificationService>,
    /// Optional decision policy applied to the raw similarity in responses.
    pub match_threshold: Option<f32>,
}
