// Route exports
pub mod health;
pub mod swipes;
pub mod users;

use actix_web::web;
use std::sync::Arc;

use crate::services::{DatingService, PaymentGate};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DatingService>,
    /// Present when paid suggestions are enabled
    pub payment: Option<Arc<PaymentGate>>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Swipe paths go first so `swipe` is never taken for a wallet
    cfg.service(
        web::scope("/api")
            .configure(health::configure)
            .configure(swipes::configure)
            .configure(users::configure),
    );
}
