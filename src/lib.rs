//! Lume Swipe - wallet-keyed dating backend
//!
//! Serves one ranked candidate at a time, records likes and reports,
//! detects mutual matches and manages profiles, preferences, prompts
//! and photos. Suggestions can be gated behind a payment verifier.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{select_candidate, CandidateSelector, Exclusions, MatchPair, SuggestionFilter};
pub use error::ApiError;
pub use routes::AppState;
pub use services::{DatingService, DatingStore, MemoryStore, PaymentGate, PostgresStore};

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_library_exports() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(MatchPair::new(a, b), MatchPair::new(b, a));
        assert!(CandidateSelector::default().prompt_answer_limit() > 0);
    }
}
