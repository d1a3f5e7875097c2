// Core algorithm exports
pub mod filters;
pub mod selector;
pub mod swipes;

pub use filters::{AgeRange, LocationFilter, SuggestionFilter, DEFAULT_MAX_AGE, DEFAULT_MIN_AGE};
pub use selector::{select_candidate, suggestion_order, CandidateSelector, Exclusions};
pub use swipes::{ensure_not_self, MatchPair, SwipeIntent};
