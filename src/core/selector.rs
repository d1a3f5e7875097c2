use std::cmp::Ordering;
use std::collections::HashSet;
use uuid::Uuid;

use crate::core::filters::{AgeRange, SuggestionFilter};
use crate::models::{Preferences, Profile, User};

/// Number of prompt answers attached to a suggestion
pub const DEFAULT_PROMPT_ANSWER_LIMIT: usize = 3;

/// Users that must never be suggested to a requester: the requester
/// and everyone they already swiped on, whatever the action.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    ids: HashSet<Uuid>,
}

impl Exclusions {
    pub fn new(requester: Uuid, swiped: impl IntoIterator<Item = Uuid>) -> Self {
        let mut ids: HashSet<Uuid> = swiped.into_iter().collect();
        ids.insert(requester);
        Self { ids }
    }

    #[inline]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Uuid> {
        self.ids.iter().copied().collect()
    }
}

/// Ranking of eligible candidates: premium first, then most recently
/// active, then id so that ties resolve the same way on every call.
pub fn suggestion_order(a: &User, b: &User) -> Ordering {
    b.is_premium
        .cmp(&a.is_premium)
        .then_with(|| b.last_active_at.cmp(&a.last_active_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick the best-ranked eligible candidate.
///
/// # Arguments
/// * `candidates` - Users paired with their profile; users without a profile never qualify
/// * `filter` - Inclusion rules derived from the requester's preferences
/// * `exclusions` - Requester and already-swiped users
pub fn select_candidate<'a, I>(
    candidates: I,
    filter: &SuggestionFilter,
    exclusions: &Exclusions,
) -> Option<&'a User>
where
    I: IntoIterator<Item = (&'a User, &'a Profile)>,
{
    candidates
        .into_iter()
        .filter(|(user, _)| user.is_active && !exclusions.contains(&user.id))
        .filter(|(_, profile)| filter.matches(profile))
        .map(|(user, _)| user)
        .min_by(|a, b| suggestion_order(a, b))
}

/// Builds suggestion filters with the configured defaults
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector {
    age_defaults: AgeRange,
    prompt_answer_limit: usize,
}

impl CandidateSelector {
    pub fn new(age_defaults: AgeRange, prompt_answer_limit: usize) -> Self {
        Self {
            age_defaults,
            prompt_answer_limit,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AgeRange::default(), DEFAULT_PROMPT_ANSWER_LIMIT)
    }

    pub fn filter_for(&self, preferences: Option<&Preferences>, origin: &Profile) -> SuggestionFilter {
        SuggestionFilter::from_preferences(preferences, origin, self.age_defaults)
    }

    pub fn prompt_answer_limit(&self) -> usize {
        self.prompt_answer_limit
    }
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::with_defaults()
    }
}
