use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{Exclusions, SuggestionFilter};
use crate::models::{
    LikeOutcome, MatchEntry, NewPreferences, NewProfile, NewPromptAnswer, Photo, Preferences,
    Profile, ProfileUpdate, Prompt, PromptAnswerView, ReceivedLike, Swipe, User,
};

/// Errors that can occur when reading or writing the dating store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Persistence seam for every dating operation.
///
/// Implementations must keep a swipe unique per ordered pair and a match
/// unique per unordered pair, and [`DatingStore::record_like`] must upsert
/// the swipe and create the match as one atomic step.
#[async_trait]
pub trait DatingStore: Send + Sync {
    /// Connectivity probe used by the health check
    async fn ping(&self) -> Result<(), StoreError>;

    /// Register a wallet; `Conflict` when it already exists
    async fn create_user(&self, wallet: &str) -> Result<User, StoreError>;

    async fn user_by_wallet(&self, wallet: &str) -> Result<Option<User>, StoreError>;

    /// Resolve a user by id (when `key` is a UUID) or wallet
    async fn user_by_id_or_wallet(&self, key: &str) -> Result<Option<User>, StoreError>;

    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Create a profile; `Conflict` when the user already has one
    async fn insert_profile(&self, user_id: Uuid, profile: &NewProfile) -> Result<Profile, StoreError>;

    /// Apply a partial update; `None` when the user has no profile
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, StoreError>;

    async fn preferences(&self, user_id: Uuid) -> Result<Option<Preferences>, StoreError>;

    /// Create preferences; `Conflict` when the user already has them
    async fn insert_preferences(
        &self,
        user_id: Uuid,
        preferences: &NewPreferences,
    ) -> Result<Preferences, StoreError>;

    /// Replace preferences; `None` when the user has none yet
    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &NewPreferences,
    ) -> Result<Option<Preferences>, StoreError>;

    /// Active catalog prompts ordered by their position
    async fn prompts(&self) -> Result<Vec<Prompt>, StoreError>;

    /// Store answers, skipping prompts the user already answered.
    /// Returns the number of answers stored.
    async fn insert_prompt_answers(
        &self,
        user_id: Uuid,
        answers: &[NewPromptAnswer],
    ) -> Result<u64, StoreError>;

    async fn prompt_answers(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PromptAnswerView>, StoreError>;

    /// Append a photo; `order` defaults to the next free position
    async fn add_photo(&self, user_id: Uuid, url: &str, order: Option<i32>) -> Result<Photo, StoreError>;

    /// Photos in ascending order
    async fn photos(&self, user_id: Uuid) -> Result<Vec<Photo>, StoreError>;

    /// Everyone the user swiped on, whatever the action
    async fn swiped_user_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    /// Best-ranked active user with a profile passing `filter` and not in `exclusions`
    async fn find_candidate(
        &self,
        filter: &SuggestionFilter,
        exclusions: &Exclusions,
    ) -> Result<Option<User>, StoreError>;

    async fn touch_last_active(&self, user_id: Uuid) -> Result<(), StoreError>;

    /// Upsert `from -> to` as LIKE and create the match if `to -> from` is a LIKE
    async fn record_like(&self, from: Uuid, to: Uuid) -> Result<LikeOutcome, StoreError>;

    /// Upsert `from -> to` as DISLIKE
    async fn record_dislike(&self, from: Uuid, to: Uuid) -> Result<Swipe, StoreError>;

    /// Incoming likes, newest first
    async fn received_likes(&self, user_id: Uuid) -> Result<Vec<ReceivedLike>, StoreError>;

    /// Matches touching the user resolved to the other party, newest first
    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<MatchEntry>, StoreError>;
}
