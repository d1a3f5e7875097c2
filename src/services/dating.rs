use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::{ensure_not_self, CandidateSelector, Exclusions, SwipeIntent};
use crate::error::ApiError;
use crate::models::{
    LikeOutcome, MatchEntry, NewPreferences, NewProfile, NewPromptAnswer, Photo, Preferences,
    Profile, ProfileUpdate, Prompt, ReceivedLike, Suggestion, Swipe, User, UserDetails,
};
use crate::services::cache::PromptCatalog;
use crate::services::store::{DatingStore, StoreError};

/// Application operations over a [`DatingStore`]
///
/// Resolves wallets to users, enforces preconditions and turns store
/// outcomes into [`ApiError`]s. Handlers stay thin on top of this.
pub struct DatingService {
    store: Arc<dyn DatingStore>,
    selector: CandidateSelector,
    catalog: PromptCatalog,
}

impl DatingService {
    pub fn new(store: Arc<dyn DatingStore>, selector: CandidateSelector, catalog: PromptCatalog) -> Self {
        Self {
            store,
            selector,
            catalog,
        }
    }

    /// Probe the backing store
    pub async fn ping(&self) -> Result<(), ApiError> {
        Ok(self.store.ping().await?)
    }

    /// Resolve a wallet to its user or fail with 404
    async fn require_user(&self, wallet: &str) -> Result<User, ApiError> {
        self.store
            .user_by_wallet(wallet)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn create_user(&self, wallet: &str) -> Result<User, ApiError> {
        match self.store.create_user(wallet).await {
            Ok(user) => {
                tracing::info!("Registered user {} for wallet {}", user.id, wallet);
                Ok(user)
            }
            Err(StoreError::Conflict(_)) => Err(ApiError::BadRequest("User already exists".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, wallet: &str) -> Result<UserDetails, ApiError> {
        let user = self.require_user(wallet).await?;
        let profile = self.store.profile(user.id).await?;
        let preferences = self.store.preferences(user.id).await?;

        Ok(UserDetails {
            user,
            profile,
            preferences,
        })
    }

    pub async fn create_profile(&self, wallet: &str, profile: NewProfile) -> Result<Profile, ApiError> {
        let user = self.require_user(wallet).await?;
        Ok(self.store.insert_profile(user.id, &profile).await?)
    }

    pub async fn update_profile(&self, wallet: &str, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let user = self.require_user(wallet).await?;
        self.store
            .update_profile(user.id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
    }

    pub async fn create_preferences(
        &self,
        wallet: &str,
        preferences: NewPreferences,
    ) -> Result<Preferences, ApiError> {
        let user = self.require_user(wallet).await?;
        Ok(self.store.insert_preferences(user.id, &preferences).await?)
    }

    pub async fn update_preferences(
        &self,
        wallet: &str,
        preferences: NewPreferences,
    ) -> Result<Preferences, ApiError> {
        let user = self.require_user(wallet).await?;
        self.store
            .update_preferences(user.id, &preferences)
            .await?
            .ok_or_else(|| ApiError::NotFound("Preferences not found".to_string()))
    }

    pub async fn get_preferences(&self, wallet: &str) -> Result<Preferences, ApiError> {
        let user = self.require_user(wallet).await?;
        self.store
            .preferences(user.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Preferences not found".to_string()))
    }

    pub async fn list_prompts(&self, wallet: &str) -> Result<Arc<Vec<Prompt>>, ApiError> {
        self.require_user(wallet).await?;
        Ok(self.catalog.get_or_load(self.store.as_ref()).await?)
    }

    /// Store answers to catalog prompts, returning how many were new
    pub async fn answer_prompts(
        &self,
        wallet: &str,
        answers: Vec<NewPromptAnswer>,
    ) -> Result<u64, ApiError> {
        if answers.is_empty() {
            return Err(ApiError::Validation("At least one answer is required".to_string()));
        }

        let user = self.require_user(wallet).await?;

        let catalog = self.catalog.get_or_load(self.store.as_ref()).await?;
        let known: HashSet<Uuid> = catalog.iter().map(|p| p.id).collect();
        if let Some(unknown) = answers.iter().find(|a| !known.contains(&a.prompt_id)) {
            return Err(ApiError::BadRequest(format!("Unknown prompt: {}", unknown.prompt_id)));
        }

        let stored = self.store.insert_prompt_answers(user.id, &answers).await?;

        tracing::debug!(
            "User {} answered {} prompts ({} new)",
            user.id,
            answers.len(),
            stored
        );

        Ok(stored)
    }

    pub async fn add_photo(&self, wallet: &str, url: &str, order: Option<i32>) -> Result<Photo, ApiError> {
        let user = self.require_user(wallet).await?;
        Ok(self.store.add_photo(user.id, url, order).await?)
    }

    pub async fn list_photos(&self, wallet: &str) -> Result<Vec<Photo>, ApiError> {
        let user = self.require_user(wallet).await?;
        Ok(self.store.photos(user.id).await?)
    }

    /// Pick the single best candidate for the requester.
    ///
    /// `Ok(None)` means nobody is left to suggest. The requester's
    /// `last_active_at` is refreshed either way.
    /// Resolve a requester that can receive suggestions: the wallet must be
    /// registered and own a profile. Runs before anything is charged.
    pub async fn suggestion_requester(&self, wallet: &str) -> Result<(User, Profile), ApiError> {
        let user = self.require_user(wallet).await?;

        let profile = self.store.profile(user.id).await?.ok_or_else(|| {
            ApiError::NotFound("User profile not found. Please create a profile first.".to_string())
        })?;

        Ok((user, profile))
    }

    pub async fn next_suggestion(&self, wallet: &str) -> Result<Option<Suggestion>, ApiError> {
        let (user, origin) = self.suggestion_requester(wallet).await?;
        let preferences = self.store.preferences(user.id).await?;

        let swiped = self.store.swiped_user_ids(user.id).await?;
        let exclusions = Exclusions::new(user.id, swiped);
        let filter = self.selector.filter_for(preferences.as_ref(), &origin);

        tracing::debug!(
            "Finding suggestion for {} ({} excluded, filter: {:?})",
            user.id,
            exclusions.len(),
            filter
        );

        let candidate = self.store.find_candidate(&filter, &exclusions).await?;

        self.store.touch_last_active(user.id).await?;

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let profile = self.store.profile(candidate.id).await?.ok_or_else(|| {
            ApiError::Internal(format!("Candidate {} lost its profile", candidate.id))
        })?;
        let photos = self.store.photos(candidate.id).await?;
        let prompt_answers = self
            .store
            .prompt_answers(candidate.id, self.selector.prompt_answer_limit())
            .await?;

        Ok(Some(Suggestion {
            id: candidate.id,
            wallet_pub_key: candidate.wallet_pub_key,
            profile,
            photos,
            prompt_answers,
        }))
    }

    async fn resolve_pair(
        &self,
        intent: SwipeIntent,
        from_wallet: &str,
        to_key: &str,
    ) -> Result<(User, User), ApiError> {
        ensure_not_self(intent, from_wallet, to_key).map_err(|m| ApiError::BadRequest(m.to_string()))?;

        let from = self.require_user(from_wallet).await?;
        let to = self
            .store
            .user_by_id_or_wallet(to_key)
            .await?
            .ok_or_else(|| ApiError::NotFound("Target user not found".to_string()))?;

        if from.id == to.id {
            return Err(ApiError::BadRequest(intent.self_target_message().to_string()));
        }

        Ok((from, to))
    }

    /// Record a like and create the match when it is reciprocated
    pub async fn like(&self, from_wallet: &str, to_key: &str) -> Result<LikeOutcome, ApiError> {
        let (from, to) = self.resolve_pair(SwipeIntent::Like, from_wallet, to_key).await?;

        let outcome = self.store.record_like(from.id, to.id).await?;

        if outcome.match_created {
            tracing::info!("Match created between {} and {}", from.id, to.id);
        }

        Ok(outcome)
    }

    /// Record a report, overwriting any earlier swipe on the same target
    pub async fn report(&self, from_wallet: &str, to_key: &str) -> Result<Swipe, ApiError> {
        let (from, to) = self.resolve_pair(SwipeIntent::Report, from_wallet, to_key).await?;

        let swipe = self.store.record_dislike(from.id, to.id).await?;

        tracing::info!("User {} reported {}", from.id, to.id);

        Ok(swipe)
    }

    pub async fn received_likes(&self, wallet: &str) -> Result<Vec<ReceivedLike>, ApiError> {
        let user = self.require_user(wallet).await?;
        Ok(self.store.received_likes(user.id).await?)
    }

    pub async fn matches(&self, wallet: &str) -> Result<Vec<MatchEntry>, ApiError> {
        let user = self.require_user(wallet).await?;
        Ok(self.store.matches_for(user.id).await?)
    }
}
