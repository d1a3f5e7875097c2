use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{select_candidate, Exclusions, MatchPair, SuggestionFilter};
use crate::models::{
    LikeOutcome, Match, MatchEntry, MatchedUser, NewPreferences, NewProfile, NewPromptAnswer,
    Photo, Preferences, Profile, ProfileUpdate, Prompt, PromptAnswerView, ReceivedLike, Swipe,
    SwipeAction, User, UserCard, ANONYMOUS_NAME,
};
use crate::services::store::{DatingStore, StoreError};

/// Prompt catalog seeded into every in-memory store, mirroring the SQL seed
pub const PROMPT_CATALOG: &[(&str, &str)] = &[
    ("FUN", "Two truths and a lie. Go."),
    ("FUN", "The most spontaneous thing I've ever done is…"),
    ("FUN", "My most irrational fear is…"),
    ("FUN", "I'm weirdly competitive about…"),
    ("FUN", "The last thing that made me laugh way too hard was…"),
    ("ICEBREAKER", "A perfect Sunday for me looks like…"),
    ("ICEBREAKER", "I'll fall for you if…"),
    ("ICEBREAKER", "The quickest way to my heart is…"),
    ("ICEBREAKER", "The best first message I've ever received was…"),
    ("ICEBREAKER", "One thing you should know about me is…"),
    ("LIFESTYLE", "My ideal way to unwind after a long day is…"),
    ("LIFESTYLE", "A habit I'm trying to build right now is…"),
    ("LIFESTYLE", "My relationship with my phone is best described as…"),
    ("LIFESTYLE", "If we were stranded on an island, I'd be responsible for…"),
    ("LIFESTYLE", "My go-to comfort activity is…"),
    ("VALUES", "A value I won't compromise on is…"),
    ("VALUES", "A green flag I look for in people is…"),
    ("VALUES", "Something I'm genuinely grateful for is…"),
    ("VALUES", "The hallmark of a healthy relationship is…"),
    ("VALUES", "Something I'm currently working on about myself is…"),
];

struct StoredAnswer {
    id: Uuid,
    user_id: Uuid,
    prompt_id: Uuid,
    answer: String,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    wallets: HashMap<String, Uuid>,
    profiles: HashMap<Uuid, Profile>,
    preferences: HashMap<Uuid, Preferences>,
    prompts: Vec<Prompt>,
    answers: Vec<StoredAnswer>,
    photos: Vec<Photo>,
    swipes: HashMap<(Uuid, Uuid), Swipe>,
    matches: HashMap<MatchPair, Match>,
}

impl State {
    fn upsert_swipe(&mut self, from: Uuid, to: Uuid, action: SwipeAction) -> Swipe {
        let now = Utc::now();

        let stored = self.swipes.entry((from, to)).or_insert_with(|| Swipe {
            id: Uuid::new_v4(),
            from_user_id: from,
            to_user_id: to,
            action,
            created_at: now,
            updated_at: now,
        });

        if stored.action != action {
            stored.action = action;
            stored.updated_at = now;
        }

        stored.clone()
    }

    fn is_like(&self, from: Uuid, to: Uuid) -> bool {
        self.swipes
            .get(&(from, to))
            .is_some_and(|s| s.action == SwipeAction::Like)
    }

    fn card(&self, user: &User) -> UserCard {
        let display_name = self
            .profiles
            .get(&user.id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| ANONYMOUS_NAME.to_string());

        UserCard {
            id: user.id,
            wallet_pub_key: user.wallet_pub_key.clone(),
            display_name,
            profile_image: self.primary_photo(user.id),
        }
    }

    fn primary_photo(&self, user_id: Uuid) -> Option<String> {
        self.photos
            .iter()
            .filter(|p| p.user_id == user_id)
            .min_by_key(|p| p.order)
            .map(|p| p.url.clone())
    }
}

/// Dating store held entirely in process memory
///
/// Backs local runs and tests. Every write happens under one lock, which
/// makes like-and-match atomic.
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store seeded with the prompt catalog
    pub fn new() -> Self {
        let prompts = PROMPT_CATALOG
            .iter()
            .enumerate()
            .map(|(i, (category, question))| Prompt {
                id: Uuid::new_v4(),
                category: category.to_string(),
                question: question.to_string(),
                is_active: true,
                order: i as i32 + 1,
            })
            .collect();

        Self {
            state: RwLock::new(State {
                prompts,
                ..State::default()
            }),
        }
    }

    /// Mutate a stored user in place, e.g. to mark it premium.
    /// Returns false when no such user exists.
    pub async fn update_user<F>(&self, id: Uuid, f: F) -> bool
    where
        F: FnOnce(&mut User),
    {
        let mut state = self.state.write().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                f(user);
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatingStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, wallet: &str) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.wallets.contains_key(wallet) {
            return Err(StoreError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            wallet_pub_key: wallet.to_string(),
            is_active: true,
            is_verified: false,
            is_premium: false,
            last_active_at: now,
            created_at: now,
            updated_at: now,
        };

        state.wallets.insert(wallet.to_string(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_wallet(&self, wallet: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .wallets
            .get(wallet)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn user_by_id_or_wallet(&self, key: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;

        let by_id = Uuid::parse_str(key).ok().and_then(|id| state.users.get(&id));
        let user = by_id.or_else(|| state.wallets.get(key).and_then(|id| state.users.get(id)));

        Ok(user.cloned())
    }

    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.state.read().await.profiles.get(&user_id).cloned())
    }

    async fn insert_profile(&self, user_id: Uuid, profile: &NewProfile) -> Result<Profile, StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("User not found".to_string()));
        }
        if state.profiles.contains_key(&user_id) {
            return Err(StoreError::Conflict("Profile already exists".to_string()));
        }

        let now = Utc::now();
        let stored = Profile {
            id: Uuid::new_v4(),
            user_id,
            display_name: profile.display_name.clone(),
            age: profile.age,
            gender: profile.gender,
            orientation: profile.orientation.clone(),
            bio: profile.bio.clone(),
            hobbies: profile.hobbies.clone(),
            country: profile.country.clone(),
            state: profile.state.clone(),
            city: profile.city.clone(),
            profession: profile.profession.clone(),
            religion: profile.religion.clone(),
            height_cm: profile.height_cm,
            created_at: now,
            updated_at: now,
        };

        state.profiles.insert(user_id, stored.clone());
        Ok(stored)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.profiles.get_mut(&user_id).map(|profile| {
            update.apply(profile);
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }

    async fn preferences(&self, user_id: Uuid) -> Result<Option<Preferences>, StoreError> {
        Ok(self.state.read().await.preferences.get(&user_id).cloned())
    }

    async fn insert_preferences(
        &self,
        user_id: Uuid,
        preferences: &NewPreferences,
    ) -> Result<Preferences, StoreError> {
        let mut state = self.state.write().await;
        if state.preferences.contains_key(&user_id) {
            return Err(StoreError::Conflict("Preferences already exist".to_string()));
        }

        let now = Utc::now();
        let stored = Preferences {
            id: Uuid::new_v4(),
            user_id,
            preferred_genders: preferences.preferred_genders.clone(),
            age_min: preferences.age_min,
            age_max: preferences.age_max,
            location_scope: preferences.location_scope,
            created_at: now,
            updated_at: now,
        };

        state.preferences.insert(user_id, stored.clone());
        Ok(stored)
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &NewPreferences,
    ) -> Result<Option<Preferences>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.preferences.get_mut(&user_id).map(|stored| {
            stored.preferred_genders = preferences.preferred_genders.clone();
            stored.age_min = preferences.age_min;
            stored.age_max = preferences.age_max;
            stored.location_scope = preferences.location_scope;
            stored.updated_at = Utc::now();
            stored.clone()
        }))
    }

    async fn prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        let state = self.state.read().await;
        let mut prompts: Vec<Prompt> = state.prompts.iter().filter(|p| p.is_active).cloned().collect();
        prompts.sort_by_key(|p| p.order);
        Ok(prompts)
    }

    async fn insert_prompt_answers(
        &self,
        user_id: Uuid,
        answers: &[NewPromptAnswer],
    ) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let mut stored = 0;

        for answer in answers {
            if !state.prompts.iter().any(|p| p.id == answer.prompt_id) {
                return Err(StoreError::NotFound(format!("Prompt {} not found", answer.prompt_id)));
            }

            let duplicate = state
                .answers
                .iter()
                .any(|a| a.user_id == user_id && a.prompt_id == answer.prompt_id);
            if duplicate {
                continue;
            }

            state.answers.push(StoredAnswer {
                id: Uuid::new_v4(),
                user_id,
                prompt_id: answer.prompt_id,
                answer: answer.answer.clone(),
                created_at: Utc::now(),
            });
            stored += 1;
        }

        Ok(stored)
    }

    async fn prompt_answers(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PromptAnswerView>, StoreError> {
        let state = self.state.read().await;

        Ok(state
            .answers
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| {
                let prompt = state.prompts.iter().find(|p| p.id == a.prompt_id)?;
                Some(PromptAnswerView {
                    id: a.id,
                    prompt_id: a.prompt_id,
                    question: prompt.question.clone(),
                    answer: a.answer.clone(),
                    created_at: a.created_at,
                })
            })
            .take(limit)
            .collect())
    }

    async fn add_photo(&self, user_id: Uuid, url: &str, order: Option<i32>) -> Result<Photo, StoreError> {
        let mut state = self.state.write().await;

        let order = order.unwrap_or_else(|| {
            state
                .photos
                .iter()
                .filter(|p| p.user_id == user_id)
                .map(|p| p.order + 1)
                .max()
                .unwrap_or(0)
        });

        let photo = Photo {
            id: Uuid::new_v4(),
            user_id,
            url: url.to_string(),
            order,
            created_at: Utc::now(),
        };

        state.photos.push(photo.clone());
        Ok(photo)
    }

    async fn photos(&self, user_id: Uuid) -> Result<Vec<Photo>, StoreError> {
        let state = self.state.read().await;
        let mut photos: Vec<Photo> = state.photos.iter().filter(|p| p.user_id == user_id).cloned().collect();
        photos.sort_by_key(|p| p.order);
        Ok(photos)
    }

    async fn swiped_user_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .swipes
            .keys()
            .filter(|(from, _)| *from == user_id)
            .map(|(_, to)| *to)
            .collect())
    }

    async fn find_candidate(
        &self,
        filter: &SuggestionFilter,
        exclusions: &Exclusions,
    ) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;

        let candidates = state
            .users
            .values()
            .filter_map(|user| state.profiles.get(&user.id).map(|profile| (user, profile)));

        Ok(select_candidate(candidates, filter, exclusions).cloned())
    }

    async fn touch_last_active(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.get_mut(&user_id) {
            let now = Utc::now();
            user.last_active_at = now;
            user.updated_at = now;
        }
        Ok(())
    }

    async fn record_like(&self, from: Uuid, to: Uuid) -> Result<LikeOutcome, StoreError> {
        let mut state = self.state.write().await;

        let swipe = state.upsert_swipe(from, to, SwipeAction::Like);
        let is_match = state.is_like(to, from);

        let match_created = if is_match {
            let pair = MatchPair::new(from, to);
            if state.matches.contains_key(&pair) {
                false
            } else {
                state.matches.insert(
                    pair,
                    Match {
                        id: Uuid::new_v4(),
                        first_person_id: pair.first(),
                        second_person_id: pair.second(),
                        created_at: Utc::now(),
                    },
                );
                true
            }
        } else {
            false
        };

        Ok(LikeOutcome {
            swipe,
            is_match,
            match_created,
        })
    }

    async fn record_dislike(&self, from: Uuid, to: Uuid) -> Result<Swipe, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.upsert_swipe(from, to, SwipeAction::Dislike))
    }

    async fn received_likes(&self, user_id: Uuid) -> Result<Vec<ReceivedLike>, StoreError> {
        let state = self.state.read().await;

        let mut incoming: Vec<&Swipe> = state
            .swipes
            .values()
            .filter(|s| s.to_user_id == user_id && s.action == SwipeAction::Like)
            .collect();
        // Newest first, ties by id as in the SQL store
        incoming.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));

        Ok(incoming
            .into_iter()
            .filter_map(|s| {
                let liker = state.users.get(&s.from_user_id)?;
                Some(ReceivedLike {
                    swipe_id: s.id,
                    liked_at: s.updated_at,
                    user: state.card(liker),
                })
            })
            .collect())
    }

    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<MatchEntry>, StoreError> {
        let state = self.state.read().await;

        let mut touching: Vec<(&MatchPair, &Match)> = state
            .matches
            .iter()
            .filter(|(pair, _)| pair.contains(user_id))
            .collect();
        touching.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        Ok(touching
            .into_iter()
            .filter_map(|(pair, stored)| {
                let other = state.users.get(&pair.other(user_id))?;
                Some(MatchEntry {
                    match_id: stored.id,
                    matched_at: stored.created_at,
                    user: MatchedUser {
                        card: state.card(other),
                        profile: state.profiles.get(&other.id).cloned(),
                    },
                })
            })
            .collect())
    }
}
