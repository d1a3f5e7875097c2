use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::core::{Exclusions, MatchPair, SuggestionFilter};
use crate::models::{
    Gender, LikeOutcome, MatchEntry, MatchedUser, NewPreferences, NewProfile, NewPromptAnswer,
    ParseEnumError, Photo, Preferences, Profile, ProfileUpdate, Prompt, PromptAnswerView,
    ReceivedLike, Swipe, SwipeAction, User, UserCard, ANONYMOUS_NAME,
};
use crate::services::store::{DatingStore, StoreError};

const USER_COLUMNS: &str =
    "id, wallet_pub_key, is_active, is_verified, is_premium, last_active_at, created_at, updated_at";

const PROFILE_COLUMNS: &str = "id, user_id, display_name, age, gender, orientation, bio, hobbies, \
     country, state, city, profession, religion, height_cm, created_at, updated_at";

const PREFERENCES_COLUMNS: &str =
    "id, user_id, preferred_genders, age_min, age_max, location_scope, created_at, updated_at";

const SWIPE_COLUMNS: &str = "id, from_user_id, to_user_id, action, created_at, updated_at";

const PRIMARY_PHOTO: &str = "(SELECT ph.url FROM photos ph WHERE ph.user_id = u.id \
     ORDER BY ph.position ASC, ph.created_at ASC LIMIT 1)";

/// PostgreSQL-backed dating store
///
/// Owns the users, profiles, preferences, prompts, photos, swipes and
/// matches tables. Migrations run on startup.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let url = settings
            .url
            .as_deref()
            .ok_or_else(|| sqlx::Error::Configuration("database.url is not set".into()))?;

        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections
        );

        Self::new(
            url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }

    async fn profiles_for(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, Profile>, StoreError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ANY($1)");
        let rows = sqlx::query(&query)
            .bind(user_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| profile_from_row(row).map(|p| (p.user_id, p)))
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }
}

/// Insert or overwrite the directed swipe. `updated_at` only moves when the
/// action actually changes.
async fn upsert_swipe(
    conn: &mut PgConnection,
    from: Uuid,
    to: Uuid,
    action: SwipeAction,
) -> Result<Swipe, StoreError> {
    let query = format!(
        r#"
        INSERT INTO swipes (id, from_user_id, to_user_id, action)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (from_user_id, to_user_id)
        DO UPDATE SET
            action = EXCLUDED.action,
            updated_at = CASE
                WHEN swipes.action = EXCLUDED.action THEN swipes.updated_at
                ELSE NOW()
            END
        RETURNING {SWIPE_COLUMNS}
        "#
    );

    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(from)
        .bind(to)
        .bind(action.as_str())
        .fetch_one(conn)
        .await?;

    Ok(swipe_from_row(&row)?)
}

#[async_trait]
impl DatingStore for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, wallet: &str) -> Result<User, StoreError> {
        let query = format!(
            r#"
            INSERT INTO users (id, wallet_pub_key, is_active)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (wallet_pub_key) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(wallet)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(user_from_row(&row)?),
            None => Err(StoreError::Conflict("User already exists".to_string())),
        }
    }

    async fn user_by_wallet(&self, wallet: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE wallet_pub_key = $1");
        let row = sqlx::query(&query).bind(wallet).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| user_from_row(&r)).transpose()?)
    }

    async fn user_by_id_or_wallet(&self, key: &str) -> Result<Option<User>, StoreError> {
        let id = Uuid::parse_str(key).ok();

        // An id hit wins over a wallet that happens to look like a UUID
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1 OR wallet_pub_key = $2
            ORDER BY (id = $1) DESC NULLS LAST
            LIMIT 1
            "#
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| user_from_row(&r)).transpose()?)
    }

    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
        let row = sqlx::query(&query).bind(user_id).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| profile_from_row(&r)).transpose()?)
    }

    async fn insert_profile(&self, user_id: Uuid, profile: &NewProfile) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO profiles (
                id, user_id, display_name, age, gender, orientation, bio, hobbies,
                country, state, city, profession, religion, height_cm
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&profile.display_name)
            .bind(profile.age)
            .bind(profile.gender.as_str())
            .bind(&profile.orientation)
            .bind(&profile.bio)
            .bind(&profile.hobbies)
            .bind(&profile.country)
            .bind(&profile.state)
            .bind(&profile.city)
            .bind(&profile.profession)
            .bind(&profile.religion)
            .bind(profile.height_cm)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(profile_from_row(&row)?),
            None => Err(StoreError::Conflict("Profile already exists".to_string())),
        }
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, StoreError> {
        let query = format!(
            r#"
            UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                orientation = COALESCE($5, orientation),
                bio = COALESCE($6, bio),
                hobbies = COALESCE($7, hobbies),
                country = COALESCE($8, country),
                state = COALESCE($9, state),
                city = COALESCE($10, city),
                profession = COALESCE($11, profession),
                religion = COALESCE($12, religion),
                height_cm = COALESCE($13, height_cm),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(&update.display_name)
            .bind(update.age)
            .bind(update.gender.map(|g| g.as_str()))
            .bind(&update.orientation)
            .bind(&update.bio)
            .bind(&update.hobbies)
            .bind(&update.country)
            .bind(&update.state)
            .bind(&update.city)
            .bind(&update.profession)
            .bind(&update.religion)
            .bind(update.height_cm)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| profile_from_row(&r)).transpose()?)
    }

    async fn preferences(&self, user_id: Uuid) -> Result<Option<Preferences>, StoreError> {
        let query = format!("SELECT {PREFERENCES_COLUMNS} FROM preferences WHERE user_id = $1");
        let row = sqlx::query(&query).bind(user_id).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| preferences_from_row(&r)).transpose()?)
    }

    async fn insert_preferences(
        &self,
        user_id: Uuid,
        preferences: &NewPreferences,
    ) -> Result<Preferences, StoreError> {
        let query = format!(
            r#"
            INSERT INTO preferences (id, user_id, preferred_genders, age_min, age_max, location_scope)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {PREFERENCES_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(gender_names(&preferences.preferred_genders))
            .bind(preferences.age_min)
            .bind(preferences.age_max)
            .bind(preferences.location_scope.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(preferences_from_row(&row)?),
            None => Err(StoreError::Conflict("Preferences already exist".to_string())),
        }
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &NewPreferences,
    ) -> Result<Option<Preferences>, StoreError> {
        let query = format!(
            r#"
            UPDATE preferences SET
                preferred_genders = $2,
                age_min = $3,
                age_max = $4,
                location_scope = $5,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PREFERENCES_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(gender_names(&preferences.preferred_genders))
            .bind(preferences.age_min)
            .bind(preferences.age_max)
            .bind(preferences.location_scope.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| preferences_from_row(&r)).transpose()?)
    }

    async fn prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        let query = r#"
            SELECT id, category, question, is_active, position
            FROM prompts
            WHERE is_active
            ORDER BY position ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let prompts: Result<Vec<Prompt>, sqlx::Error> = rows
            .iter()
            .map(|row| {
                Ok(Prompt {
                    id: row.try_get("id")?,
                    category: row.try_get("category")?,
                    question: row.try_get("question")?,
                    is_active: row.try_get("is_active")?,
                    order: row.try_get("position")?,
                })
            })
            .collect();

        Ok(prompts?)
    }

    async fn insert_prompt_answers(
        &self,
        user_id: Uuid,
        answers: &[NewPromptAnswer],
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut stored = 0;

        for answer in answers {
            let result = sqlx::query(
                r#"
                INSERT INTO prompt_answers (id, user_id, prompt_id, answer)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, prompt_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(answer.prompt_id)
            .bind(&answer.answer)
            .execute(&mut *tx)
            .await?;

            stored += result.rows_affected();
        }

        tx.commit().await?;

        tracing::debug!("Stored {} prompt answers for user {}", stored, user_id);

        Ok(stored)
    }

    async fn prompt_answers(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PromptAnswerView>, StoreError> {
        let query = r#"
            SELECT a.id, a.prompt_id, p.question, a.answer, a.created_at
            FROM prompt_answers a
            JOIN prompts p ON p.id = a.prompt_id
            WHERE a.user_id = $1
            ORDER BY a.created_at ASC, a.id ASC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let answers: Result<Vec<PromptAnswerView>, sqlx::Error> = rows
            .iter()
            .map(|row| {
                Ok(PromptAnswerView {
                    id: row.try_get("id")?,
                    prompt_id: row.try_get("prompt_id")?,
                    question: row.try_get("question")?,
                    answer: row.try_get("answer")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect();

        Ok(answers?)
    }

    async fn add_photo(&self, user_id: Uuid, url: &str, order: Option<i32>) -> Result<Photo, StoreError> {
        let query = r#"
            INSERT INTO photos (id, user_id, url, position)
            VALUES (
                $1, $2, $3,
                COALESCE($4, (SELECT COALESCE(MAX(position) + 1, 0) FROM photos WHERE user_id = $2))
            )
            RETURNING id, user_id, url, position, created_at
        "#;

        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(url)
            .bind(order)
            .fetch_one(&self.pool)
            .await?;

        Ok(photo_from_row(&row)?)
    }

    async fn photos(&self, user_id: Uuid) -> Result<Vec<Photo>, StoreError> {
        let query = r#"
            SELECT id, user_id, url, position, created_at
            FROM photos
            WHERE user_id = $1
            ORDER BY position ASC, created_at ASC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(photo_from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    async fn swiped_user_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let query = r#"
            SELECT to_user_id
            FROM swipes
            WHERE from_user_id = $1
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let swiped: Vec<Uuid> = rows.iter().map(|row| row.get("to_user_id")).collect();

        tracing::debug!("User {} has swiped on {} profiles", user_id, swiped.len());

        Ok(swiped)
    }

    async fn find_candidate(
        &self,
        filter: &SuggestionFilter,
        exclusions: &Exclusions,
    ) -> Result<Option<User>, StoreError> {
        let mut qb = candidate_query(filter, exclusions);
        let row = qb.build().fetch_optional(&self.pool).await?;

        Ok(row.map(|r| user_from_row(&r)).transpose()?)
    }

    async fn touch_last_active(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_active_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_like(&self, from: Uuid, to: Uuid) -> Result<LikeOutcome, StoreError> {
        let pair = MatchPair::new(from, to);
        let mut tx = self.pool.begin().await?;

        // Lock both users in id order so opposite likes on one pair run one
        // after the other and the second always sees the first.
        sqlx::query("SELECT id FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(vec![pair.first(), pair.second()])
            .fetch_all(&mut *tx)
            .await?;

        let swipe = upsert_swipe(&mut tx, from, to, SwipeAction::Like).await?;

        let is_match: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM swipes
                WHERE from_user_id = $1 AND to_user_id = $2 AND action = 'LIKE'
            )
            "#,
        )
        .bind(to)
        .bind(from)
        .fetch_one(&mut *tx)
        .await?;

        let match_created = if is_match {
            let result = sqlx::query(
                r#"
                INSERT INTO matches (id, first_person_id, second_person_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (first_person_id, second_person_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(pair.first())
            .bind(pair.second())
            .execute(&mut *tx)
            .await?;
            result.rows_affected() == 1
        } else {
            false
        };

        tx.commit().await?;

        Ok(LikeOutcome {
            swipe,
            is_match,
            match_created,
        })
    }

    async fn record_dislike(&self, from: Uuid, to: Uuid) -> Result<Swipe, StoreError> {
        let mut conn = self.pool.acquire().await?;
        upsert_swipe(&mut conn, from, to, SwipeAction::Dislike).await
    }

    async fn received_likes(&self, user_id: Uuid) -> Result<Vec<ReceivedLike>, StoreError> {
        let query = format!(
            r#"
            SELECT s.id AS swipe_id, s.updated_at AS liked_at,
                   u.id AS user_id, u.wallet_pub_key, p.display_name,
                   {PRIMARY_PHOTO} AS profile_image
            FROM swipes s
            JOIN users u ON u.id = s.from_user_id
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE s.to_user_id = $1 AND s.action = 'LIKE'
            ORDER BY s.updated_at DESC, s.id ASC
            "#
        );

        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;

        let likes: Result<Vec<ReceivedLike>, sqlx::Error> = rows
            .iter()
            .map(|row| {
                Ok(ReceivedLike {
                    swipe_id: row.try_get("swipe_id")?,
                    liked_at: row.try_get("liked_at")?,
                    user: card_from_row(row)?,
                })
            })
            .collect();

        Ok(likes?)
    }

    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<MatchEntry>, StoreError> {
        let query = format!(
            r#"
            SELECT m.id AS match_id, m.created_at AS matched_at,
                   u.id AS user_id, u.wallet_pub_key, p.display_name,
                   {PRIMARY_PHOTO} AS profile_image
            FROM matches m
            JOIN users u ON u.id = CASE
                WHEN m.first_person_id = $1 THEN m.second_person_id
                ELSE m.first_person_id
            END
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE m.first_person_id = $1 OR m.second_person_id = $1
            ORDER BY m.created_at DESC, m.id ASC
            "#
        );

        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            entries.push((
                row.try_get::<Uuid, _>("match_id")?,
                row.try_get::<chrono::DateTime<chrono::Utc>, _>("matched_at")?,
                card_from_row(row)?,
            ));
        }

        let other_ids: Vec<Uuid> = entries.iter().map(|(_, _, card)| card.id).collect();
        let mut profiles = self.profiles_for(&other_ids).await?;

        Ok(entries
            .into_iter()
            .map(|(match_id, matched_at, card)| MatchEntry {
                match_id,
                matched_at,
                user: MatchedUser {
                    profile: profiles.remove(&card.id),
                    card,
                },
            })
            .collect())
    }
}

/// Render a suggestion filter into the candidate query: eligible users
/// with a profile, best ranked first, at most one row.
fn candidate_query(
    filter: &SuggestionFilter,
    exclusions: &Exclusions,
) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(
        "SELECT u.id, u.wallet_pub_key, u.is_active, u.is_verified, u.is_premium, \
         u.last_active_at, u.created_at, u.updated_at \
         FROM users u JOIN profiles p ON p.user_id = u.id \
         WHERE u.is_active AND NOT (u.id = ANY(",
    );
    qb.push_bind(exclusions.to_vec());
    qb.push(")) AND p.age BETWEEN ");
    qb.push_bind(filter.age.min);
    qb.push(" AND ");
    qb.push_bind(filter.age.max);

    if let Some(genders) = filter.gender_names() {
        qb.push(" AND p.gender = ANY(");
        qb.push_bind(genders);
        qb.push(")");
    }
    if let Some(city) = filter.location.city() {
        qb.push(" AND p.city = ");
        qb.push_bind(city.to_string());
    }
    if let Some(state) = filter.location.state() {
        qb.push(" AND p.state = ");
        qb.push_bind(state.to_string());
    }
    if let Some(country) = filter.location.country() {
        qb.push(" AND p.country = ");
        qb.push_bind(country.to_string());
    }

    qb.push(" ORDER BY u.is_premium DESC, u.last_active_at DESC, u.id ASC LIMIT 1");

    qb
}

fn gender_names(genders: &[Gender]) -> Vec<String> {
    genders.iter().map(|g| g.as_str().to_string()).collect()
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: ParseEnumError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        wallet_pub_key: row.try_get("wallet_pub_key")?,
        is_active: row.try_get("is_active")?,
        is_verified: row.try_get("is_verified")?,
        is_premium: row.try_get("is_premium")?,
        last_active_at: row.try_get("last_active_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        display_name: row.try_get("display_name")?,
        age: row.try_get("age")?,
        gender: parse_column(row, "gender")?,
        orientation: row.try_get("orientation")?,
        bio: row.try_get("bio")?,
        hobbies: row.try_get("hobbies")?,
        country: row.try_get("country")?,
        state: row.try_get("state")?,
        city: row.try_get("city")?,
        profession: row.try_get("profession")?,
        religion: row.try_get("religion")?,
        height_cm: row.try_get("height_cm")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn preferences_from_row(row: &PgRow) -> Result<Preferences, sqlx::Error> {
    let raw_genders: Vec<String> = row.try_get("preferred_genders")?;
    let preferred_genders = raw_genders
        .iter()
        .map(|g| g.parse::<Gender>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "preferred_genders".to_string(),
            source: Box::new(e),
        })?;

    Ok(Preferences {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        preferred_genders,
        age_min: row.try_get("age_min")?,
        age_max: row.try_get("age_max")?,
        location_scope: parse_column(row, "location_scope")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn photo_from_row(row: &PgRow) -> Result<Photo, sqlx::Error> {
    Ok(Photo {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        url: row.try_get("url")?,
        order: row.try_get("position")?,
        created_at: row.try_get("created_at")?,
    })
}

fn swipe_from_row(row: &PgRow) -> Result<Swipe, sqlx::Error> {
    Ok(Swipe {
        id: row.try_get("id")?,
        from_user_id: row.try_get("from_user_id")?,
        to_user_id: row.try_get("to_user_id")?,
        action: parse_column(row, "action")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn card_from_row(row: &PgRow) -> Result<UserCard, sqlx::Error> {
    let display_name: Option<String> = row.try_get("display_name")?;
    Ok(UserCard {
        id: row.try_get("user_id")?,
        wallet_pub_key: row.try_get("wallet_pub_key")?,
        display_name: display_name.unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
        profile_image: row.try_get("profile_image")?,
    })
}
