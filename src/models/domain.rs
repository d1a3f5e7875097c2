use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Raised when a stored enum column holds a value this build does not know
#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Profile gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::NonBinary => "NON_BINARY",
            Gender::Other => "OTHER",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "NON_BINARY" => Ok(Gender::NonBinary),
            "OTHER" => Ok(Gender::Other),
            _ => Err(ParseEnumError { kind: "gender", value: s.to_string() }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How closely a candidate's location must agree with the requester's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationScope {
    SameCity,
    SameState,
    SameCountry,
    Any,
}

impl LocationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationScope::SameCity => "SAME_CITY",
            LocationScope::SameState => "SAME_STATE",
            LocationScope::SameCountry => "SAME_COUNTRY",
            LocationScope::Any => "ANY",
        }
    }
}

impl FromStr for LocationScope {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SAME_CITY" => Ok(LocationScope::SameCity),
            "SAME_STATE" => Ok(LocationScope::SameState),
            "SAME_COUNTRY" => Ok(LocationScope::SameCountry),
            "ANY" => Ok(LocationScope::Any),
            _ => Err(ParseEnumError { kind: "location scope", value: s.to_string() }),
        }
    }
}

/// Direction-specific decision one user made about another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwipeAction {
    Like,
    Dislike,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "LIKE",
            SwipeAction::Dislike => "DISLIKE",
        }
    }
}

impl FromStr for SwipeAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(SwipeAction::Like),
            "DISLIKE" => Ok(SwipeAction::Dislike),
            _ => Err(ParseEnumError { kind: "swipe action", value: s.to_string() }),
        }
    }
}

/// Account anchored by a wallet public key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub wallet_pub_key: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_premium: bool,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display attributes of a user, one per account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub age: i32,
    pub gender: Gender,
    pub orientation: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub profession: Option<String>,
    pub religion: Option<String>,
    pub height_cm: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a profile
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub display_name: String,
    pub age: i32,
    pub gender: Gender,
    pub orientation: String,
    pub bio: Option<String>,
    pub hobbies: Vec<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub profession: Option<String>,
    pub religion: Option<String>,
    pub height_cm: Option<i32>,
}

/// Partial profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub orientation: Option<String>,
    pub bio: Option<String>,
    pub hobbies: Option<Vec<String>>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub profession: Option<String>,
    pub religion: Option<String>,
    pub height_cm: Option<i32>,
}

impl ProfileUpdate {
    /// Apply the present fields onto a stored profile
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(name) = &self.display_name {
            profile.display_name = name.clone();
        }
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(orientation) = &self.orientation {
            profile.orientation = orientation.clone();
        }
        if self.bio.is_some() {
            profile.bio = self.bio.clone();
        }
        if let Some(hobbies) = &self.hobbies {
            profile.hobbies = hobbies.clone();
        }
        if self.country.is_some() {
            profile.country = self.country.clone();
        }
        if self.state.is_some() {
            profile.state = self.state.clone();
        }
        if self.city.is_some() {
            profile.city = self.city.clone();
        }
        if self.profession.is_some() {
            profile.profession = self.profession.clone();
        }
        if self.religion.is_some() {
            profile.religion = self.religion.clone();
        }
        if self.height_cm.is_some() {
            profile.height_cm = self.height_cm;
        }
    }
}

/// Stored matching preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub id: Uuid,
    pub user_id: Uuid,
    pub preferred_genders: Vec<Gender>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub location_scope: LocationScope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Preference values as submitted by the user
#[derive(Debug, Clone)]
pub struct NewPreferences {
    pub preferred_genders: Vec<Gender>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub location_scope: LocationScope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Catalog question users can answer on their profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: Uuid,
    pub category: String,
    pub question: String,
    pub is_active: bool,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewPromptAnswer {
    pub prompt_id: Uuid,
    pub answer: String,
}

/// A user's answer joined with the question it answers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnswerView {
    pub id: Uuid,
    pub prompt_id: Uuid,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swipe {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub action: SwipeAction,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Symmetric pairing, stored with `first_person_id < second_person_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub first_person_id: Uuid,
    pub second_person_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Result of recording a like
#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub swipe: Swipe,
    /// The other user has liked back
    pub is_match: bool,
    /// This call inserted the match row
    pub match_created: bool,
}

/// Compact card describing the other party of a like or match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub id: Uuid,
    pub wallet_pub_key: String,
    pub display_name: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedLike {
    pub swipe_id: Uuid,
    pub liked_at: DateTime<Utc>,
    pub user: UserCard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    #[serde(flatten)]
    pub card: UserCard,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    pub match_id: Uuid,
    pub matched_at: DateTime<Utc>,
    pub user: MatchedUser,
}

/// Name shown for users that never created a profile
pub const ANONYMOUS_NAME: &str = "Anonymous";
