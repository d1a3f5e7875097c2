use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::domain::{
    Gender, LocationScope, NewPreferences, NewProfile, NewPromptAnswer, ProfileUpdate,
};

/// Request to register a wallet
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Wallet public key is required"))]
    #[serde(rename = "walletPublicKey", default)]
    pub wallet_public_key: String,
}

/// Request to create a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, message = "Public key is required"))]
    pub public_key: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 18, max = 120, message = "Age must be between 18 and 120"))]
    pub age: i32,
    pub bio: Option<String>,
    pub gender: Gender,
    #[validate(length(min = 1, message = "Orientation is required"))]
    pub orientation: String,
    #[validate(range(min = 50, max = 300, message = "Height must be between 50 and 300 cm"))]
    pub height_cm: Option<i32>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub profession: Option<String>,
    pub religion: Option<String>,
}

impl CreateProfileRequest {
    pub fn into_new_profile(self) -> NewProfile {
        NewProfile {
            display_name: self.name,
            age: self.age,
            gender: self.gender,
            orientation: self.orientation,
            bio: self.bio,
            hobbies: self.hobbies,
            country: self.country,
            state: self.state,
            city: self.city,
            profession: self.profession,
            religion: self.religion,
            height_cm: self.height_cm,
        }
    }
}

/// Request to update a profile; absent fields stay as stored
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Public key is required"))]
    pub public_key: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(range(min = 18, max = 120, message = "Age must be between 18 and 120"))]
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    #[validate(length(min = 1, message = "Orientation is required"))]
    pub orientation: Option<String>,
    #[validate(range(min = 50, max = 300, message = "Height must be between 50 and 300 cm"))]
    pub height_cm: Option<i32>,
    pub hobbies: Option<Vec<String>>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub profession: Option<String>,
    pub religion: Option<String>,
}

impl UpdateProfileRequest {
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            display_name: self.name.clone(),
            age: self.age,
            gender: self.gender,
            orientation: self.orientation.clone(),
            bio: self.bio.clone(),
            hobbies: self.hobbies.clone(),
            country: self.country.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            profession: self.profession.clone(),
            religion: self.religion.clone(),
            height_cm: self.height_cm,
        }
    }
}

/// Request to create or replace matching preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_age_bounds"))]
pub struct PreferencesRequest {
    pub preferred_genders: Vec<Gender>,
    #[validate(range(min = 18, message = "Minimum age must be at least 18"))]
    pub age_min: Option<i32>,
    #[validate(range(max = 120, message = "Maximum age must be realistic"))]
    pub age_max: Option<i32>,
    pub location_scope: LocationScope,
}

fn validate_age_bounds(req: &PreferencesRequest) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (req.age_min, req.age_max) {
        if min > max {
            let mut err = ValidationError::new("age_bounds");
            err.message = Some("ageMin must not exceed ageMax".into());
            return Err(err);
        }
    }
    Ok(())
}

impl PreferencesRequest {
    pub fn into_new_preferences(self) -> NewPreferences {
        NewPreferences {
            preferred_genders: self.preferred_genders,
            age_min: self.age_min,
            age_max: self.age_max,
            location_scope: self.location_scope,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnswerInput {
    pub prompt_id: Uuid,
    #[validate(length(min = 1, message = "Answer is required"))]
    pub answer: String,
}

/// Request to answer one or more catalog prompts
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerPromptsRequest {
    #[validate(length(min = 1, message = "At least one answer is required"), nested)]
    pub answers: Vec<PromptAnswerInput>,
}

impl AnswerPromptsRequest {
    pub fn into_answers(self) -> Vec<NewPromptAnswer> {
        self.answers
            .into_iter()
            .map(|a| NewPromptAnswer {
                prompt_id: a.prompt_id,
                answer: a.answer,
            })
            .collect()
    }
}

/// Like or report target, given as a user id or wallet public key
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1, message = "Target user public key (toWhom) is required"))]
    #[serde(rename = "toWhom", default)]
    pub to_whom: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddPhotoRequest {
    #[validate(url(message = "Photo url must be a valid URL"))]
    pub url: String,
    #[validate(range(min = 0, message = "Photo order must not be negative"))]
    pub order: Option<i32>,
}
