use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{
    AddPhotoRequest, AnswerPromptsRequest, ApiResponse, CreateProfileRequest, CreateUserRequest,
    PreferencesRequest, PreferencesSaved, ProfileSaved, PromptsAnswered, Suggestion,
    UpdateProfileRequest, UserCreated,
};
use crate::routes::AppState;
use crate::services::PAYMENT_HEADER;

/// Configure account, profile and suggestion routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/user", web::post().to(create_user))
        .route("/user/profile", web::post().to(create_profile))
        .route("/user/profile", web::put().to(update_profile))
        .route("/user/{publicKey}", web::get().to(get_user))
        .route("/user/{publicKey}/preferences", web::post().to(create_preferences))
        .route("/user/{publicKey}/preferences", web::put().to(update_preferences))
        .route("/user/{publicKey}/preferences", web::get().to(get_preferences))
        .route("/user/{publicKey}/prompts", web::get().to(list_prompts))
        .route("/user/{publicKey}/prompts", web::post().to(answer_prompts))
        .route("/user/{publicKey}/photos", web::get().to(list_photos))
        .route("/user/{publicKey}/photos", web::post().to(add_photo))
        .route("/user/{publicKey}/next-suggestion", web::get().to(next_suggestion));
}

/// Register a wallet
///
/// POST /api/user
///
/// Request body:
/// ```json
/// { "walletPublicKey": "string" }
/// ```
async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let user = state.service.create_user(&req.wallet_public_key).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(UserCreated {
        user_id: user.id,
        message: "User created successfully".to_string(),
    })))
}

async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let details = state.service.get_user(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(details)))
}

/// Create the profile for a registered wallet
///
/// POST /api/user/profile
///
/// Request body:
/// ```json
/// {
///   "publicKey": "string",
///   "name": "string",
///   "age": 28,
///   "gender": "FEMALE",
///   "orientation": "string",
///   "bio": "string",
///   "heightCm": 170,
///   "hobbies": ["string"],
///   "country": "string",
///   "state": "string",
///   "city": "string",
///   "profession": "string",
///   "religion": "string"
/// }
/// ```
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let req = req.into_inner();
    let wallet = req.public_key.clone();
    let profile = state.service.create_profile(&wallet, req.into_new_profile()).await?;

    tracing::info!("Created profile {} for {}", profile.id, wallet);

    Ok(HttpResponse::Created().json(ApiResponse::ok(ProfileSaved {
        profile_id: profile.id,
        message: "Profile created successfully".to_string(),
    })))
}

/// Update an existing profile; omitted fields keep their value
///
/// PUT /api/user/profile
///
/// Request body:
/// ```json
/// { "publicKey": "string", "name": "string", "age": 29, "city": "string" }
/// ```
async fn update_profile(
    state: web::Data<AppState>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let profile = state
        .service
        .update_profile(&req.public_key, &req.to_update())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileSaved {
        profile_id: profile.id,
        message: "Profile updated successfully".to_string(),
    })))
}

/// Store matching preferences, once per user
///
/// POST /api/user/{publicKey}/preferences
///
/// Request body:
/// ```json
/// {
///   "preferredGenders": ["FEMALE", "NON_BINARY"],
///   "ageMin": 21,
///   "ageMax": 35,
///   "locationScope": "SAME_CITY"
/// }
/// ```
async fn create_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<PreferencesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let preferences = state
        .service
        .create_preferences(&path, req.into_inner().into_new_preferences())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PreferencesSaved {
        preferences_id: preferences.id,
        message: "Preferences saved successfully".to_string(),
    })))
}

async fn update_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<PreferencesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let preferences = state
        .service
        .update_preferences(&path, req.into_inner().into_new_preferences())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PreferencesSaved {
        preferences_id: preferences.id,
        message: "Preferences updated successfully".to_string(),
    })))
}

async fn get_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let preferences = state.service.get_preferences(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(preferences)))
}

async fn list_prompts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let prompts = state.service.list_prompts(&path).await?;
    let count = prompts.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(prompts.as_slice()).with_count(count)))
}

/// Answer catalog prompts
///
/// POST /api/user/{publicKey}/prompts
///
/// Request body:
/// ```json
/// { "answers": [{ "promptId": "uuid", "answer": "string" }] }
/// ```
async fn answer_prompts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<AnswerPromptsRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let stored = state
        .service
        .answer_prompts(&path, req.into_inner().into_answers())
        .await?;

    Ok(HttpResponse::Ok()
        .json(ApiResponse::ok(PromptsAnswered { stored }).with_message("Prompt answers saved")))
}

async fn list_photos(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let photos = state.service.list_photos(&path).await?;
    let count = photos.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(photos).with_count(count)))
}

/// Attach a photo; `order` defaults to the next free slot
///
/// POST /api/user/{publicKey}/photos
///
/// Request body:
/// ```json
/// { "url": "https://...", "order": 0 }
/// ```
async fn add_photo(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<AddPhotoRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let photo = state.service.add_photo(&path, &req.url, req.order).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(photo)))
}

/// Next candidate for the requester
///
/// GET /api/user/{publicKey}/next-suggestion
///
/// When payments are enabled the request is admitted by the payment gate
/// first, either with an `X-PAYMENT` signature or an escrow charge.
async fn next_suggestion(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let wallet = path.into_inner();

    if let Some(gate) = &state.payment {
        // Missing user or profile is a 404 before anything is charged
        state.service.suggestion_requester(&wallet).await?;

        let payment = http_req
            .headers()
            .get(PAYMENT_HEADER)
            .and_then(|v| v.to_str().ok());
        gate.authorize(&wallet, payment).await?;
    }

    match state.service.next_suggestion(&wallet).await? {
        Some(suggestion) => Ok(HttpResponse::Ok().json(ApiResponse::ok(Some(suggestion)))),
        None => Ok(HttpResponse::Ok().json(
            ApiResponse::ok(Option::<Suggestion>::None).with_message("No more suggestions available"),
        )),
    }
}
