use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{ApiResponse, LikeResult, ReportResult, SwipeRequest};
use crate::routes::AppState;

/// Configure swipe, like and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/user/swipe/{publicKey}/like", web::post().to(like))
        .route("/user/swipe/{publicKey}/report", web::post().to(report))
        .route("/user/swipe/{publicKey}/likes", web::get().to(received_likes))
        .route("/user/swipe/{publicKey}/matches", web::get().to(matches));
}

/// Like another user
///
/// POST /api/user/swipe/{publicKey}/like
///
/// Request body:
/// ```json
/// { "toWhom": "user id or wallet public key" }
/// ```
async fn like(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SwipeRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let outcome = state.service.like(&path, &req.to_whom).await?;

    let message = if outcome.is_match {
        "It's a match!"
    } else {
        "User liked successfully"
    };

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(LikeResult {
            is_match: outcome.is_match,
            swipe_id: outcome.swipe.id,
        })
        .with_message(message),
    ))
}

/// Report (dislike) another user
///
/// POST /api/user/swipe/{publicKey}/report
///
/// Request body:
/// ```json
/// { "toWhom": "user id or wallet public key" }
/// ```
async fn report(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SwipeRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let swipe = state.service.report(&path, &req.to_whom).await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(ReportResult { swipe_id: swipe.id }).with_message("User reported successfully"),
    ))
}

async fn received_likes(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let likes = state.service.received_likes(&path).await?;
    let count = likes.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(likes).with_count(count)))
}

async fn matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let matches = state.service.matches(&path).await?;
    let count = matches.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(matches).with_count(count)))
}
