//! # API Router Configuration
//!
//! Wires the HTTP surface to the flow services. Handlers validate the body,
//! call the service, and serve the returned envelope with its own status
//! code; infrastructure failures collapse to a generic error envelope with
//! nothing internal leaked.

use axum::{
    Json, Router,
    extract::{Extension, State},
    http::HeaderMap,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use error::{AppError, DomainError, ServiceResult, ValidationIssue};
use logging::RequestId;
use tracing::error;
use validator::Validate;

use crate::{
    AppState,
    dto::{
        auth::{
            RenewAccessTokenRequest, RequestResetPasswordRequest, ResetPasswordRequest, SigninRequest, SignupRequest,
        },
        validation_issues,
        verification::{RequestEmailVerificationRequest, VerifyEmailRequest},
    },
    middleware::auth::AuthenticatedUser,
    services,
};

/// Creates the API router with all routes.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/users/me", get(me_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::authorize,
        ));

    let public_routes = Router::new()
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/signin", post(signin_handler))
        .route("/api/auth/renew-access-token", post(renew_access_token_handler))
        .route("/api/auth/request-reset-password", post(request_reset_password_handler))
        .route("/api/auth/reset-password", post(reset_password_handler))
        .route(
            "/api/verification/request-email-verification",
            post(request_email_verification_handler),
        )
        .route("/api/verification/verify-email", post(verify_email_handler))
        .fallback(not_found_handler);

    public_routes
        .merge(protected_routes)
        .layer(middleware::from_fn(crate::middleware::request_id::assign_request_id))
        .with_state(state)
}

/// Best-effort client address, for the OTP ledger and email bodies.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    })
}

/// Collapse an infrastructure failure into the generic error envelope.
fn internal(urid: Option<String>, err: AppError) -> Response {
    error!(error = %err, "Unhandled service failure");
    ServiceResult::<()>::rejected(urid, DomainError::SomethingWentWrong).into_response()
}

/// Check a new password against the strength policy, reporting violations as
/// field-level validation issues.
fn weak_password_issues(field: &str, password: &str) -> Option<Vec<ValidationIssue>> {
    auth::password::validate_password_strength(password).err().map(|violations| {
        violations
            .iter()
            .map(|violation| {
                ValidationIssue {
                    field:   field.to_string(),
                    message: violation.to_string(),
                }
            })
            .collect()
    })
}

async fn not_found_handler(Extension(request_id): Extension<RequestId>) -> Response {
    ServiceResult::<()>::rejected(Some(request_id.into_string()), DomainError::ResourceNotFound).into_response()
}

async fn signup_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<SignupRequest>,
) -> Response {
    let urid = Some(request_id.into_string());

    if let Err(errors) = req.validate() {
        return ServiceResult::<()>::invalid(urid, validation_issues(errors)).into_response();
    }

    if let Some(issues) = weak_password_issues("password", &req.password) {
        return ServiceResult::<()>::invalid(urid, issues).into_response();
    }

    match services::auth::sign_up(&state, urid.clone(), req).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}

async fn signin_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<SigninRequest>,
) -> Response {
    let urid = Some(request_id.into_string());

    if let Err(errors) = req.validate() {
        return ServiceResult::<()>::invalid(urid, validation_issues(errors)).into_response();
    }

    match services::auth::sign_in(&state, urid.clone(), &req.email, &req.password).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}

async fn renew_access_token_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<RenewAccessTokenRequest>,
) -> Response {
    let urid = Some(request_id.into_string());

    if let Err(errors) = req.validate() {
        return ServiceResult::<()>::invalid(urid, validation_issues(errors)).into_response();
    }

    match services::auth::renew_access_token(&state, urid.clone(), &req.refresh_token).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}

async fn request_reset_password_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(req): Json<RequestResetPasswordRequest>,
) -> Response {
    let urid = Some(request_id.into_string());

    if let Err(errors) = req.validate() {
        return ServiceResult::<()>::invalid(urid, validation_issues(errors)).into_response();
    }

    let ip = client_ip(&headers);
    match services::auth::request_reset_password(&state, urid.clone(), &req.email, ip.as_deref()).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}

async fn reset_password_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<ResetPasswordRequest>,
) -> Response {
    let urid = Some(request_id.into_string());

    if let Err(errors) = req.validate() {
        return ServiceResult::<()>::invalid(urid, validation_issues(errors)).into_response();
    }

    if let Some(issues) = weak_password_issues("newPassword", &req.new_password) {
        return ServiceResult::<()>::invalid(urid, issues).into_response();
    }

    match services::auth::reset_password(&state, urid.clone(), &req.email, &req.otp, &req.new_password).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}

async fn request_email_verification_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(req): Json<RequestEmailVerificationRequest>,
) -> Response {
    let urid = Some(request_id.into_string());

    if let Err(errors) = req.validate() {
        return ServiceResult::<()>::invalid(urid, validation_issues(errors)).into_response();
    }

    let ip = client_ip(&headers);
    match services::verification::request_email_verification(&state, urid.clone(), &req.email, ip.as_deref()).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}

async fn verify_email_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<VerifyEmailRequest>,
) -> Response {
    let urid = Some(request_id.into_string());

    if let Err(errors) = req.validate() {
        return ServiceResult::<()>::invalid(urid, validation_issues(errors)).into_response();
    }

    match services::verification::verify_email(&state, urid.clone(), &req.email, &req.otp).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}

async fn me_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response {
    let urid = Some(request_id.into_string());

    match services::users::get_user_details(&state, urid.clone(), &user.id).await {
        Ok(result) => result.into_response(),
        Err(err) => internal(urid, err),
    }
}
