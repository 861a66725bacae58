//! Authentication handlers
//!
//! Sign in, sign up, sign out, and the forgot/reset password pages. Each
//! answers with where the browser should go next.

use axum::Json;
use evently_service::dto::{
    ForgotPasswordRequest, MessageResponse, RedirectResponse, ResetPasswordRequest,
    SignInRequest, SignUpRequest,
};
use evently_service::Route;
use tracing::info;

use crate::extractors::{CurrentSession, ValidatedJson};
use crate::response::ApiResult;

/// Sign in with email and password
///
/// POST /auth/sign-in
pub async fn sign_in(
    session: CurrentSession,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<RedirectResponse>> {
    let _guard = session.manager.begin("sign-in")?;
    let route = session
        .manager
        .sign_in(&request.email, &request.password)
        .await?;
    Ok(Json(RedirectResponse::to(route.path())))
}

/// Create an account
///
/// POST /auth/sign-up
pub async fn sign_up(
    session: CurrentSession,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> ApiResult<Json<RedirectResponse>> {
    let _guard = session.manager.begin("sign-up")?;
    let route = session
        .manager
        .sign_up(
            &request.email,
            &request.password,
            &request.first_name,
            &request.last_name,
        )
        .await?;

    let response = RedirectResponse::to(route.path());
    Ok(Json(if route == Route::Login {
        response.with_message("Check your email to confirm your account, then sign in.")
    } else {
        response.with_message("Account created successfully.")
    }))
}

/// Sign out
///
/// POST /auth/sign-out
pub async fn sign_out(session: CurrentSession) -> ApiResult<Json<RedirectResponse>> {
    let route = session.manager.sign_out().await?;
    Ok(Json(RedirectResponse::to(route.path())))
}

/// Send a password reset link
///
/// POST /auth/forgot-password
pub async fn forgot_password(
    session: CurrentSession,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let _guard = session.manager.begin("forgot-password")?;
    session.manager.request_password_reset(&request.email).await?;
    Ok(Json(MessageResponse::new(
        "Check your email for a link to reset your password.",
    )))
}

/// Set a new password
///
/// POST /auth/reset-password
///
/// The browser arrives from the recovery link with the link's tokens, which
/// are adopted as the session before the password is changed.
pub async fn reset_password(
    session: CurrentSession,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<RedirectResponse>> {
    let _guard = session.manager.begin("reset-password")?;

    if let Some(recovery) = &request.recovery {
        session
            .manager
            .recover_session(&recovery.access_token, &recovery.refresh_token)
            .await?;
    }

    let route = session.manager.reset_password(&request.password).await?;
    info!(session = %session.manager.key(), "Password reset completed");

    Ok(Json(
        RedirectResponse::to(route.path()).with_message("Your password has been updated."),
    ))
}
