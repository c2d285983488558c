//! Signup, signin, token renewal and the password-reset flows.

use auth::{
    TokenPair,
    password::{hash_secret, verify_secret},
    tokens,
};
use chrono::Utc;
use error::{DomainError, Result, ServiceResult};
use otp::{OtpDecision, OtpVerdict, OutstandingOtp};
use sea_orm::TransactionTrait;
use secrecy::SecretString;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    dto::auth::{MessageData, SignupData, SignupRequest},
    email::templates,
    store,
};

/// Create an account, issue its first token pair, and send a welcome email.
///
/// The uniqueness check and the insert share one transaction, so two
/// concurrent signups for the same email cannot both pass the check. The
/// welcome email is best-effort: a delivery failure is logged, never rolled
/// back into the signup.
pub async fn sign_up(state: &AppState, urid: Option<String>, input: SignupRequest) -> Result<ServiceResult<SignupData>> {
    let txn = state.db.begin().await?;

    if store::users::find_by_email(&txn, &input.email).await?.is_some() {
        debug!("Signup aborted: email already registered");
        txn.rollback().await?;
        return Ok(ServiceResult::rejected(urid, DomainError::UserAlreadyExists));
    }

    let user_id = Uuid::new_v4();
    let password = SecretString::from(input.password);
    let password_hash = hash_secret(&password)?;

    let user = store::users::insert(
        &txn,
        user_id,
        &input.first_name,
        &input.last_name,
        &input.email,
        &password_hash,
    )
    .await?;

    let pair = tokens::issue_pair(&state.tokens, &user.id.to_string())?;

    let (subject, body) = templates::welcome(&user.first_name);
    match state.mailer.send(&state.email_from, &user.email, &subject, &body).await {
        Ok(receipt) if receipt.accepted => {
            store::email_logs::record(
                &txn,
                Some(user.id),
                receipt.provider_message_id.as_deref(),
                &state.email_from,
                &user.email,
                &subject,
                &body,
            )
            .await?;
        },
        Ok(_) => warn!(email = %user.email, "Welcome email was not accepted by the relay"),
        Err(err) => warn!(error = %err, "Failed to send welcome email"),
    }

    txn.commit().await?;

    info!(user_id = %user.id, "User signed up");

    Ok(ServiceResult::ok(
        urid,
        SignupData {
            user: user.into(),
            tokens: pair,
        },
    ))
}

/// Exchange credentials for a token pair.
///
/// Unknown email and wrong password produce the identical error so the
/// response never reveals which one was at fault.
pub async fn sign_in(state: &AppState, urid: Option<String>, email: &str, password: &str) -> Result<ServiceResult<TokenPair>> {
    let Some(user) = store::users::find_by_email(&state.db, email).await? else {
        debug!("Signin aborted: no account for email");
        return Ok(ServiceResult::rejected(urid, DomainError::IncorrectUserCredential));
    };

    let supplied = SecretString::from(password.to_string());
    if !verify_secret(&supplied, &user.password_hash)? {
        debug!("Signin aborted: password mismatch");
        return Ok(ServiceResult::rejected(urid, DomainError::IncorrectUserCredential));
    }

    let pair = tokens::issue_pair(&state.tokens, &user.id.to_string())?;

    info!(user_id = %user.id, "User signed in");

    Ok(ServiceResult::ok(urid, pair))
}

/// Mint a fresh token pair from a refresh token.
///
/// The old refresh token stays valid until it expires; there is no
/// server-side revocation state.
pub async fn renew_access_token(
    state: &AppState,
    urid: Option<String>,
    refresh_token: &str,
) -> Result<ServiceResult<TokenPair>> {
    let claims = match tokens::verify(&state.tokens, refresh_token) {
        Ok(claims) => claims,
        Err(_) => {
            debug!("Token renewal aborted: refresh token did not verify");
            return Ok(ServiceResult::rejected(urid, DomainError::InvalidRefreshToken));
        },
    };

    let pair = tokens::issue_pair(&state.tokens, &claims.uid)?;

    info!(user_id = %claims.uid, "Access token renewed");

    Ok(ServiceResult::ok(urid, pair))
}

/// Issue (or decline to issue) a password-reset OTP.
///
/// Every branch returns the same success-shaped envelope: an unknown email,
/// a cooldown rejection and a fresh issue are indistinguishable to the
/// caller, so the endpoint cannot be used to enumerate accounts. This flow
/// never re-delivers an old OTP — each qualifying request mints a new one
/// and supersedes the previous row.
pub async fn request_reset_password(
    state: &AppState,
    urid: Option<String>,
    email: &str,
    request_ip: Option<&str>,
) -> Result<ServiceResult<()>> {
    let txn = state.db.begin().await?;

    let Some(user) = store::users::find_by_email(&txn, email).await? else {
        debug!("Reset request for unknown email; reporting success");
        txn.rollback().await?;
        return Ok(ServiceResult::ok_empty(urid));
    };

    let latest = store::password_resets::latest_for_user(&txn, user.id).await?;
    let outstanding = latest.as_ref().map(|row| {
        OutstandingOtp {
            issued_at:    row.requested_at,
            last_sent_at: row.requested_at,
            usable:       row.is_otp_usable,
        }
    });

    let now = Utc::now();
    let decision = otp::decide(now, outstanding.as_ref(), state.reset.cooldown(), state.reset.validity());

    if decision == OtpDecision::Reject {
        debug!(user_id = %user.id, "Reset request inside cooldown; skipping email");
        txn.rollback().await?;
        return Ok(ServiceResult::ok_empty(urid));
    }

    // IssueNew and ResendSame both mint fresh here; the reset ledger stores
    // only a hash, so re-delivery of the old value is not possible.
    if let Some(prev) = latest.filter(|row| row.is_otp_usable) {
        store::password_resets::invalidate(&txn, prev.id).await?;
    }

    let otp_value = otp::generate(state.reset.otp_length, &state.reset.otp_alphabet);

    let (subject, body) = templates::reset_otp(&user.first_name, request_ip, &otp_value);
    let receipt = state.mailer.send(&state.email_from, &user.email, &subject, &body).await?;
    if receipt.accepted {
        store::email_logs::record(
            &txn,
            Some(user.id),
            receipt.provider_message_id.as_deref(),
            &state.email_from,
            &user.email,
            &subject,
            &body,
        )
        .await?;
    }

    let otp_hash = hash_secret(&SecretString::from(otp_value))?;
    store::password_resets::insert(&txn, user.id, &user.email, request_ip, now, &otp_hash).await?;

    txn.commit().await?;

    info!(user_id = %user.id, "Password reset OTP issued");

    Ok(ServiceResult::ok_empty(urid))
}

/// Confirm a password reset with an OTP and set the new password.
///
/// Runs as one transaction: the password update and the OTP invalidation
/// land together or not at all. Unknown user and never-issued OTP are
/// reported with the same blurred error a plain mismatch produces.
pub async fn reset_password(
    state: &AppState,
    urid: Option<String>,
    email: &str,
    supplied_otp: &str,
    new_password: &str,
) -> Result<ServiceResult<MessageData>> {
    let txn = state.db.begin().await?;

    let Some(user) = store::users::find_by_email(&txn, email).await? else {
        debug!("Reset confirm for unknown email");
        txn.rollback().await?;
        return Ok(ServiceResult::rejected(urid, DomainError::InvalidOtp));
    };

    let Some(latest) = store::password_resets::latest_for_user(&txn, user.id).await? else {
        debug!(user_id = %user.id, "Reset confirm without an issued OTP");
        txn.rollback().await?;
        return Ok(ServiceResult::rejected(urid, DomainError::InvalidOtp));
    };

    let outstanding = OutstandingOtp {
        issued_at:    latest.requested_at,
        last_sent_at: latest.requested_at,
        usable:       latest.is_otp_usable,
    };

    let supplied = SecretString::from(supplied_otp.to_string());
    let verdict = otp::verify(Utc::now(), Some(&outstanding), state.reset.validity(), || {
        verify_secret(&supplied, &latest.otp_hash)
    })?;

    match verdict {
        OtpVerdict::NotFound => {
            txn.rollback().await?;
            Ok(ServiceResult::rejected(urid, DomainError::InvalidOtp))
        },
        OtpVerdict::Expired => {
            // Invalidation of a timed-out OTP is an observable side effect
            // and must survive the rejection.
            if latest.is_otp_usable {
                store::password_resets::invalidate(&txn, latest.id).await?;
            }
            txn.commit().await?;
            debug!(user_id = %user.id, "Reset confirm with expired OTP");
            Ok(ServiceResult::rejected(urid, DomainError::ExpiredOtp))
        },
        OtpVerdict::Mismatch => {
            // Row stays usable; the user may retry within the validity window.
            txn.rollback().await?;
            debug!(user_id = %user.id, "Reset confirm with mismatching OTP");
            Ok(ServiceResult::rejected(urid, DomainError::InvalidOtp))
        },
        OtpVerdict::Valid => {
            let new_hash = hash_secret(&SecretString::from(new_password.to_string()))?;
            store::users::update_password(&txn, user.id, &new_hash).await?;
            store::password_resets::invalidate(&txn, latest.id).await?;
            txn.commit().await?;

            info!(user_id = %user.id, "Password reset completed");

            Ok(ServiceResult::ok(
                urid,
                MessageData {
                    message: "Password has been reset successfully.".to_string(),
                },
            ))
        },
    }
}
