//! Email-verification flows.
//!
//! Unlike the reset flow, a request landing after the cooldown but inside
//! the validity window re-delivers the *identical* OTP (unsealed from the
//! ledger) and bumps only the last-sent timestamp. A cooldown rejection here
//! is a visible 400 — this endpoint does not blur the outcome the way the
//! reset request does, since the email is not yet tied to an account.

use chrono::Utc;
use error::{AppError, DomainError, Result, ServiceResult};
use otp::{OtpDecision, OtpVerdict, OutstandingOtp};
use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::{debug, info};

use crate::{AppState, email::templates, store};

/// Issue, re-deliver, or refuse a verification OTP for an email.
pub async fn request_email_verification(
    state: &AppState,
    urid: Option<String>,
    email: &str,
    request_ip: Option<&str>,
) -> Result<ServiceResult<()>> {
    let txn = state.db.begin().await?;

    let latest = store::email_verifications::latest_for_email(&txn, email).await?;
    let outstanding = latest.as_ref().map(|row| {
        OutstandingOtp {
            issued_at:    row.created_at,
            last_sent_at: row.requested_at,
            usable:       row.is_otp_usable,
        }
    });

    let now = Utc::now();
    let decision = otp::decide(
        now,
        outstanding.as_ref(),
        state.verification.cooldown(),
        state.verification.validity(),
    );

    if decision == OtpDecision::Reject {
        debug!("Verification request inside cooldown");
        txn.rollback().await?;
        return Ok(ServiceResult::rejected(
            urid,
            DomainError::RetryNotAllowedWithinCoolDownPeriod,
        ));
    }

    if decision == OtpDecision::ResendSame {
        if let Some(row) = &latest {
            let otp_value = state.sealing_key.open(&row.otp_sealed, email)?;

            let (subject, body) = templates::verification_otp(request_ip, &otp_value);
            let receipt = state.mailer.send(&state.email_from, email, &subject, &body).await?;
            if receipt.accepted {
                store::email_logs::record(
                    &txn,
                    None,
                    receipt.provider_message_id.as_deref(),
                    &state.email_from,
                    email,
                    &subject,
                    &body,
                )
                .await?;
            }

            store::email_verifications::touch_requested_at(&txn, row.id, now).await?;
            txn.commit().await?;

            debug!("Re-sent outstanding verification OTP");

            return Ok(ServiceResult::ok_empty(urid));
        }
    }

    // Fresh issue: supersede a usable prior row, mint, deliver, persist.
    if let Some(prev) = latest.filter(|row| row.is_otp_usable) {
        store::email_verifications::invalidate(&txn, prev.id).await?;
    }

    let otp_value = otp::generate(state.verification.otp_length, &state.verification.otp_alphabet);

    let (subject, body) = templates::verification_otp(request_ip, &otp_value);
    let receipt = state.mailer.send(&state.email_from, email, &subject, &body).await?;
    if receipt.accepted {
        store::email_logs::record(
            &txn,
            None,
            receipt.provider_message_id.as_deref(),
            &state.email_from,
            email,
            &subject,
            &body,
        )
        .await?;
    }

    let sealed = state.sealing_key.seal(&otp_value, email)?;
    store::email_verifications::insert(&txn, email, request_ip, sealed, now).await?;

    txn.commit().await?;

    info!("Verification OTP issued");

    Ok(ServiceResult::ok_empty(urid))
}

/// Verify an email with a supplied OTP, in a transaction of its own.
pub async fn verify_email(
    state: &AppState,
    urid: Option<String>,
    email: &str,
    supplied_otp: &str,
) -> Result<ServiceResult<()>> {
    let txn = state.db.begin().await?;
    let result = verify_email_within(&txn, state, urid, email, supplied_otp).await?;
    txn.commit().await?;
    Ok(result)
}

/// Verify an email inside a caller-supplied scope, so a larger flow (e.g. a
/// future signup-with-verification) can fold this step into its own
/// transaction.
pub async fn verify_email_within<C: ConnectionTrait>(
    conn: &C,
    state: &AppState,
    urid: Option<String>,
    email: &str,
    supplied_otp: &str,
) -> Result<ServiceResult<()>> {
    let Some(row) = store::email_verifications::latest_for_email(conn, email).await? else {
        debug!("Verify-email without a request on record");
        return Ok(ServiceResult::rejected(
            urid,
            DomainError::NoEmailVerificationRequestFound,
        ));
    };

    let outstanding = OutstandingOtp {
        issued_at:    row.created_at,
        last_sent_at: row.requested_at,
        usable:       row.is_otp_usable,
    };

    let verdict = otp::verify(
        Utc::now(),
        Some(&outstanding),
        state.verification.validity(),
        || -> Result<bool, AppError> {
            let stored = state.sealing_key.open(&row.otp_sealed, email)?;
            Ok(constant_time_eq(&stored, supplied_otp))
        },
    )?;

    match verdict {
        OtpVerdict::NotFound => Ok(ServiceResult::rejected(
            urid,
            DomainError::NoEmailVerificationRequestFound,
        )),
        OtpVerdict::Expired => {
            if row.is_otp_usable {
                store::email_verifications::invalidate(conn, row.id).await?;
            }
            debug!("Verify-email with expired OTP");
            Ok(ServiceResult::rejected(urid, DomainError::EmailVerificationOtpExpired))
        },
        OtpVerdict::Mismatch => {
            debug!("Verify-email with mismatching OTP");
            Ok(ServiceResult::rejected(urid, DomainError::InvalidEmailVerificationOtp))
        },
        OtpVerdict::Valid => {
            store::email_verifications::invalidate(conn, row.id).await?;
            info!("Email verified");
            Ok(ServiceResult::ok_empty(urid))
        },
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    a.as_bytes().ct_eq(b.as_bytes()).into()
}
