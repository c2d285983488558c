//! Integration tests for the password-reset flows: request throttling,
//! OTP verification, single-use invalidation and enumeration safety.

mod common;

use common::{harness, harness_with, reset_config, verification_config};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use server::{dto::auth::SignupRequest, services, store};

async fn signed_up(h: &common::TestHarness, email: &str) -> String {
    let result = services::auth::sign_up(
        &h.state,
        None,
        SignupRequest {
            first_name: "Ada".to_string(),
            last_name:  "Lovelace".to_string(),
            email:      email.to_string(),
            password:   "CorrectHorse9".to_string(),
        },
    )
    .await
    .unwrap();

    result.data.unwrap().user.id
}

#[tokio::test]
async fn request_persists_one_row_and_delivers_one_otp() {
    let h = harness().await;
    let user_id = signed_up(&h, "ada@example.com").await;
    let baseline = h.mailer.sent_count();

    let result = services::auth::request_reset_password(&h.state, None, "ada@example.com", Some("203.0.113.7"))
        .await
        .unwrap();

    assert!(result.is_success);
    assert_eq!(h.mailer.sent_count(), baseline + 1);

    let user_uuid = uuid::Uuid::parse_str(&user_id).unwrap();
    let rows = store::password_resets::count_for_user(&h.state.db, user_uuid).await.unwrap();
    assert_eq!(rows, 1);

    let email = h.mailer.last_email().unwrap();
    assert!(email.body.contains("203.0.113.7"));
    assert!(email.otp().is_some());
}

#[tokio::test]
async fn second_request_inside_cooldown_is_success_shaped_but_inert() {
    let h = harness().await;
    let user_id = signed_up(&h, "ada@example.com").await;

    services::auth::request_reset_password(&h.state, None, "ada@example.com", None)
        .await
        .unwrap();
    let after_first = h.mailer.sent_count();

    let second = services::auth::request_reset_password(&h.state, None, "ada@example.com", None)
        .await
        .unwrap();

    // Same success shape as the issuing path, nothing sent, nothing stored.
    assert!(second.is_success);
    assert_eq!(second.http_status_code, 200);
    assert_eq!(h.mailer.sent_count(), after_first);

    let user_uuid = uuid::Uuid::parse_str(&user_id).unwrap();
    let rows = store::password_resets::count_for_user(&h.state.db, user_uuid).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn unknown_email_is_indistinguishable_from_success() {
    let h = harness().await;

    let result = services::auth::request_reset_password(&h.state, None, "nobody@example.com", None)
        .await
        .unwrap();

    assert!(result.is_success);
    assert_eq!(result.http_status_code, 200);
    assert!(result.error.is_none());
    assert_eq!(h.mailer.sent_count(), 0);
}

#[tokio::test]
async fn full_reset_flow_changes_the_password_once() {
    let h = harness().await;
    signed_up(&h, "ada@example.com").await;

    services::auth::request_reset_password(&h.state, None, "ada@example.com", None)
        .await
        .unwrap();
    let otp = h.mailer.last_otp().unwrap();

    let result = services::auth::reset_password(&h.state, None, "ada@example.com", &otp, "NewPassword42")
        .await
        .unwrap();
    assert!(result.is_success);
    assert!(result.data.unwrap().message.contains("reset"));

    // Old credential is dead, new one works.
    let old = services::auth::sign_in(&h.state, None, "ada@example.com", "CorrectHorse9")
        .await
        .unwrap();
    assert_eq!(old.error.unwrap().code, "IncorrectUserCredential");

    let new = services::auth::sign_in(&h.state, None, "ada@example.com", "NewPassword42")
        .await
        .unwrap();
    assert!(new.is_success);

    // The OTP was single-use: replaying it reports expiry, not mismatch.
    let replay = services::auth::reset_password(&h.state, None, "ada@example.com", &otp, "AnotherPass7")
        .await
        .unwrap();
    assert_eq!(replay.error.unwrap().code, "ExpiredOTP");
}

#[tokio::test]
async fn wrong_otp_is_blurred_and_leaves_the_record_usable() {
    let h = harness().await;
    signed_up(&h, "ada@example.com").await;

    services::auth::request_reset_password(&h.state, None, "ada@example.com", None)
        .await
        .unwrap();
    let otp = h.mailer.last_otp().unwrap();

    let wrong = services::auth::reset_password(&h.state, None, "ada@example.com", "000000000000", "NewPassword42")
        .await
        .unwrap();
    assert_eq!(wrong.error.unwrap().code, "InvalidOTP");

    // A retry with the real OTP still succeeds.
    let retry = services::auth::reset_password(&h.state, None, "ada@example.com", &otp, "NewPassword42")
        .await
        .unwrap();
    assert!(retry.is_success);
}

#[tokio::test]
async fn unknown_user_and_missing_request_share_the_mismatch_shape() {
    let h = harness().await;
    signed_up(&h, "ada@example.com").await;

    // No reset request was ever issued for this account.
    let no_request = services::auth::reset_password(&h.state, None, "ada@example.com", "whatever", "NewPassword42")
        .await
        .unwrap();

    // And this account does not exist at all.
    let no_user = services::auth::reset_password(&h.state, None, "nobody@example.com", "whatever", "NewPassword42")
        .await
        .unwrap();

    let a = no_request.error.unwrap();
    let b = no_user.error.unwrap();
    assert_eq!(a.code, "InvalidOTP");
    assert_eq!(a.code, b.code);
    assert_eq!(a.message, b.message);
}

#[tokio::test]
async fn expired_otp_is_rejected_and_becomes_unusable() {
    let mut reset = reset_config();
    reset.validity_minutes = 0;
    reset.cooldown_minutes = 0;
    let h = harness_with(reset, verification_config()).await;
    signed_up(&h, "ada@example.com").await;

    services::auth::request_reset_password(&h.state, None, "ada@example.com", None)
        .await
        .unwrap();
    let otp = h.mailer.last_otp().unwrap();

    // With a zero validity window the OTP is already stale.
    let expired = services::auth::reset_password(&h.state, None, "ada@example.com", &otp, "NewPassword42")
        .await
        .unwrap();
    assert_eq!(expired.error.unwrap().code, "ExpiredOTP");

    // The record was invalidated as a side effect: the correct OTP now
    // reports expiry too, never mismatch.
    let again = services::auth::reset_password(&h.state, None, "ada@example.com", &otp, "NewPassword42")
        .await
        .unwrap();
    assert_eq!(again.error.unwrap().code, "ExpiredOTP");
}

#[tokio::test]
async fn reissue_after_cooldown_supersedes_the_previous_otp() {
    let mut reset = reset_config();
    reset.cooldown_minutes = 0;
    let h = harness_with(reset, verification_config()).await;
    let user_id = signed_up(&h, "ada@example.com").await;

    services::auth::request_reset_password(&h.state, None, "ada@example.com", None)
        .await
        .unwrap();
    let first_otp = h.mailer.last_otp().unwrap();

    services::auth::request_reset_password(&h.state, None, "ada@example.com", None)
        .await
        .unwrap();
    let second_otp = h.mailer.last_otp().unwrap();

    assert_ne!(first_otp, second_otp);

    // Two ledger rows, and only the newest is still usable.
    let user_uuid = uuid::Uuid::parse_str(&user_id).unwrap();
    let rows = entity::password_reset_requests::Entity::find()
        .filter(entity::password_reset_requests::Column::UserId.eq(user_uuid))
        .order_by_asc(entity::password_reset_requests::Column::CreatedAt)
        .all(&h.state.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(!rows[0].is_otp_usable);
    assert!(rows[1].is_otp_usable);

    // The superseded OTP no longer verifies; the fresh one does.
    let stale = services::auth::reset_password(&h.state, None, "ada@example.com", &first_otp, "NewPassword42")
        .await
        .unwrap();
    assert!(!stale.is_success);

    let fresh = services::auth::reset_password(&h.state, None, "ada@example.com", &second_otp, "NewPassword42")
        .await
        .unwrap();
    assert!(fresh.is_success);
}
