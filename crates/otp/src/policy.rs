//! OTP lifecycle policy.
//!
//! [`decide`] answers "what should a request-an-OTP flow do right now", and
//! [`verify`] answers "is this supplied code acceptable". Both operate on a
//! caller-provided view of the latest ledger row and a caller-provided `now`,
//! and return verdicts only — the caller owns invalidation and persistence,
//! inside whatever transaction scope it is running.

use chrono::{DateTime, Duration, Utc};

/// View of the latest outstanding OTP for an identity, as read from a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutstandingOtp {
    /// When the OTP value was minted. Validity is measured from here.
    pub issued_at: DateTime<Utc>,
    /// When the OTP was last delivered. Cooldown is measured from here.
    /// Equal to `issued_at` unless the flow supports resending.
    pub last_sent_at: DateTime<Utc>,
    /// False once consumed or superseded.
    pub usable: bool,
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpDecision {
    /// Mint and deliver a fresh OTP. If a usable prior OTP exists the caller
    /// must invalidate it in the same transaction.
    IssueNew,
    /// Re-deliver the identical outstanding OTP and bump its last-sent time;
    /// no new ledger row.
    ResendSame,
    /// Within the cooldown window: deliver nothing, persist nothing.
    Reject,
}

/// Decide how to answer an OTP request.
///
/// Branches, in order:
/// 1. no prior request → issue new
/// 2. prior OTP consumed/superseded → issue new
/// 3. last delivery more recent than `cooldown` → reject
/// 4. prior OTP older than `validity` → issue new (superseding the prior)
/// 5. otherwise → resend the same OTP
pub fn decide(
    now: DateTime<Utc>,
    last: Option<&OutstandingOtp>,
    cooldown: Duration,
    validity: Duration,
) -> OtpDecision {
    let Some(last) = last else {
        return OtpDecision::IssueNew;
    };

    if !last.usable {
        return OtpDecision::IssueNew;
    }

    if now - last.last_sent_at < cooldown {
        return OtpDecision::Reject;
    }

    if now - last.issued_at > validity {
        return OtpDecision::IssueNew;
    }

    OtpDecision::ResendSame
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerdict {
    /// Code matches the outstanding OTP. The caller must invalidate the
    /// ledger row before reporting success — OTPs are single-use.
    Valid,
    /// OTP consumed, superseded, or past its validity window. When the row
    /// was still marked usable the caller must invalidate it.
    Expired,
    /// Code does not match. The row stays usable so the user may retry
    /// within the validity window.
    Mismatch,
    /// No request on record for this identity.
    NotFound,
}

/// Verify a supplied code against the latest ledger row.
///
/// `matches` compares the supplied code with the stored one — an argon2 hash
/// check for reset codes, a constant-time equality check for unsealed
/// verification codes. It is only invoked once the record is known to be
/// usable and within validity, so expired secrets are never compared.
pub fn verify<E>(
    now: DateTime<Utc>,
    record: Option<&OutstandingOtp>,
    validity: Duration,
    matches: impl FnOnce() -> Result<bool, E>,
) -> Result<OtpVerdict, E> {
    let Some(record) = record else {
        return Ok(OtpVerdict::NotFound);
    };

    if !record.usable {
        return Ok(OtpVerdict::Expired);
    }

    if now - record.issued_at > validity {
        return Ok(OtpVerdict::Expired);
    }

    if matches()? {
        Ok(OtpVerdict::Valid)
    }
    else {
        Ok(OtpVerdict::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: i64) -> Duration {
        Duration::minutes(m)
    }

    fn outstanding(issued_min_ago: i64, sent_min_ago: i64, usable: bool) -> OutstandingOtp {
        let now = Utc::now();
        OutstandingOtp {
            issued_at:    now - minutes(issued_min_ago),
            last_sent_at: now - minutes(sent_min_ago),
            usable,
        }
    }

    #[test]
    fn test_decide_no_prior_issues_new() {
        assert_eq!(decide(Utc::now(), None, minutes(2), minutes(15)), OtpDecision::IssueNew);
    }

    #[test]
    fn test_decide_consumed_prior_issues_new() {
        let last = outstanding(1, 1, false);
        assert_eq!(
            decide(Utc::now(), Some(&last), minutes(2), minutes(15)),
            OtpDecision::IssueNew
        );
    }

    #[test]
    fn test_decide_within_cooldown_rejects() {
        let last = outstanding(1, 1, true);
        assert_eq!(
            decide(Utc::now(), Some(&last), minutes(2), minutes(15)),
            OtpDecision::Reject
        );
    }

    #[test]
    fn test_decide_cooldown_elapsed_still_valid_resends() {
        let last = outstanding(5, 5, true);
        assert_eq!(
            decide(Utc::now(), Some(&last), minutes(2), minutes(15)),
            OtpDecision::ResendSame
        );
    }

    #[test]
    fn test_decide_cooldown_elapsed_past_validity_issues_new() {
        let last = outstanding(16, 16, true);
        assert_eq!(
            decide(Utc::now(), Some(&last), minutes(2), minutes(15)),
            OtpDecision::IssueNew
        );
    }

    #[test]
    fn test_decide_resent_recently_rejects_even_when_old() {
        // Issued long ago but redelivered a minute ago: cooldown wins, the
        // validity check never runs.
        let last = outstanding(14, 1, true);
        assert_eq!(
            decide(Utc::now(), Some(&last), minutes(2), minutes(15)),
            OtpDecision::Reject
        );
    }

    #[test]
    fn test_verify_not_found() {
        let verdict = verify::<()>(Utc::now(), None, minutes(15), || Ok(true)).unwrap();
        assert_eq!(verdict, OtpVerdict::NotFound);
    }

    #[test]
    fn test_verify_unusable_is_expired_without_comparing() {
        let record = outstanding(1, 1, false);
        let verdict = verify::<()>(Utc::now(), Some(&record), minutes(15), || {
            panic!("must not compare a consumed OTP")
        })
        .unwrap();
        assert_eq!(verdict, OtpVerdict::Expired);
    }

    #[test]
    fn test_verify_just_inside_validity_is_valid() {
        let record = outstanding(14, 14, true);
        let verdict = verify::<()>(Utc::now(), Some(&record), minutes(15), || Ok(true)).unwrap();
        assert_eq!(verdict, OtpVerdict::Valid);
    }

    #[test]
    fn test_verify_past_validity_is_expired() {
        let record = outstanding(16, 16, true);
        let verdict = verify::<()>(Utc::now(), Some(&record), minutes(15), || {
            panic!("must not compare an expired OTP")
        })
        .unwrap();
        assert_eq!(verdict, OtpVerdict::Expired);
    }

    #[test]
    fn test_verify_mismatch_keeps_retrying_possible() {
        let record = outstanding(1, 1, true);
        let verdict = verify::<()>(Utc::now(), Some(&record), minutes(15), || Ok(false)).unwrap();
        assert_eq!(verdict, OtpVerdict::Mismatch);
    }

    #[test]
    fn test_verify_propagates_matcher_errors() {
        let record = outstanding(1, 1, true);
        let result = verify(Utc::now(), Some(&record), minutes(15), || Err("hash failure"));
        assert_eq!(result.unwrap_err(), "hash failure");
    }
}
