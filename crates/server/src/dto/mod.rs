//! # Data Transfer Objects
//!
//! Request and response types for the API surface. Request bodies use
//! `validator` derives; handlers validate before touching a service and
//! surface failures as field-level `validationErrors` in the envelope.

pub mod auth;
pub mod users;
pub mod verification;

use error::ValidationIssue;
use validator::ValidationErrors;

/// Flatten validator output into envelope validation issues.
pub fn validation_issues(errors: ValidationErrors) -> Vec<ValidationIssue> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors
                .iter()
                .map(|e| {
                    ValidationIssue {
                        field:   field.to_string(),
                        message: e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Invalid value".to_string()),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn test_validation_issues_carry_field_and_message() {
        let probe = Probe {
            email: "not-an-email".to_string(),
        };
        let issues = validation_issues(probe.validate().unwrap_err());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "email");
        assert_eq!(issues[0].message, "Invalid email format");
    }
}
