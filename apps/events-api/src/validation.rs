//! Request body validation
//!
//! Each validator checks every field and reports all failures at once as a
//! list of [`FieldError`]s, which the error layer renders as a 400.

use chrono::{DateTime, Utc};

use crate::error::{ApiError, FieldError};
use crate::models::{Credentials, CredentialsPayload, EventFields, EventPayload};

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_LOCATION_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Validate email format (basic validation)
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email must be at most {} characters", MAX_EMAIL_LEN));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| "Email must contain @".to_string())?;

    if local.is_empty() {
        return Err("Email local part cannot be empty".to_string());
    }

    if domain.contains('@') {
        return Err("Invalid email format".to_string());
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Email domain must contain a dot".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Email cannot contain whitespace".to_string());
    }

    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a signup body: well-formed email and a non-empty password
pub fn validate_signup(payload: CredentialsPayload) -> Result<Credentials, ApiError> {
    let email = normalize_email(&payload.email);
    let mut errors = Vec::new();

    if let Err(message) = validate_email(&email) {
        errors.push(FieldError::new("email", message));
    }

    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if payload.password.len() > MAX_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at most {} characters", MAX_PASSWORD_LEN),
        ));
    }

    finish(errors, || Credentials {
        email,
        password: payload.password,
    })
}

/// Validate a login body
///
/// Only presence is checked; format problems are reported as bad
/// credentials by the store so the response leaks nothing about accounts.
pub fn validate_login(payload: CredentialsPayload) -> Result<Credentials, ApiError> {
    let email = normalize_email(&payload.email);
    let mut errors = Vec::new();

    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    }

    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    finish(errors, || Credentials {
        email,
        password: payload.password,
    })
}

/// Validate an event body for create and update
pub fn validate_event(payload: EventPayload) -> Result<EventFields, ApiError> {
    let name = payload.name.trim().to_string();
    let location = payload.location.trim().to_string();
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at most {} characters", MAX_NAME_LEN),
        ));
    }

    if payload.description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(FieldError::new(
            "description",
            format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            ),
        ));
    }

    if location.chars().count() > MAX_LOCATION_LEN {
        errors.push(FieldError::new(
            "location",
            format!("Location must be at most {} characters", MAX_LOCATION_LEN),
        ));
    }

    let date_time = match payload.date_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                errors.push(FieldError::new(
                    "date_time",
                    "Must be an RFC 3339 timestamp, e.g. 2025-01-01T15:30:00Z",
                ));
                None
            }
        },
    };

    finish(errors, || EventFields {
        name,
        description: payload.description,
        location,
        date_time,
    })
}

/// Parse an event id from a path segment
pub fn parse_event_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid event ID: {}", raw)))
}

fn finish<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(value())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn field_names(err: ApiError) -> Vec<&'static str> {
        match err {
            ApiError::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user.name@example.co.uk").is_ok());
        assert!(validate_email("a@x.com").is_ok());

        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("user@domain.").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("a b@c.com").is_err());
    }

    #[test]
    fn signup_normalizes_email() {
        let creds = validate_signup(CredentialsPayload {
            email: "  A@X.com ".to_string(),
            password: "pw123".to_string(),
        })
        .unwrap();

        assert_eq!(creds.email, "a@x.com");
        assert_eq!(creds.password, "pw123");
    }

    #[test]
    fn signup_reports_every_bad_field() {
        let err = validate_signup(CredentialsPayload::default()).unwrap_err();
        assert_eq!(field_names(err), vec!["email", "password"]);

        let err = validate_signup(CredentialsPayload {
            email: "a@x.com".to_string(),
            password: "x".repeat(MAX_PASSWORD_LEN + 1),
        })
        .unwrap_err();
        assert_eq!(field_names(err), vec!["password"]);
    }

    #[test]
    fn login_only_requires_presence() {
        assert!(validate_login(CredentialsPayload {
            email: "not-an-email".to_string(),
            password: "pw".to_string(),
        })
        .is_ok());

        let err = validate_login(CredentialsPayload {
            email: "   ".to_string(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(field_names(err), vec!["email", "password"]);
    }

    #[test]
    fn event_with_only_name_is_valid() {
        let fields = validate_event(EventPayload {
            name: " Meetup ".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            fields,
            EventFields {
                name: "Meetup".to_string(),
                description: String::new(),
                location: String::new(),
                date_time: None,
            }
        );
    }

    #[test]
    fn event_date_time_is_parsed_to_utc() {
        let fields = validate_event(EventPayload {
            name: "Meetup".to_string(),
            date_time: Some("2025-06-01T18:00:00+02:00".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            fields.date_time.unwrap().to_rfc3339(),
            "2025-06-01T16:00:00+00:00"
        );
    }

    #[test]
    fn event_reports_every_bad_field() {
        let err = validate_event(EventPayload {
            name: String::new(),
            description: "d".repeat(MAX_DESCRIPTION_LEN + 1),
            location: "l".repeat(MAX_LOCATION_LEN + 1),
            date_time: Some("tomorrow".to_string()),
        })
        .unwrap_err();

        assert_eq!(
            field_names(err),
            vec!["name", "description", "location", "date_time"]
        );
    }

    #[test]
    fn event_ids_must_be_positive_integers() {
        assert_eq!(parse_event_id("1").unwrap(), 1);
        assert_eq!(parse_event_id("9000").unwrap(), 9000);

        for raw in ["0", "-1", "abc", "", "1.5", "99999999999999999999"] {
            assert!(
                matches!(parse_event_id(raw), Err(ApiError::BadRequest(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn generated_emails_are_accepted(
            local in "[a-z0-9._]{1,20}",
            domain in "[a-z]{2,10}",
            tld in "[a-z]{2,4}"
        ) {
            let email = format!("{}@{}.{}", local, domain, tld);
            prop_assert!(validate_email(&email).is_ok());
        }

        #[test]
        fn emails_without_at_are_rejected(s in "[a-z0-9.]{0,30}") {
            prop_assert!(validate_email(&s).is_err());
        }

        #[test]
        fn numeric_ids_round_trip(id in 1i64..i64::MAX) {
            prop_assert_eq!(parse_event_id(&id.to_string()).unwrap(), id);
        }
    }
}
