//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep every field optional so a missing field produces a
//! field-level `invalid_request` error instead of a generic decode failure.

use serde_json::json;

use crate::domain::{Error, LoginValidationError, UserValidationError};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidChoice,
    EmptyUsername,
    UsernameTooLong,
    EmptyPassword,
    InvalidEmail,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidChoice => "invalid_choice",
            Self::EmptyUsername => "empty_username",
            Self::UsernameTooLong => "username_too_long",
            Self::EmptyPassword => "empty_password",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
    )
}

/// Unwrap a required field or report it as missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_choice_error(field: FieldName, message: impl Into<String>) -> Error {
    field_error(field, message, ErrorCode::InvalidChoice)
}

/// Map credential validation failures to field-level errors.
pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    let message = err.to_string();
    match err {
        LoginValidationError::Username(UserValidationError::UsernameTooLong { .. }) => {
            field_error(FieldName::new("username"), message, ErrorCode::UsernameTooLong)
        }
        LoginValidationError::Username(_) => {
            field_error(FieldName::new("username"), message, ErrorCode::EmptyUsername)
        }
        LoginValidationError::EmptyPassword => {
            field_error(FieldName::new("password"), message, ErrorCode::EmptyPassword)
        }
        LoginValidationError::Email(_) => {
            field_error(FieldName::new("email"), message, ErrorCode::InvalidEmail)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<i64>(None, FieldName::new("number")).expect_err("missing");

        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(err.message(), "missing required field: number");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "number", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn present_fields_pass_through() {
        assert_eq!(require(Some(3), FieldName::new("number")).ok(), Some(3));
    }

    #[rstest]
    #[case(LoginValidationError::Username(UserValidationError::EmptyUsername), "username", "empty_username")]
    #[case(
        LoginValidationError::Username(UserValidationError::UsernameTooLong { max: 150 }),
        "username",
        "username_too_long"
    )]
    #[case(LoginValidationError::EmptyPassword, "password", "empty_password")]
    #[case(LoginValidationError::Email(UserValidationError::InvalidEmail), "email", "invalid_email")]
    fn credential_errors_map_to_fields(
        #[case] err: LoginValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = login_validation_error(err);
        let details = mapped.details().expect("details");

        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }
}
