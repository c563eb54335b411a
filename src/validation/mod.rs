//! Client-side form validation.
//!
//! Forms are checked before anything is sent. Failures are reported per field
//! so the front end can show them inline next to the input.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{LoginRequest, RegisterRequest};

pub const REQUIRED: &str = "Required!!!";
pub const COMMENT_EMPTY: &str = "Comment cannot be sent empty";
pub const POST_EMPTY: &str = "Post cannot be empty";

/// Validation failures keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.0.insert(field.to_string(), message.to_string());
        errors
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The messages alone, as shown in a notification.
    pub fn summary(&self) -> String {
        self.0.values().cloned().collect::<Vec<_>>().join("; ")
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = BTreeMap::new();
        for (field, failures) in errors.field_errors() {
            let messages: Vec<String> = failures
                .iter()
                .map(|failure| {
                    failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string())
                })
                .collect();
            // an empty field only reports that it is required
            let message = messages
                .iter()
                .find(|m| m.as_str() == REQUIRED)
                .or_else(|| messages.first())
                .cloned();
            if let Some(message) = message {
                out.insert(camel_case(&field), message);
            }
        }
        FieldErrors(out)
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED)));
    }
    Ok(())
}

/// Login form values.
#[derive(Debug, Clone, Default, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[validate(
        custom(function = "required"),
        email(message = "Invalid Email!!!")
    )]
    pub email: String,
    #[validate(custom(function = "required"))]
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> Result<LoginRequest, FieldErrors> {
        self.validate()?;
        Ok(LoginRequest {
            email: self.email,
            password: self.password,
        })
    }
}

/// Registration form values.
#[derive(Debug, Clone, Default, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(custom(function = "required"))]
    pub first_name: String,
    #[validate(custom(function = "required"))]
    pub last_name: String,
    #[validate(
        custom(function = "required"),
        email(message = "Invalid Email!!!")
    )]
    pub email: String,
    #[validate(
        custom(function = "required"),
        length(min = 8, message = "Password must have atleast 8 characters")
    )]
    pub password: String,
    #[validate(
        custom(function = "required"),
        must_match(other = "password", message = "Password does not match")
    )]
    pub confirm_password: String,
    #[serde(default)]
    pub picture_path: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub occupation: String,
}

impl RegisterForm {
    pub fn into_request(self) -> Result<RegisterRequest, FieldErrors> {
        self.validate()?;
        Ok(RegisterRequest {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            picture_path: self.picture_path,
            location: self.location,
            occupation: self.occupation,
        })
    }
}

/// Require a non-empty text input. Whitespace counts as text.
pub fn require_text(field: &str, value: &str, message: &str) -> Result<(), FieldErrors> {
    if value.is_empty() {
        return Err(FieldErrors::single(field, message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterForm {
        RegisterForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "analytical".into(),
            confirm_password: "analytical".into(),
            ..RegisterForm::default()
        }
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            email: "ada@example.com".into(),
            password: "x".into(),
        };
        let request = form.into_request().unwrap();
        assert_eq!(request.email, "ada@example.com");
    }

    #[test]
    fn test_login_empty_fields_report_required_only() {
        let errors = LoginForm::default().into_request().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some(REQUIRED));
        assert_eq!(errors.get("password"), Some(REQUIRED));
    }

    #[test]
    fn test_login_invalid_email() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        let errors = form.into_request().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid Email!!!"));
        assert_eq!(errors.get("password"), None);
    }

    #[test]
    fn test_register_valid_builds_request() {
        let request = valid_register().into_request().unwrap();
        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.location, "");
    }

    #[test]
    fn test_register_short_password() {
        let form = RegisterForm {
            password: "short".into(),
            confirm_password: "short".into(),
            ..valid_register()
        };
        let errors = form.into_request().unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must have atleast 8 characters")
        );
        assert_eq!(errors.get("confirmPassword"), None);
    }

    #[test]
    fn test_register_confirmation_mismatch() {
        let form = RegisterForm {
            confirm_password: "different1".into(),
            ..valid_register()
        };
        let errors = form.into_request().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirmPassword"), Some("Password does not match"));
    }

    #[test]
    fn test_register_missing_names() {
        let form = RegisterForm {
            first_name: String::new(),
            last_name: String::new(),
            ..valid_register()
        };
        let errors = form.into_request().unwrap_err();
        assert_eq!(errors.get("firstName"), Some(REQUIRED));
        assert_eq!(errors.get("lastName"), Some(REQUIRED));
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("comment", "hi", COMMENT_EMPTY).is_ok());
        assert!(require_text("comment", "   ", COMMENT_EMPTY).is_ok());
        let errors = require_text("comment", "", COMMENT_EMPTY).unwrap_err();
        assert_eq!(errors.get("comment"), Some(COMMENT_EMPTY));
        assert_eq!(errors.to_string(), "comment: Comment cannot be sent empty");
        assert_eq!(errors.summary(), COMMENT_EMPTY);
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("confirm_password"), "confirmPassword");
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("firstName"), "firstName");
    }
}
