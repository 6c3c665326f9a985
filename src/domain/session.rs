//! User session and the sign-up / sign-in forms that create it.
//!
//! The session is a UI flag, not a verified identity.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::validation::{FieldErrors, FormValues, Rule, Schema, EMAIL_PATTERN};

/// Signed-in user, held for the lifetime of the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
}

impl UserSession {
    /// Name for the welcome line: first name, falling back to email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.first_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }
}

pub mod fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const AGREE_TO_TERMS: &str = "agreeToTerms";
}

const PASSWORD_COMPLEXITY: &str =
    "Password must contain at least one uppercase letter, one lowercase letter, and one number";

pub fn sign_up_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        use fields::*;
        Schema::new()
            .field(
                FIRST_NAME,
                vec![
                    Rule::Required("First name is required"),
                    Rule::MinLength(2, "First name must be at least 2 characters"),
                ],
            )
            .field(
                LAST_NAME,
                vec![
                    Rule::Required("Last name is required"),
                    Rule::MinLength(2, "Last name must be at least 2 characters"),
                ],
            )
            .field(
                EMAIL,
                vec![
                    Rule::Required("Email is required"),
                    Rule::pattern(EMAIL_PATTERN, "Please enter a valid email"),
                ],
            )
            .field(
                PASSWORD,
                vec![
                    Rule::Required("Password is required"),
                    Rule::MinLength(8, "Password must be at least 8 characters"),
                    Rule::pattern("[a-z]", PASSWORD_COMPLEXITY),
                    Rule::pattern("[A-Z]", PASSWORD_COMPLEXITY),
                    Rule::pattern(r"\d", PASSWORD_COMPLEXITY),
                ],
            )
            .field(
                CONFIRM_PASSWORD,
                vec![
                    Rule::Required("Please confirm your password"),
                    Rule::EqualsField(PASSWORD, "Passwords must match"),
                ],
            )
            .field(
                AGREE_TO_TERMS,
                vec![Rule::Checked("You must agree to the terms and conditions")],
            )
    })
}

pub fn sign_in_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        use fields::*;
        Schema::new()
            .field(
                EMAIL,
                vec![
                    Rule::Required("Email is required"),
                    Rule::pattern(EMAIL_PATTERN, "Please enter a valid email"),
                ],
            )
            .field(PASSWORD, vec![Rule::Required("Password is required")])
    })
}

/// Validated sign-up request. The password is wiped on drop.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// # Errors
    /// Returns every failing sign-up field.
    pub fn parse(values: &FormValues) -> Result<Self, FieldErrors> {
        use fields::*;
        sign_up_schema().validate(values)?;
        Ok(Self {
            first_name: values.get(FIRST_NAME).trim().to_string(),
            last_name: values.get(LAST_NAME).trim().to_string(),
            email: values.get(EMAIL).trim().to_string(),
            password: values.get(PASSWORD).to_string(),
        })
    }
}

/// Validated sign-in request. The password is wiped on drop.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// # Errors
    /// Returns every failing sign-in field.
    pub fn parse(values: &FormValues) -> Result<Self, FieldErrors> {
        use fields::*;
        sign_in_schema().validate(values)?;
        Ok(Self {
            email: values.get(EMAIL).trim().to_string(),
            password: values.get(PASSWORD).to_string(),
        })
    }
}

// Passwords never reach Debug output.
impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::fields::*;
    use super::*;

    fn sign_up_values() -> FormValues {
        FormValues::new()
            .with(FIRST_NAME, "Jane")
            .with(LAST_NAME, "Doe")
            .with(EMAIL, "jane@example.com")
            .with(PASSWORD, "Secret123")
            .with(CONFIRM_PASSWORD, "Secret123")
            .with(AGREE_TO_TERMS, "true")
    }

    #[test]
    fn test_sign_up_accepts_strong_matching_passwords() {
        let reg = Registration::parse(&sign_up_values()).expect("Should validate");
        assert_eq!(reg.first_name, "Jane");
        assert_eq!(reg.email, "jane@example.com");
    }

    #[test]
    fn test_sign_up_rejects_mismatch() {
        let values = sign_up_values().with(CONFIRM_PASSWORD, "Secret124");
        let errors = Registration::parse(&values).expect_err("Should reject");
        assert_eq!(errors.get(CONFIRM_PASSWORD), Some("Passwords must match"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_password_rules() {
        let schema = sign_up_schema();
        let check =
            |pw: &str| schema.validate_field(PASSWORD, &sign_up_values().with(PASSWORD, pw));

        assert_eq!(check("Ab1"), Some("Password must be at least 8 characters"));
        assert_eq!(check("alllower1"), Some(PASSWORD_COMPLEXITY));
        assert_eq!(check("ALLUPPER1"), Some(PASSWORD_COMPLEXITY));
        assert_eq!(check("NoDigitsHere"), Some(PASSWORD_COMPLEXITY));
        assert_eq!(check("GoodPass9"), None);
    }

    #[test]
    fn test_password_length_counts_whitespace() {
        let values = sign_up_values()
            .with(PASSWORD, "Abcdef1 ")
            .with(CONFIRM_PASSWORD, "Abcdef1 ");
        let reg = Registration::parse(&values).expect("8 characters including the space");
        assert_eq!(reg.password, "Abcdef1 ");

        let short = sign_up_values()
            .with(PASSWORD, "Abcde1 ")
            .with(CONFIRM_PASSWORD, "Abcde1 ");
        let errors = Registration::parse(&short).expect_err("7 characters");
        assert_eq!(errors.get(PASSWORD), Some("Password must be at least 8 characters"));
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let values = sign_up_values().with(AGREE_TO_TERMS, "false");
        let errors = Registration::parse(&values).expect_err("Should reject");
        assert_eq!(
            errors.get(AGREE_TO_TERMS),
            Some("You must agree to the terms and conditions")
        );
    }

    #[test]
    fn test_sign_in() {
        let values = FormValues::new().with(EMAIL, "jane@example.com").with(PASSWORD, "x");
        let creds = Credentials::parse(&values).expect("Should validate");
        assert_eq!(creds.email, "jane@example.com");

        let errors = Credentials::parse(&FormValues::new().with(EMAIL, "nope"))
            .expect_err("Should reject");
        assert_eq!(errors.get(EMAIL), Some("Please enter a valid email"));
        assert_eq!(errors.get(PASSWORD), Some("Password is required"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let reg = Registration::parse(&sign_up_values()).expect("Should validate");
        let out = format!("{reg:?}");
        assert!(!out.contains("Secret123"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut session = UserSession {
            first_name: Some("Jane".to_string()),
            last_name: None,
            email: "jane@example.com".to_string(),
        };
        assert_eq!(session.display_name(), "Jane");
        session.first_name = None;
        assert_eq!(session.display_name(), "jane@example.com");
    }
}
