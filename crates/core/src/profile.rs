//! User profiles: account types, sign-up and profile-update input checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Maximum stored length of a mobile number.
pub const MAX_MOBILE_LENGTH: u64 = 32;

// ---------------------------------------------------------------------------
// UserType
// ---------------------------------------------------------------------------

/// Whether an account gives food away or receives it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Donor,
    Recipient,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Donor => "donor",
            UserType::Recipient => "recipient",
        }
    }
}

impl FromStr for UserType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(UserType::Donor),
            "recipient" => Ok(UserType::Recipient),
            other => Err(CoreError::Validation(format!("Unknown user type: '{other}'"))),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sign-up
// ---------------------------------------------------------------------------

/// Registration form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpInput {
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub user_type: UserType,
}

impl SignUpInput {
    /// Field rules plus the cross-field checks the derive cannot express.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        if self.full_name.trim().is_empty() {
            return Err(CoreError::Validation("Full name is required".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(CoreError::Validation("Passwords don't match".to_string()));
        }
        Ok(())
    }

    /// Email as stored: trimmed and lowercased.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Profile update
// ---------------------------------------------------------------------------

/// Editable profile fields. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 200, message = "Full name is too long"))]
    pub full_name: Option<String>,
    #[validate(length(max = 32, message = "Mobile number must be at most 32 characters"))]
    pub mobile: Option<String>,
}

impl ProfileUpdate {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        if self.full_name.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(CoreError::Validation("Full name cannot be blank".to_string()));
        }
        if self.mobile.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(CoreError::Validation("Mobile number cannot be blank".to_string()));
        }
        Ok(())
    }

    /// Copy with provided values trimmed.
    pub fn trimmed(&self) -> ProfileUpdate {
        ProfileUpdate {
            full_name: self.full_name.as_deref().map(|s| s.trim().to_string()),
            mobile: self.mobile.as_deref().map(|s| s.trim().to_string()),
        }
    }
}
