use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{FormError, PolicyViolation};
use crate::form::{InputType, Page};

/// Keeps a password field's masking in step with a "show password" checkbox.
#[derive(Debug, Clone)]
pub struct VisibilityToggle {
    checkbox_id: String,
    password_id: String,
}

impl VisibilityToggle {
    pub const CHECKBOX_ID: &str = "check";
    pub const PASSWORD_ID: &str = "password";

    /// Resolves both elements up front so a broken page fails here rather
    /// than on the first click.
    pub fn bind(page: &Page, checkbox_id: &str, password_id: &str) -> Result<Self, FormError> {
        page.require_checkbox(checkbox_id)?;
        page.require_input(password_id)?;

        debug!(checkbox_id, password_id, "visibility toggle bound");
        Ok(Self {
            checkbox_id: checkbox_id.to_string(),
            password_id: password_id.to_string(),
        })
    }

    /// Binds the ids used by the login form.
    pub fn login(page: &Page) -> Result<Self, FormError> {
        Self::bind(page, Self::CHECKBOX_ID, Self::PASSWORD_ID)
    }

    /// Change handler: checked shows the password, unchecked masks it.
    pub fn on_change(&self, page: &mut Page) -> Result<InputType, FormError> {
        let input_type = if page.is_checked(&self.checkbox_id)? {
            InputType::Text
        } else {
            InputType::Password
        };

        page.set_input_type(&self.password_id, input_type)?;
        Ok(input_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 12,
        }
    }
}

impl PasswordPolicy {
    /// Reports the first rule `password` breaks.
    pub fn check(&self, password: &str) -> Result<(), PolicyViolation> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(PolicyViolation::TooShort(self.min_length));
        }
        if length > self.max_length {
            return Err(PolicyViolation::TooLong(self.max_length));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyViolation::MissingDigit);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PolicyViolation::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PolicyViolation::MissingUppercase);
        }
        // Only ASCII letters count as letters; accented ones are special.
        if !password
            .chars()
            .any(|c| !(c.is_ascii_alphabetic() || c.is_numeric() || c.is_whitespace()))
        {
            return Err(PolicyViolation::MissingSpecial);
        }

        Ok(())
    }
}
