use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::{FieldErrors, FormError, Touched, validate_fields};

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
/// Credentials submitted on the sign-in screen.
pub struct LoginForm {
    #[validate(length(min = 1, message = "enter your username"))]
    pub username: String,
    #[validate(length(min = 1, message = "enter your password"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn errors(&self, touched: Option<&Touched>) -> FieldErrors {
        validate_fields(self, touched)
    }

    /// Full validation as run on submit.
    pub fn check(&self) -> Result<(), FormError> {
        let errors = self.errors(None);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(errors))
        }
    }
}
