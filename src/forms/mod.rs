//! Form definitions and the pure validation step the screens run on submit
//! or blur.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use validator::{Validate, ValidationErrors};

pub mod login;
pub mod transaction;

/// Field name → messages to show next to it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Fields the user has interacted with.
pub type Touched = BTreeSet<String>;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("form has invalid fields: {}", describe(.0))]
    Invalid(FieldErrors),

    #[error("invalid transaction type: {0}")]
    InvalidTransactionType(String),
}

fn describe(errors: &FieldErrors) -> String {
    errors.keys().cloned().collect::<Vec<_>>().join(", ")
}

/// Flattens validator output into per-field messages.
pub fn collect_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Validates `form` and keeps only errors for touched fields.
///
/// Passing `None` reports every field, which is what a submit does.
pub fn validate_fields<F: Validate>(form: &F, touched: Option<&Touched>) -> FieldErrors {
    let errors = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => collect_errors(&errors),
    };
    retain_touched(errors, touched)
}

pub(crate) fn retain_touched(mut errors: FieldErrors, touched: Option<&Touched>) -> FieldErrors {
    if let Some(touched) = touched {
        errors.retain(|field, _| touched.contains(field));
    }
    errors
}

pub(crate) fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}
