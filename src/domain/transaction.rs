//! Pallet movement types and the field options each of them offers.
//!
//! The transaction form changes shape with the selected movement type: an
//! inbound movement receives from a free-text supplier into a branch, an
//! outbound one dispatches from a branch to a free-text customer, and an
//! adjustment corrects a branch's count for a reason picked from a fixed list.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::record::{Entity, Record};
use crate::domain::types::TypeConstraintError;

/// Destination recorded for every adjustment.
pub const ADJUSTMENT_DESTINATION: &str = "adjustment";

/// Reasons accepted for a stock adjustment.
pub const ADJUSTMENT_REASONS: [&str; 4] = ["damaged", "lost", "found", "count_correction"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Inbound,
    Outbound,
    Adjustment,
}

impl TransactionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionType::Inbound => "inbound",
            TransactionType::Outbound => "outbound",
            TransactionType::Adjustment => "adjustment",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inbound" => Ok(TransactionType::Inbound),
            "outbound" => Ok(TransactionType::Outbound),
            "adjustment" => Ok(TransactionType::Adjustment),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

/// A selectable dropdown entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChoice {
    pub value: String,
    pub label: String,
}

impl FieldChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Builds a choice from a fetched record, labelled by `label_field` and
    /// falling back to the identifier.
    pub fn from_record(record: &Record, label_field: &str) -> Self {
        let label = record
            .field_text(label_field)
            .unwrap_or_else(|| record.id.to_string());
        Self::new(record.id.as_str(), label)
    }
}

/// How a single form field is populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldOptions {
    /// Field is locked to one value.
    Fixed { value: String },
    /// Field must take one of the offered values.
    Choice { options: Vec<FieldChoice> },
    /// Any non-empty text.
    FreeText,
}

impl FieldOptions {
    pub fn fixed(value: impl Into<String>) -> Self {
        FieldOptions::Fixed {
            value: value.into(),
        }
    }

    pub fn choice(options: Vec<FieldChoice>) -> Self {
        FieldOptions::Choice { options }
    }

    /// Checks a submitted value, returning the message to show when it is
    /// not acceptable.
    pub fn check(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        match self {
            FieldOptions::Fixed { value: expected } => {
                if value.is_empty() || value == expected {
                    Ok(())
                } else {
                    Err(format!("must be \"{expected}\""))
                }
            }
            FieldOptions::Choice { options } => {
                if value.is_empty() {
                    Err("select a value".to_string())
                } else if options.iter().any(|option| option.value == value) {
                    Ok(())
                } else {
                    Err("select one of the offered values".to_string())
                }
            }
            FieldOptions::FreeText => {
                if value.is_empty() {
                    Err("this field is required".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Value to submit for a field, filling fixed fields automatically.
    pub fn resolve(&self, value: &str) -> String {
        match self {
            FieldOptions::Fixed { value: fixed } => fixed.clone(),
            _ => value.trim().to_string(),
        }
    }
}

/// Field options for the movement-dependent part of the transaction form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionFieldPlan {
    pub source: FieldOptions,
    pub destination: FieldOptions,
    pub reason: FieldOptions,
}

/// Derives the form layout for a movement type from the available branches.
pub fn plan_fields(kind: TransactionType, branches: &[FieldChoice]) -> TransactionFieldPlan {
    match kind {
        TransactionType::Inbound => TransactionFieldPlan {
            source: FieldOptions::FreeText,
            destination: FieldOptions::choice(branches.to_vec()),
            reason: FieldOptions::fixed("receipt"),
        },
        TransactionType::Outbound => TransactionFieldPlan {
            source: FieldOptions::choice(branches.to_vec()),
            destination: FieldOptions::FreeText,
            reason: FieldOptions::fixed("dispatch"),
        },
        TransactionType::Adjustment => TransactionFieldPlan {
            source: FieldOptions::choice(branches.to_vec()),
            destination: FieldOptions::fixed(ADJUSTMENT_DESTINATION),
            reason: FieldOptions::choice(
                ADJUSTMENT_REASONS
                    .iter()
                    .map(|reason| FieldChoice::new(*reason, reason.replace('_', " ")))
                    .collect(),
            ),
        },
    }
}
