//! Pallet movement form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::transaction::{FieldChoice, TransactionFieldPlan, TransactionType, plan_fields};
use crate::forms::{FieldErrors, FormError, Touched, push_error, retain_touched, validate_fields};

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Raw values of the transaction form.
pub struct TransactionForm {
    #[validate(length(min = 1, message = "select a transaction type"))]
    pub transaction_type: String,
    #[validate(length(min = 1, message = "select a pallet type"))]
    pub pallet_type: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Payload sent to `POST /transactions/create`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub pallet_type: String,
    pub quantity: i64,
    pub source: String,
    pub destination: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TransactionForm {
    /// Movement type currently selected, if it is a known one.
    pub fn kind(&self) -> Option<TransactionType> {
        self.transaction_type.parse().ok()
    }

    /// Field layout for the current movement type.
    pub fn plan(&self, branches: &[FieldChoice]) -> Option<TransactionFieldPlan> {
        self.kind().map(|kind| plan_fields(kind, branches))
    }

    /// Validates the static constraints plus the movement-dependent ones.
    pub fn errors(&self, branches: &[FieldChoice], touched: Option<&Touched>) -> FieldErrors {
        let mut errors = validate_fields(self, None);

        if !self.transaction_type.trim().is_empty() && self.kind().is_none() {
            push_error(&mut errors, "transaction_type", "unknown transaction type");
        }

        if let Some(plan) = self.plan(branches) {
            for (field, options, value) in [
                ("source", &plan.source, &self.source),
                ("destination", &plan.destination, &self.destination),
                ("reason", &plan.reason, &self.reason),
            ] {
                if let Err(message) = options.check(value) {
                    push_error(&mut errors, field, message);
                }
            }
        }

        retain_touched(errors, touched)
    }

    /// Validates on submit and builds the payload, filling fixed fields.
    pub fn into_payload(self, branches: &[FieldChoice]) -> Result<NewTransaction, FormError> {
        let errors = self.errors(branches, None);
        if !errors.is_empty() {
            return Err(FormError::Invalid(errors));
        }

        let kind = self
            .kind()
            .ok_or_else(|| FormError::InvalidTransactionType(self.transaction_type.clone()))?;
        let plan = plan_fields(kind, branches);

        Ok(NewTransaction {
            transaction_type: kind,
            pallet_type: self.pallet_type.trim().to_string(),
            quantity: self.quantity,
            source: plan.source.resolve(&self.source),
            destination: plan.destination.resolve(&self.destination),
            reason: plan.reason.resolve(&self.reason),
            note: self
                .note
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::ADJUSTMENT_DESTINATION;

    fn branches() -> Vec<FieldChoice> {
        vec![FieldChoice::new("1", "North"), FieldChoice::new("2", "South")]
    }

    fn inbound() -> TransactionForm {
        TransactionForm {
            transaction_type: "inbound".to_string(),
            pallet_type: "EUR".to_string(),
            quantity: 10,
            source: "ACME Supplies".to_string(),
            destination: "1".to_string(),
            ..TransactionForm::default()
        }
    }

    #[test]
    fn valid_inbound_builds_payload_with_fixed_reason() {
        let payload = inbound().into_payload(&branches()).unwrap();
        assert_eq!(payload.transaction_type, TransactionType::Inbound);
        assert_eq!(payload.reason, "receipt");
        assert_eq!(payload.destination, "1");
        assert!(payload.note.is_none());
    }

    #[test]
    fn destination_must_be_an_offered_branch() {
        let form = TransactionForm {
            destination: "9".to_string(),
            ..inbound()
        };
        let errors = form.errors(&branches(), None);
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["destination"]);
    }

    #[test]
    fn adjustment_requires_reason_and_fixes_destination() {
        let form = TransactionForm {
            transaction_type: "adjustment".to_string(),
            source: "2".to_string(),
            destination: String::new(),
            reason: String::new(),
            ..inbound()
        };
        let errors = form.errors(&branches(), None);
        assert!(errors.contains_key("reason"));
        assert!(!errors.contains_key("destination"));

        let form = TransactionForm {
            reason: "damaged".to_string(),
            ..form
        };
        let payload = form.into_payload(&branches()).unwrap();
        assert_eq!(payload.destination, ADJUSTMENT_DESTINATION);
    }

    #[test]
    fn touched_filter_hides_other_fields() {
        let form = TransactionForm {
            quantity: 0,
            source: String::new(),
            ..inbound()
        };
        let touched: Touched = ["quantity".to_string()].into_iter().collect();
        let errors = form.errors(&branches(), Some(&touched));
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["quantity"]);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let form = TransactionForm {
            transaction_type: "transfer".to_string(),
            ..inbound()
        };
        assert!(matches!(
            form.into_payload(&branches()),
            Err(FormError::Invalid(errors)) if errors.contains_key("transaction_type")
        ));
    }
}
