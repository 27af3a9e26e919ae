//! Invoice create/edit form validation.
//!
//! Forms submit the customer as a string id, the amount in major units and
//! the status as a string. A valid form becomes a [`ValidatedInvoice`] with
//! typed fields and the amount in cents.

use std::borrow::Cow;

use invoicer_shared::error::FieldErrors;
use invoicer_shared::types::{Cents, CustomerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::invoice::types::InvoiceStatus;

/// Message attached to a missing or malformed customer.
pub const CUSTOMER_MESSAGE: &str = "Please select a customer.";
/// Message attached to a missing or non-positive amount.
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
/// Message attached to a missing or unsupported status.
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

/// Which form is being submitted; selects the summary message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    /// New invoice.
    Create,
    /// Edit of an existing invoice.
    Update,
}

impl FormPurpose {
    /// Summary message returned with field errors.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Create => "Missing Fields. Failed to Create Invoice.",
            Self::Update => "Missing Fields. Failed to Update Invoice.",
        }
    }
}

/// Raw invoice form as submitted by a client.
///
/// Missing fields deserialize to empty values so that they are reported
/// as field errors instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct InvoiceForm {
    /// Customer id as a string.
    #[serde(default, rename = "customerId", alias = "customer_id")]
    #[validate(length(min = 1, message = "Please select a customer."))]
    pub customer_id: String,

    /// Amount in major units.
    #[serde(default)]
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,

    /// Requested status.
    #[serde(default)]
    #[validate(custom(function = "validate_form_status"))]
    pub status: String,
}

/// Form input after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedInvoice {
    /// Referenced customer.
    pub customer_id: CustomerId,
    /// Amount in cents.
    pub amount: Cents,
    /// Requested status, always a form status.
    pub status: InvoiceStatus,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormErrors {
    /// Summary message for the form.
    pub message: String,
    /// Messages keyed by field name.
    pub fields: FieldErrors,
}

impl FormErrors {
    /// Creates an empty error set for the given form.
    #[must_use]
    pub fn new(purpose: FormPurpose) -> Self {
        Self {
            message: purpose.failure_message().to_string(),
            fields: FieldErrors::new(),
        }
    }

    /// Adds a message to a field, skipping duplicates.
    pub fn push(&mut self, field: &str, message: &str) {
        let messages = self.fields.entry(field.to_string()).or_default();
        if !messages.iter().any(|m| m == message) {
            messages.push(message.to_string());
        }
    }

    /// Error for a customer id that does not reference a stored customer.
    #[must_use]
    pub fn unknown_customer(purpose: FormPurpose) -> Self {
        let mut errors = Self::new(purpose);
        errors.push("customerId", CUSTOMER_MESSAGE);
        errors
    }

    /// Returns true if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("amount").with_message(Cow::Borrowed(AMOUNT_MESSAGE)))
    }
}

fn validate_form_status(status: &str) -> Result<(), ValidationError> {
    match InvoiceStatus::parse(status) {
        Some(s) if s.is_form_status() => Ok(()),
        _ => Err(ValidationError::new("status").with_message(Cow::Borrowed(STATUS_MESSAGE))),
    }
}

/// Maps the struct field name to the name clients submit.
fn client_field(field: &str) -> &str {
    match field {
        "customer_id" => "customerId",
        other => other,
    }
}

impl InvoiceForm {
    /// Validates the form and converts it into typed values.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` keyed by client field name when any field is
    /// missing or invalid.
    pub fn validate_for(&self, purpose: FormPurpose) -> Result<ValidatedInvoice, FormErrors> {
        let mut errors = FormErrors::new(purpose);

        if let Err(report) = self.validate() {
            for (field, field_errors) in report.field_errors() {
                for err in field_errors {
                    let message = err
                        .message
                        .as_deref()
                        .unwrap_or(purpose.failure_message());
                    errors.push(client_field(&field), message);
                }
            }
        }

        let customer_id = self.customer_id.trim().parse::<CustomerId>().ok();
        if customer_id.is_none() {
            errors.push("customerId", CUSTOMER_MESSAGE);
        }

        // Sub-cent amounts round to zero and are not positive once stored.
        let amount = Cents::from_major(self.amount)
            .ok()
            .filter(|cents| cents.value() > 0);
        if amount.is_none() {
            errors.push("amount", AMOUNT_MESSAGE);
        }

        let status = InvoiceStatus::parse(&self.status).filter(InvoiceStatus::is_form_status);

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) if errors.is_empty() => {
                Ok(ValidatedInvoice {
                    customer_id,
                    amount,
                    status,
                })
            }
            _ => {
                if status.is_none() {
                    errors.push("status", STATUS_MESSAGE);
                }
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn valid_form() -> InvoiceForm {
        InvoiceForm {
            customer_id: "3958dc9e-712f-4377-85e9-fec4b6a6442a".to_string(),
            amount: dec!(157.95),
            status: "pending".to_string(),
        }
    }

    #[test]
    fn test_valid_form_converts_amount_to_cents() {
        let validated = valid_form().validate_for(FormPurpose::Create).unwrap();
        assert_eq!(validated.amount, Cents(15795));
        assert_eq!(validated.status, InvoiceStatus::Pending);
        assert_eq!(
            validated.customer_id.to_string(),
            "3958dc9e-712f-4377-85e9-fec4b6a6442a"
        );
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = InvoiceForm::default()
            .validate_for(FormPurpose::Create)
            .unwrap_err();

        assert_eq!(errors.message, "Missing Fields. Failed to Create Invoice.");
        assert_eq!(errors.fields["customerId"], vec![CUSTOMER_MESSAGE]);
        assert_eq!(errors.fields["amount"], vec![AMOUNT_MESSAGE]);
        assert_eq!(errors.fields["status"], vec![STATUS_MESSAGE]);
    }

    #[test]
    fn test_update_message() {
        let form = InvoiceForm {
            amount: Decimal::ZERO,
            ..valid_form()
        };
        let errors = form.validate_for(FormPurpose::Update).unwrap_err();
        assert_eq!(errors.message, "Missing Fields. Failed to Update Invoice.");
        assert_eq!(errors.fields.len(), 1);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5))]
    #[case(dec!(-0.01))]
    #[case(dec!(0.004))]
    fn test_non_positive_amount_rejected(#[case] amount: Decimal) {
        let form = InvoiceForm {
            amount,
            ..valid_form()
        };
        let errors = form.validate_for(FormPurpose::Create).unwrap_err();
        assert_eq!(errors.fields["amount"], vec![AMOUNT_MESSAGE]);
    }

    #[rstest]
    #[case("canceled")]
    #[case("overdue")]
    #[case("Paid")]
    #[case("archived")]
    fn test_non_form_status_rejected(#[case] status: &str) {
        let form = InvoiceForm {
            status: status.to_string(),
            ..valid_form()
        };
        let errors = form.validate_for(FormPurpose::Create).unwrap_err();
        assert_eq!(errors.fields["status"], vec![STATUS_MESSAGE]);
        assert!(!errors.fields.contains_key("amount"));
    }

    #[test]
    fn test_half_cent_rounds_up_to_one_cent() {
        let form = InvoiceForm {
            amount: dec!(0.005),
            ..valid_form()
        };
        let validated = form.validate_for(FormPurpose::Create).unwrap();
        assert_eq!(validated.amount, Cents(1));
    }

    #[test]
    fn test_malformed_customer_id_rejected() {
        let form = InvoiceForm {
            customer_id: "not-a-uuid".to_string(),
            ..valid_form()
        };
        let errors = form.validate_for(FormPurpose::Create).unwrap_err();
        assert_eq!(errors.fields["customerId"], vec![CUSTOMER_MESSAGE]);
    }

    #[test]
    fn test_unknown_customer_error() {
        let errors = FormErrors::unknown_customer(FormPurpose::Update);
        assert_eq!(errors.to_string(), "Missing Fields. Failed to Update Invoice.");
        assert_eq!(errors.fields["customerId"], vec![CUSTOMER_MESSAGE]);
    }

    #[test]
    fn test_form_deserializes_client_names() {
        let form: InvoiceForm = serde_json::from_str(
            r#"{"customerId":"3958dc9e-712f-4377-85e9-fec4b6a6442a","amount":"12.5","status":"paid"}"#,
        )
        .unwrap();
        let validated = form.validate_for(FormPurpose::Create).unwrap();
        assert_eq!(validated.amount, Cents(1250));
        assert_eq!(validated.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let form: InvoiceForm = serde_json::from_str("{}").unwrap();
        assert!(form.customer_id.is_empty());
        assert!(form.amount.is_zero());
    }
}
