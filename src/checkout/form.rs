//! Checkout form input and its validation into an [`OrderDraft`].

use crate::model::{DeliveryDetails, DineInDetails, OrderDraft, OrderType};
use thiserror::Error;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid 10-digit phone number";

/// Raw form values as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub hostel: String,
    pub room_number: String,
    pub floor: String,
    pub phone: String,
    pub table_number: String,
}

/// Which fields need attention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub first_name: bool,
    pub last_name: bool,
    pub hostel: bool,
    pub room_number: bool,
    pub floor: bool,
    pub phone: bool,
    pub table_number: bool,
}

impl FieldErrors {
    pub fn any(&self) -> bool {
        self.first_name
            || self.last_name
            || self.hostel
            || self.room_number
            || self.floor
            || self.phone
            || self.table_number
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{general}")]
pub struct ValidationErrors {
    pub fields: FieldErrors,
    pub general: String,
}

/// Keeps only ASCII digits, at most ten of them.
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).take(10).collect()
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

impl CheckoutForm {
    /// Message shown under the phone input, if any.
    pub fn phone_hint(&self) -> Option<&'static str> {
        let phone = self.phone.trim();
        if phone.is_empty() {
            Some("Phone number is required")
        } else if !is_valid_phone(phone) {
            Some("Must be exactly 10 digits (no symbols)")
        } else {
            None
        }
    }

    /// Checks the fields `kind` requires and builds the draft from trimmed values.
    pub fn validate(&self, kind: OrderType) -> Result<OrderDraft, ValidationErrors> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let phone = self.phone.trim();

        let mut fields = FieldErrors {
            first_name: first_name.is_empty(),
            last_name: last_name.is_empty(),
            phone: phone.is_empty(),
            ..FieldErrors::default()
        };
        match kind {
            OrderType::Delivery => {
                fields.hostel = self.hostel.trim().is_empty();
                fields.room_number = self.room_number.trim().is_empty();
                fields.floor = self.floor.trim().is_empty();
            }
            OrderType::DineIn => {
                fields.table_number = self.table_number.trim().is_empty();
            }
        }

        if fields.any() {
            fields.phone |= !is_valid_phone(phone);
            return Err(ValidationErrors {
                fields,
                general: MISSING_FIELDS_MESSAGE.to_string(),
            });
        }
        if !is_valid_phone(phone) {
            fields.phone = true;
            return Err(ValidationErrors {
                fields,
                general: INVALID_PHONE_MESSAGE.to_string(),
            });
        }

        let draft = match kind {
            OrderType::Delivery => OrderDraft::Delivery(DeliveryDetails {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                hostel: self.hostel.trim().to_string(),
                room_number: self.room_number.trim().to_string(),
                floor: self.floor.trim().to_string(),
                phone: phone.to_string(),
            }),
            OrderType::DineIn => OrderDraft::DineIn(DineInDetails {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                table_number: self.table_number.trim().to_string(),
                phone: phone.to_string(),
            }),
        };
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery_form() -> CheckoutForm {
        CheckoutForm {
            first_name: " Asha ".into(),
            last_name: "Rao".into(),
            hostel: "H4".into(),
            room_number: "212".into(),
            floor: "2".into(),
            phone: "9876543210".into(),
            table_number: String::new(),
        }
    }

    #[test]
    fn complete_delivery_form_yields_trimmed_draft() {
        let draft = delivery_form().validate(OrderType::Delivery).unwrap();
        match draft {
            OrderDraft::Delivery(details) => {
                assert_eq!(details.first_name, "Asha");
                assert_eq!(details.room_number, "212");
            }
            other => panic!("unexpected draft {other:?}"),
        }
    }

    #[test]
    fn dine_in_only_needs_table_and_contact() {
        let form = CheckoutForm {
            first_name: "A".into(),
            last_name: "B".into(),
            table_number: "7".into(),
            phone: "0123456789".into(),
            ..CheckoutForm::default()
        };
        assert!(matches!(form.validate(OrderType::DineIn), Ok(OrderDraft::DineIn(_))));

        let err = form.validate(OrderType::Delivery).unwrap_err();
        assert_eq!(err.general, MISSING_FIELDS_MESSAGE);
        assert!(err.fields.hostel && err.fields.room_number && err.fields.floor);
        assert!(!err.fields.table_number);
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let form = CheckoutForm {
            last_name: "   ".into(),
            ..delivery_form()
        };
        let err = form.validate(OrderType::Delivery).unwrap_err();
        assert!(err.fields.last_name);
        assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn phone_must_be_exactly_ten_ascii_digits() {
        for phone in ["98765", "98765432101", "98765-4321", "९८७६५४३२१०"] {
            let form = CheckoutForm {
                phone: phone.into(),
                ..delivery_form()
            };
            let err = form.validate(OrderType::Delivery).unwrap_err();
            assert_eq!(err.general, INVALID_PHONE_MESSAGE, "phone {phone}");
            assert!(err.fields.phone);
        }
    }

    #[test]
    fn sanitize_strips_symbols_and_truncates() {
        assert_eq!(sanitize_phone("+91 98765-43210"), "9198765432");
        assert_eq!(sanitize_phone("98a76"), "9876");
    }

    #[test]
    fn phone_hint_distinguishes_missing_from_malformed() {
        let mut form = CheckoutForm::default();
        assert_eq!(form.phone_hint(), Some("Phone number is required"));
        form.phone = "123".into();
        assert_eq!(form.phone_hint(), Some("Must be exactly 10 digits (no symbols)"));
        form.phone = "1234567890".into();
        assert_eq!(form.phone_hint(), None);
    }
}
