//! # Checkout
//!
//! Two steps: the customer picks delivery or dine-in, then fills in the form.
//! [`OrderSubmission::submit`] validates the form, creates the order from the
//! session cart and hands the payment session to the gateway.

pub mod form;
pub mod payment;
pub mod submission;

pub use form::{sanitize_phone, CheckoutForm, FieldErrors, ValidationErrors};
pub use payment::{
    CheckoutOptions, HostedCheckout, PaymentError, PaymentGateway, Redirect, RedirectTarget,
};
pub use submission::{CheckoutError, OrderSubmission};
