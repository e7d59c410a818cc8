//! Startup, wiring and shutdown.
//!
//! - [`Storefront`] starts the cart actor and wires checkout, status
//!   resolution and catalog reads around it
//! - [`setup_tracing`] installs the log subscriber

pub mod storefront;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use storefront::Storefront;
