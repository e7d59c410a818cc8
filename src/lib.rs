//! # Canteen Storefront
//!
//! > **Client core for a food-ordering storefront.**
//!
//! This crate holds everything a storefront UI needs between the menu and the
//! "thank you" page: a session cart kept in sync with the backend, checkout
//! for delivery and dine-in orders, the hand-off to a hosted payment page, and
//! the reduction of payment records to a single outcome afterwards.
//!
//! ## 🏗️ Design
//!
//! ### Optimistic cart, authoritative backend
//! The cart lives in an actor ([`cart_actor::CartActor`]) that owns its state
//! and processes requests one at a time. Edits are shown immediately, written
//! to the backend by a background sync worker, and then replaced by a fresh
//! fetch of the remote cart. Only the fetch that follows the most recent edit
//! may overwrite the cart, so concurrent clicks settle on the backend's view
//! of the last one.
//!
//! ### Traits at the network seams
//! The cart store depends on [`clients::CartApi`]; checkout and status
//! resolution depend on [`clients::OrderApi`] and
//! [`checkout::PaymentGateway`]. Production code uses the `reqwest` clients,
//! tests use [`clients::mock::InMemoryBackend`].
//!
//! ### Errors
//! Each layer has its own `thiserror` enum. Cart failures are absorbed and
//! logged; checkout and status failures surface as one customer-facing
//! message (`general_message()`).
//!
//! ### Observability
//! `tracing` everywhere. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`session`]: the persisted `x-session-id`
//! - [`clients`]: HTTP access to cart, order and catalog endpoints
//! - [`cart_actor`]: the cart store and its handle
//! - [`checkout`]: form validation, order submission, payment gateway
//! - [`order_status`]: payment outcome on return from the gateway
//! - [`model`]: wire and domain types
//! - [`config`]: environment configuration
//! - [`lifecycle`]: wiring everything together ([`Storefront`])
//!
//! ## 🚀 Quick Start
//!
//! ```ignore
//! use canteen_storefront::{setup_tracing, Storefront, StorefrontConfig};
//!
//! setup_tracing();
//! let (storefront, mut redirects) = Storefront::new(StorefrontConfig::from_env()?);
//! let state = storefront.cart.snapshot().await?;
//! ```

pub mod cart_actor;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_status;
pub mod session;

pub use config::StorefrontConfig;
pub use lifecycle::{setup_tracing, Storefront};
