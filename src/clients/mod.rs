//! # Clients
//!
//! Typed access to the storefront backend.
//!
//! * [`CartClient`] implements [`CartApi`]: session-scoped cart reads and writes.
//! * [`OrderClient`] implements [`OrderApi`]: order creation and status reads.
//! * [`MenuClient`]: catalog, dashboard and offer banners.
//!
//! The traits are the seams the cart store, checkout and status resolution
//! depend on; [`mock::InMemoryBackend`] implements both for tests.

pub mod api;
pub mod cart_client;
pub mod menu_client;
pub mod mock;
pub mod order_client;

pub use api::{ApiError, HttpCore};
pub use cart_client::{CartApi, CartClient};
pub use menu_client::{image_url, MenuClient};
pub use order_client::{OrderApi, OrderClient};
