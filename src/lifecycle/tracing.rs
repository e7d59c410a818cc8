//! # Logging
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`. Call it once at startup; libraries embedding the storefront
//! usually install their own subscriber instead.
//!
//! ## Levels
//!
//! - `info`: actor start and shutdown, session creation, order created,
//!   payment redirect issued, order status resolved
//! - `debug`: request payloads, optimistic edits, stale refetches discarded
//! - `warn`: swallowed failures (cart writes and fetches, delivery settings,
//!   session persistence)
//!
//! ```bash
//! RUST_LOG=info  ./storefront
//! RUST_LOG=canteen_storefront::cart_actor=debug ./storefront
//! ```
//!
//! With `RUST_LOG=debug` a cart edit reads roughly like:
//!
//! ```text
//! DEBUG add_to_cart{menu_id=665f1c2b}: Sending request
//! DEBUG AddToCart menu_id=665f1c2b
//! DEBUG Sync job finished seq=4 fetched=true
//! DEBUG Applying fetched cart seq=4 lines=2
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
