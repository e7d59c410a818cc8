//! # Cart store
//!
//! The session cart, held by a single actor and reached through a cloneable
//! [`CartHandle`]. Edits show up immediately (optimistically) and are then
//! replaced by the backend's own view of the cart once it has been refetched.

pub mod actor;
pub mod error;
pub mod handle;
pub mod message;
pub mod mock;
pub mod state;
pub mod sync;

pub use actor::CartActor;
pub use error::CartError;
pub use handle::CartHandle;
pub use message::{CartRequest, Response};
pub use state::CartState;
