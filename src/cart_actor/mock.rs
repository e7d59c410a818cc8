//! # Mock cart handle
//!
//! Tests for code built around [`CartHandle`] do not need a running actor.
//! [`create_mock_handle`] returns a real handle plus the receiving end of its
//! channel; the `expect_*` helpers pull the next request off that channel so
//! the test can assert on it and answer it.
//!
//! ```rust
//! use canteen_storefront::cart_actor::mock::{create_mock_handle, expect_snapshot};
//! use canteen_storefront::cart_actor::CartState;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (cart, mut requests) = create_mock_handle(8);
//!
//!     let task = tokio::spawn(async move { cart.snapshot().await });
//!
//!     let respond_to = expect_snapshot(&mut requests).await.expect("snapshot request");
//!     respond_to.send(Ok(CartState::default())).unwrap();
//!
//!     assert!(task.await.unwrap().unwrap().is_empty());
//! }
//! ```

use crate::cart_actor::{CartHandle, CartRequest, CartState, Response};
use crate::model::{MenuItemId, MenuItemRef};
use tokio::sync::{mpsc, watch};

/// A handle wired to a bare channel instead of an actor.
///
/// The handle's watch channel holds `CartState::default()` and never changes.
pub fn create_mock_handle(buffer_size: usize) -> (CartHandle, mpsc::Receiver<CartRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_, watcher) = watch::channel(CartState::default());
    (CartHandle::new(sender, watcher), receiver)
}

pub async fn expect_add_to_cart(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(MenuItemRef, Response<CartState>)> {
    match receiver.recv().await {
        Some(CartRequest::AddToCart { item, respond_to }) => Some((item, respond_to)),
        _ => None,
    }
}

pub async fn expect_update_quantity(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(MenuItemId, u32, Response<CartState>)> {
    match receiver.recv().await {
        Some(CartRequest::UpdateQuantity {
            id,
            quantity,
            respond_to,
        }) => Some((id, quantity, respond_to)),
        _ => None,
    }
}

pub async fn expect_remove_from_cart(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(MenuItemId, Response<CartState>)> {
    match receiver.recv().await {
        Some(CartRequest::RemoveFromCart { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_refresh(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<Response<CartState>> {
    match receiver.recv().await {
        Some(CartRequest::Refresh { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_set_open(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(bool, Response<CartState>)> {
    match receiver.recv().await {
        Some(CartRequest::SetOpen { open, respond_to }) => Some((open, respond_to)),
        _ => None,
    }
}

pub async fn expect_snapshot(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<Response<CartState>> {
    match receiver.recv().await {
        Some(CartRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart_actor::CartError;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn add_request_carries_the_item() {
        let (cart, mut requests) = create_mock_handle(4);
        let roll = MenuItemRef::new("a", "Roll", Decimal::from(100));

        let task = tokio::spawn({
            let roll = roll.clone();
            async move { cart.add_to_cart(roll).await }
        });

        let (item, respond_to) = expect_add_to_cart(&mut requests).await.unwrap();
        assert_eq!(item, roll);
        respond_to.send(Err(CartError::ActorDropped)).unwrap();

        assert_eq!(task.await.unwrap(), Err(CartError::ActorDropped));
    }

    #[tokio::test]
    async fn close_sends_set_open_false() {
        let (cart, mut requests) = create_mock_handle(4);
        let task = tokio::spawn(async move { cart.close_cart().await });

        let (open, respond_to) = expect_set_open(&mut requests).await.unwrap();
        assert!(!open);
        respond_to.send(Ok(CartState::default())).unwrap();
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn dropped_receiver_closes_the_handle() {
        let (cart, requests) = create_mock_handle(4);
        drop(requests);
        assert_eq!(cart.snapshot().await, Err(CartError::ActorClosed));
    }
}
