use crate::cart_actor::{CartError, CartState};
use crate::model::{MenuItemId, MenuItemRef};
use tokio::sync::oneshot;

/// One-shot reply channel used by the cart actor.
pub type Response<T> = oneshot::Sender<Result<T, CartError>>;

/// Requests understood by [`CartActor`](crate::cart_actor::CartActor).
///
/// Mutations and `Refresh` are answered once the refetch that follows them has
/// been reconciled. `SetOpen` and `Snapshot` are answered immediately.
#[derive(Debug)]
pub enum CartRequest {
    AddToCart {
        item: MenuItemRef,
        respond_to: Response<CartState>,
    },
    UpdateQuantity {
        id: MenuItemId,
        quantity: u32,
        respond_to: Response<CartState>,
    },
    RemoveFromCart {
        id: MenuItemId,
        respond_to: Response<CartState>,
    },
    Refresh {
        respond_to: Response<CartState>,
    },
    SetOpen {
        open: bool,
        respond_to: Response<CartState>,
    },
    Snapshot {
        respond_to: Response<CartState>,
    },
}
