use crate::cart_actor::{CartError, CartRequest, CartState, Response};
use crate::model::{MenuItemId, MenuItemRef};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// Cloneable handle to the [`CartActor`](crate::cart_actor::CartActor).
///
/// Mutating methods resolve once the backend has been written to and the cart
/// refetched. Use [`CartHandle::subscribe`] to observe the optimistic states in
/// between.
#[derive(Clone)]
pub struct CartHandle {
    sender: mpsc::Sender<CartRequest>,
    watcher: watch::Receiver<CartState>,
}

impl CartHandle {
    pub fn new(sender: mpsc::Sender<CartRequest>, watcher: watch::Receiver<CartState>) -> Self {
        Self { sender, watcher }
    }

    async fn request(
        &self,
        build: impl FnOnce(Response<CartState>) -> CartRequest,
    ) -> Result<CartState, CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// Adds one unit of `item` and opens the cart panel.
    #[instrument(skip(self, item), fields(menu_id = %item.id))]
    pub async fn add_to_cart(&self, item: MenuItemRef) -> Result<CartState, CartError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::AddToCart { item, respond_to })
            .await
    }

    /// Sets a line's quantity; zero removes it. Unknown items are ignored.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        id: MenuItemId,
        quantity: u32,
    ) -> Result<CartState, CartError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::UpdateQuantity {
            id,
            quantity,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, id: MenuItemId) -> Result<CartState, CartError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::RemoveFromCart { id, respond_to })
            .await
    }

    /// Refetches the cart without changing it.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<CartState, CartError> {
        self.request(|respond_to| CartRequest::Refresh { respond_to })
            .await
    }

    pub async fn open_cart(&self) -> Result<CartState, CartError> {
        self.request(|respond_to| CartRequest::SetOpen {
            open: true,
            respond_to,
        })
        .await
    }

    pub async fn close_cart(&self) -> Result<CartState, CartError> {
        self.request(|respond_to| CartRequest::SetOpen {
            open: false,
            respond_to,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<CartState, CartError> {
        self.request(|respond_to| CartRequest::Snapshot { respond_to })
            .await
    }

    /// Receiver that sees every published state, optimistic ones included.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.watcher.clone()
    }
}
