//! # Cart Actor
//!
//! `CartActor` owns the session's [`CartState`] and is the only place it
//! changes. Requests are processed one at a time, so no locks are needed.
//!
//! ## Mutation flow
//!
//! 1. Apply the optimistic edit and publish it on the watch channel.
//! 2. Dispatch a sync job (write + refetch) with a new sequence number.
//! 3. When the job reports back, overwrite lines and totals with the fetched
//!    cart, but only if no newer job has been dispatched in the meantime.
//! 4. Reply to the caller with the reconciled state.
//!
//! A fetch that fails keeps whatever the cart currently shows. The next
//! successful fetch heals any drift.
//!
//! ## Usage
//!
//! ```rust
//! use canteen_storefront::cart_actor::CartActor;
//! use canteen_storefront::clients::mock::InMemoryBackend;
//! use canteen_storefront::model::MenuItemRef;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = Arc::new(InMemoryBackend::new());
//!     let roll = MenuItemRef::new("a", "Roll", Decimal::from(100));
//!     backend.add_menu_item(roll.clone());
//!
//!     let (actor, cart) = CartActor::new(16);
//!     let handle = tokio::spawn(actor.run(backend.clone()));
//!
//!     let state = cart.add_to_cart(roll).await.unwrap();
//!     assert_eq!(state.total_items(), 1);
//!     assert!(state.is_open);
//!
//!     drop(cart);
//!     handle.await.unwrap();
//! }
//! ```

use crate::cart_actor::sync::{run_worker, SyncDone, SyncJob, SyncLedger, SyncOp};
use crate::cart_actor::{CartHandle, CartRequest, CartState, Response};
use crate::clients::CartApi;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

pub struct CartActor {
    receiver: mpsc::Receiver<CartRequest>,
    state: CartState,
    ledger: SyncLedger,
    published: watch::Sender<CartState>,
}

impl CartActor {
    /// Creates the actor and its handle. `buffer_size` bounds pending requests.
    pub fn new(buffer_size: usize) -> (Self, CartHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let state = CartState::default();
        let (published, watcher) = watch::channel(state.clone());
        let actor = Self {
            receiver,
            state,
            ledger: SyncLedger::default(),
            published,
        };
        (actor, CartHandle::new(sender, watcher))
    }

    /// Runs until every handle is dropped and all in-flight syncs have finished.
    ///
    /// The backend is injected here rather than in [`CartActor::new`], so the
    /// handle can be wired into other components before the actor starts.
    pub async fn run(mut self, api: Arc<dyn CartApi>) {
        info!("Cart actor started");

        let (job_sender, job_receiver) = mpsc::unbounded_channel();
        let (done_sender, mut done_receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(api, job_receiver, done_sender));
        let mut jobs = Some(job_sender);

        // Initial load.
        self.state.is_loading = true;
        self.publish();
        self.dispatch(jobs.as_ref(), SyncOp::Fetch, None);

        loop {
            tokio::select! {
                request = self.receiver.recv(), if jobs.is_some() => match request {
                    Some(request) => self.handle(request, jobs.as_ref()),
                    None => {
                        debug!("All handles dropped, draining sync jobs");
                        jobs = None;
                    }
                },
                done = done_receiver.recv() => match done {
                    Some(done) => self.reconcile(done),
                    None => break,
                },
            }
        }

        if let Err(e) = worker.await {
            warn!(error = %e, "Sync worker failed");
        }
        info!(lines = self.state.lines.len(), "Cart actor shutdown");
    }

    fn handle(&mut self, request: CartRequest, jobs: Option<&mpsc::UnboundedSender<SyncJob>>) {
        match request {
            CartRequest::AddToCart { item, respond_to } => {
                debug!(menu_id = %item.id, "AddToCart");
                let id = item.id.clone();
                let quantity = self.state.apply_add(item);
                self.state.is_open = true;
                self.publish();
                self.dispatch(jobs, SyncOp::Add { id, quantity }, Some(respond_to));
            }
            CartRequest::UpdateQuantity {
                id,
                quantity,
                respond_to,
            } => {
                debug!(menu_id = %id, quantity, "UpdateQuantity");
                if !self.state.apply_quantity(&id, quantity) {
                    debug!(menu_id = %id, "Not in cart, ignoring");
                    let _ = respond_to.send(Ok(self.state.clone()));
                    return;
                }
                self.publish();
                self.dispatch(jobs, SyncOp::SetQuantity { id, quantity }, Some(respond_to));
            }
            CartRequest::RemoveFromCart { id, respond_to } => {
                debug!(menu_id = %id, "RemoveFromCart");
                if !self.state.apply_remove(&id) {
                    debug!(menu_id = %id, "Not in cart, ignoring");
                    let _ = respond_to.send(Ok(self.state.clone()));
                    return;
                }
                self.publish();
                self.dispatch(jobs, SyncOp::Remove { id }, Some(respond_to));
            }
            CartRequest::Refresh { respond_to } => {
                debug!("Refresh");
                self.dispatch(jobs, SyncOp::Fetch, Some(respond_to));
            }
            CartRequest::SetOpen { open, respond_to } => {
                self.state.is_open = open;
                self.publish();
                let _ = respond_to.send(Ok(self.state.clone()));
            }
            CartRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.state.clone()));
            }
        }
    }

    fn dispatch(
        &mut self,
        jobs: Option<&mpsc::UnboundedSender<SyncJob>>,
        op: SyncOp,
        respond_to: Option<Response<CartState>>,
    ) {
        let seq = self.ledger.dispatch();
        let job = SyncJob {
            seq,
            op,
            respond_to,
        };
        let unsent = match jobs {
            Some(jobs) => jobs.send(job).err().map(|mpsc::error::SendError(job)| job),
            None => Some(job),
        };
        if let Some(job) = unsent {
            warn!(seq, "Sync worker gone, replying with local state");
            if let Some(respond_to) = job.respond_to {
                let _ = respond_to.send(Ok(self.state.clone()));
            }
        }
    }

    fn reconcile(&mut self, done: SyncDone) {
        if self.ledger.is_latest(done.seq) {
            match done.fetched {
                Some(snapshot) => {
                    debug!(seq = done.seq, lines = snapshot.lines.len(), "Applying fetched cart");
                    self.state.apply_snapshot(snapshot);
                }
                None => warn!(seq = done.seq, "Cart fetch failed, keeping local state"),
            }
            self.state.is_loading = false;
            self.publish();
        } else {
            debug!(
                seq = done.seq,
                latest = self.ledger.latest(),
                "Discarding stale cart fetch"
            );
        }

        if let Some(respond_to) = done.respond_to {
            let _ = respond_to.send(Ok(self.state.clone()));
        }
    }

    fn publish(&self) {
        self.published.send_replace(self.state.clone());
    }
}
