//! Background synchronisation between the optimistic cart and the backend.
//!
//! The actor never awaits the network itself. It hands a [`SyncJob`] to a
//! single worker task which performs the write (if any), then refetches the
//! cart, and reports back with a [`SyncDone`]. Jobs run one at a time in
//! dispatch order.
//!
//! Each job carries a sequence number from the [`SyncLedger`]. Only the result
//! of the most recently dispatched job may overwrite the cart; earlier results
//! describe a cart that a newer optimistic edit has already moved past.

use crate::cart_actor::message::Response;
use crate::cart_actor::CartState;
use crate::clients::CartApi;
use crate::model::{CartSnapshot, MenuItemId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Hands out sequence numbers and remembers the latest one.
#[derive(Debug, Default)]
pub struct SyncLedger {
    latest: u64,
}

impl SyncLedger {
    pub fn dispatch(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOp {
    Add { id: MenuItemId, quantity: u32 },
    SetQuantity { id: MenuItemId, quantity: u32 },
    Remove { id: MenuItemId },
    Fetch,
}

#[derive(Debug)]
pub struct SyncJob {
    pub seq: u64,
    pub op: SyncOp,
    pub respond_to: Option<Response<CartState>>,
}

#[derive(Debug)]
pub struct SyncDone {
    pub seq: u64,
    pub fetched: Option<CartSnapshot>,
    pub respond_to: Option<Response<CartState>>,
}

/// Runs jobs until the job channel closes or the actor stops listening.
pub async fn run_worker(
    api: Arc<dyn CartApi>,
    mut jobs: mpsc::UnboundedReceiver<SyncJob>,
    done: mpsc::UnboundedSender<SyncDone>,
) {
    while let Some(job) = jobs.recv().await {
        let written = match &job.op {
            SyncOp::Add { id, quantity } => Some(api.add_item(id, *quantity).await),
            SyncOp::SetQuantity { id, quantity } => {
                Some(api.update_item_quantity(id, i64::from(*quantity)).await)
            }
            SyncOp::Remove { id } => Some(api.remove_item(id).await),
            SyncOp::Fetch => None,
        };
        if written == Some(false) {
            warn!(seq = job.seq, op = ?job.op, "Cart write failed, refetching anyway");
        }

        // Refetch after every write, successful or not.
        let fetched = api.get_cart().await;
        debug!(seq = job.seq, fetched = fetched.is_some(), "Sync job finished");

        let report = SyncDone {
            seq: job.seq,
            fetched,
            respond_to: job.respond_to,
        };
        if done.send(report).is_err() {
            break;
        }
    }
}
