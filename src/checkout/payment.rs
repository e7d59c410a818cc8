//! # Payment gateway
//!
//! Hosted checkout is a one-way hand-off: once the customer is sent to the
//! gateway, the only thing this crate learns is that the redirect was issued.
//! The outcome arrives later through the return URL (see
//! [`order_status`](crate::order_status)).
//!
//! [`HostedCheckout`] does not navigate anywhere itself. It emits a
//! [`Redirect`] on a channel and leaves it to the UI layer to follow it.

use crate::config::CheckoutMode;
use async_trait::async_trait;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

const PRODUCTION_CHECKOUT_URL: &str = "https://payments.cashfree.com/order/#";
const SANDBOX_CHECKOUT_URL: &str = "https://payments-test.cashfree.com/order/#";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment gateway is not ready")]
    NotReady,
    #[error("payment session id is empty")]
    InvalidSession,
    #[error("redirect could not be delivered: {0}")]
    Redirect(String),
    #[error("payment gateway failed to load: {0}")]
    LoadFailed(String),
}

/// Where the gateway page opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Replace the current page.
    #[default]
    SameTab,
    NewTab,
}

impl RedirectTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectTarget::SameTab => "_self",
            RedirectTarget::NewTab => "_blank",
        }
    }
}

impl Display for RedirectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    pub payment_session_id: String,
    pub redirect_target: RedirectTarget,
}

impl CheckoutOptions {
    pub fn same_tab(payment_session_id: impl Into<String>) -> Self {
        Self {
            payment_session_id: payment_session_id.into(),
            redirect_target: RedirectTarget::SameTab,
        }
    }
}

/// Navigation command for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub url: String,
    pub target: RedirectTarget,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Whether the gateway has finished loading.
    fn is_ready(&self) -> bool;

    /// Starts hosted checkout. `Ok` only means the hand-off happened.
    async fn checkout(&self, options: CheckoutOptions) -> Result<(), PaymentError>;
}

/// Hosted-page gateway that hands navigation to the UI through a channel.
#[derive(Clone)]
pub struct HostedCheckout {
    mode: CheckoutMode,
    ready: Arc<watch::Sender<bool>>,
    redirects: mpsc::Sender<Redirect>,
}

impl HostedCheckout {
    /// A gateway that is not ready until [`HostedCheckout::mark_ready`] is called.
    pub fn new(mode: CheckoutMode, redirects: mpsc::Sender<Redirect>) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            mode,
            ready: Arc::new(ready),
            redirects,
        }
    }

    /// Creates the gateway and runs `loader` in the background.
    ///
    /// `loader` is whatever has to finish before checkout may start (fetching
    /// a gateway script, a health check). The gateway becomes ready when it
    /// resolves to `Ok`; on `Err` it stays not ready and checkout fails with
    /// `GatewayNotReady`. Must be called from within a Tokio runtime.
    pub fn load<F>(mode: CheckoutMode, redirects: mpsc::Sender<Redirect>, loader: F) -> Self
    where
        F: Future<Output = Result<(), PaymentError>> + Send + 'static,
    {
        let checkout = Self::new(mode, redirects);
        let gateway = checkout.clone();
        tokio::spawn(async move {
            match loader.await {
                Ok(()) => gateway.mark_ready(),
                Err(e) => warn!(mode = %gateway.mode, error = %e, "Payment gateway failed to load"),
            }
        });
        checkout
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
        info!(mode = %self.mode, "Payment gateway ready");
    }

    /// Resolves once the gateway is ready.
    pub async fn wait_ready(&self) {
        let mut ready = self.ready.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = ready.wait_for(|ready| *ready).await;
    }

    pub fn mode(&self) -> CheckoutMode {
        self.mode
    }

    pub fn checkout_url(&self, payment_session_id: &str) -> String {
        let base = match self.mode {
            CheckoutMode::Production => PRODUCTION_CHECKOUT_URL,
            CheckoutMode::Sandbox => SANDBOX_CHECKOUT_URL,
        };
        format!("{base}{payment_session_id}")
    }
}

#[async_trait]
impl PaymentGateway for HostedCheckout {
    fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    #[instrument(skip(self, options), fields(target = %options.redirect_target))]
    async fn checkout(&self, options: CheckoutOptions) -> Result<(), PaymentError> {
        if !self.is_ready() {
            return Err(PaymentError::NotReady);
        }
        let session = options.payment_session_id.trim();
        if session.is_empty() {
            return Err(PaymentError::InvalidSession);
        }

        let redirect = Redirect {
            url: self.checkout_url(session),
            target: options.redirect_target,
        };
        debug!(url = %redirect.url, "Issuing redirect");
        self.redirects
            .send(redirect)
            .await
            .map_err(|e| PaymentError::Redirect(e.to_string()))?;
        info!("Redirect issued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn checkout_before_ready_is_refused() {
        let (sender, mut receiver) = mpsc::channel(1);
        let gateway = HostedCheckout::new(CheckoutMode::Sandbox, sender);

        let result = gateway.checkout(CheckoutOptions::same_tab("sess_1")).await;
        assert_eq!(result, Err(PaymentError::NotReady));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn load_becomes_ready_and_redirects_once() {
        let (sender, mut receiver) = mpsc::channel(1);
        let gateway = HostedCheckout::load(CheckoutMode::Sandbox, sender, async { Ok(()) });
        gateway.wait_ready().await;
        assert!(gateway.is_ready());

        gateway
            .checkout(CheckoutOptions::same_tab("sess_1"))
            .await
            .unwrap();

        let redirect = receiver.recv().await.unwrap();
        assert_eq!(redirect.url, "https://payments-test.cashfree.com/order/#sess_1");
        assert_eq!(redirect.target.as_str(), "_self");
    }

    #[tokio::test]
    async fn gateway_is_not_ready_while_loading() {
        let (sender, _receiver) = mpsc::channel(1);
        let (release, loaded) = tokio::sync::oneshot::channel::<()>();
        let gateway = HostedCheckout::load(CheckoutMode::Sandbox, sender, async move {
            loaded
                .await
                .map_err(|e| PaymentError::LoadFailed(e.to_string()))
        });

        tokio::task::yield_now().await;
        assert!(!gateway.is_ready());
        assert_eq!(
            gateway.checkout(CheckoutOptions::same_tab("sess_1")).await,
            Err(PaymentError::NotReady)
        );

        release.send(()).unwrap();
        gateway.wait_ready().await;
        assert!(gateway.is_ready());
    }

    #[tokio::test]
    async fn failed_load_leaves_the_gateway_unavailable() {
        let (sender, _receiver) = mpsc::channel(1);
        let (done, finished) = tokio::sync::oneshot::channel::<()>();
        let gateway = HostedCheckout::load(CheckoutMode::Production, sender, async move {
            let _ = done.send(());
            Err(PaymentError::LoadFailed("script blocked".into()))
        });

        finished.await.unwrap();
        tokio::task::yield_now().await;
        assert!(!gateway.is_ready());
    }

    #[tokio::test]
    async fn blank_session_is_rejected() {
        let (sender, _receiver) = mpsc::channel(1);
        let gateway = HostedCheckout::new(CheckoutMode::Production, sender);
        gateway.mark_ready();
        assert_eq!(
            gateway.checkout(CheckoutOptions::same_tab("  ")).await,
            Err(PaymentError::InvalidSession)
        );
    }

    #[tokio::test]
    async fn closed_ui_channel_is_an_initiation_failure() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let gateway = HostedCheckout::new(CheckoutMode::Production, sender);
        gateway.mark_ready();
        assert!(matches!(
            gateway.checkout(CheckoutOptions::same_tab("sess_1")).await,
            Err(PaymentError::Redirect(_))
        ));
    }
}
