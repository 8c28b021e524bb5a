// Review channel and worker
//
// The channel is the messaging bus: submissions go in fire-and-forget, the
// worker consumes them, decides, and delivers the outcome back to the
// account controller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, Instrument};

use crate::account::{AccountController, ApplicationReviewer};
use crate::telemetry::{create_review_span, generate_correlation_id};

use super::messages::{AccountApplication, ReviewDecision};
use super::policy::ReviewPolicy;

/// Create the review channel. The sender half is the reviewer endpoint the
/// controller submits to; the receiver half feeds the worker.
pub fn review_channel(capacity: usize) -> (ChannelReviewer, mpsc::Receiver<AccountApplication>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelReviewer { tx }, rx)
}

/// Submits applications onto the review channel
#[derive(Debug, Clone)]
pub struct ChannelReviewer {
    tx: mpsc::Sender<AccountApplication>,
}

#[async_trait]
impl ApplicationReviewer for ChannelReviewer {
    async fn submit_for_approval(&self, application: AccountApplication) -> Result<()> {
        self.tx
            .send(application)
            .await
            .map_err(|_| anyhow!("review channel closed"))
    }
}

/// Background task consuming the review channel
pub struct ReviewWorker {
    rx: mpsc::Receiver<AccountApplication>,
    controller: Arc<AccountController>,
    policy: ReviewPolicy,
    max_decision_delay: Duration,
}

impl ReviewWorker {
    pub fn new(
        rx: mpsc::Receiver<AccountApplication>,
        controller: Arc<AccountController>,
        policy: ReviewPolicy,
        max_decision_delay: Duration,
    ) -> Self {
        Self {
            rx,
            controller,
            policy,
            max_decision_delay,
        }
    }

    /// Run until the channel closes or shutdown is signalled. Per-message
    /// failures are logged and never stop the worker.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("review worker started");
        loop {
            tokio::select! {
                maybe = self.rx.recv() => match maybe {
                    Some(application) => self.process(application).await,
                    None => {
                        info!("review channel closed, worker exiting");
                        break;
                    }
                },
                _ = shutdown.changed() => {
                    info!("shutdown signalled, review worker exiting");
                    break;
                }
            }
        }
    }

    async fn process(&self, mut application: AccountApplication) {
        let correlation_id = generate_correlation_id();
        let span = create_review_span(
            "account_review",
            Some(&application.account_id.to_string()),
            Some(&correlation_id),
        );

        async {
            self.simulate_review_latency().await;

            let decision = self.policy.review(&application);
            if let ReviewDecision::Rejected { reason } = &decision {
                application.reason = Some(reason.clone());
            }
            info!(
                account_id = %application.account_id,
                account_type = %application.account_type,
                decision = ?decision,
                "application reviewed"
            );

            match self.controller.account_reviewed(application, decision).await {
                Ok(account) => {
                    info!(account_id = %account.id, state = %account.state, "review outcome applied");
                }
                Err(e) => {
                    error!(error = ?e, "failed to apply review outcome");
                }
            }
        }
        .instrument(span)
        .await;
    }

    async fn simulate_review_latency(&self) {
        let max_ms = self.max_decision_delay.as_millis() as u64;
        if max_ms == 0 {
            return;
        }
        let delay_ms = rand::rng().random_range(0..=max_ms);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
