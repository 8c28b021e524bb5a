// Owner notifications for review outcomes

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::account::{Account, AccountId, AccountState, NotificationService, Owner};

/// Review outcome notification shown on the owner overview page
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub owner_email: String,
    pub account_id: AccountId,
    pub state: AccountState,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Notification service that emits a structured log line and keeps the
/// notifications in memory for the owner overview
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Arc<RwLock<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications for one owner, oldest first
    pub async fn for_owner(&self, email: &str) -> Vec<Notification> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|n| n.owner_email == email)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationService for NotificationLog {
    async fn notify(&self, owner: &Owner, account: &Account, reason: Option<&str>) -> Result<()> {
        tracing::info!(
            owner = %owner.email,
            account_id = %account.id,
            state = %account.state,
            reason = ?reason,
            "account review notification"
        );

        self.entries.write().await.push(Notification {
            owner_email: owner.email.clone(),
            account_id: account.id,
            state: account.state,
            reason: reason.map(str::to_string),
            created_at: Utc::now(),
        });
        Ok(())
    }
}
