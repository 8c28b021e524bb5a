// Collaborator contracts - separating concerns for testability

use anyhow::Result;
use async_trait::async_trait;

use super::types::{Account, AccountId, Owner};
use crate::review::AccountApplication;

/// Account persistence interface
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert or update an account
    async fn save(&self, account: &Account) -> Result<()>;

    /// Look up an account by id
    async fn find(&self, id: AccountId) -> Result<Option<Account>>;

    /// All accounts belonging to an owner, oldest first
    async fn find_by_owner(&self, email: &str) -> Result<Vec<Account>>;
}

/// Review submission interface. Dispatch is fire-and-forget; the outcome
/// arrives later on the review channel.
#[async_trait]
pub trait ApplicationReviewer: Send + Sync {
    async fn submit_for_approval(&self, application: AccountApplication) -> Result<()>;
}

/// Owner notification interface
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn notify(&self, owner: &Owner, account: &Account, reason: Option<&str>) -> Result<()>;
}
