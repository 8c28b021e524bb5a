// Account lifecycle handlers
//
// Three handlers map the declared transitions onto the collaborators: create
// (HTTP), review outcome (channel), display (HTTP). Failures propagate to the
// caller unhandled; the HTTP layer maps them to status codes.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::review::{AccountApplication, ReviewDecision};

use super::state_machine::{AccountEvent, AccountLifecycle, TransitionError};
use super::traits::{AccountStore, ApplicationReviewer, NotificationService};
use super::types::{Account, AccountForm, AccountId, Owner};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("account {0} not found")]
    NotFound(AccountId),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// View directive returned by display: a template name paired with the
/// account it renders
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub view: &'static str,
    pub account: Account,
}

pub struct AccountController {
    store: Arc<dyn AccountStore>,
    reviewer: Arc<dyn ApplicationReviewer>,
    notifier: Arc<dyn NotificationService>,
}

impl AccountController {
    pub fn new(
        store: Arc<dyn AccountStore>,
        reviewer: Arc<dyn ApplicationReviewer>,
        notifier: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            store,
            reviewer,
            notifier,
        }
    }

    /// POST /accounts: open an account for the owner and submit it for
    /// review. NON_EXISTENT -> APPROVAL_PENDING.
    pub async fn create_account(
        &self,
        owner: Owner,
        form: AccountForm,
    ) -> Result<Account, ControllerError> {
        let mut account = Account::open(owner, form.account_type);
        let mut lifecycle = AccountLifecycle::new(account.state);
        account.state = lifecycle.handle(&AccountEvent::Submit)?;

        // Save to the store prior to emitting events
        account.amount = form.amount;
        account.updated_at = Utc::now();
        self.store.save(&account).await?;

        // Submit the application for approval
        let application = AccountApplication::new(account.id, account.account_type);
        self.reviewer.submit_for_approval(application).await?;

        info!(
            account_id = %account.id,
            owner = %account.owner.email,
            account_type = %account.account_type,
            "account submitted for review"
        );
        Ok(account)
    }

    /// Review outcome delivered from the channel.
    /// APPROVAL_PENDING -> ACTIVE on approval, APPROVAL_PENDING -> REJECTED
    /// on rejection. Notifies the owner with the reason carried on the
    /// message.
    pub async fn account_reviewed(
        &self,
        application: AccountApplication,
        decision: ReviewDecision,
    ) -> Result<Account, ControllerError> {
        let mut account = self
            .store
            .find(application.account_id)
            .await?
            .ok_or(ControllerError::NotFound(application.account_id))?;

        let event = match &decision {
            ReviewDecision::Approved => AccountEvent::Approve,
            ReviewDecision::Rejected { reason } => AccountEvent::Reject {
                reason: reason.clone(),
            },
        };

        let mut lifecycle = AccountLifecycle::new(account.state);
        account.state = lifecycle.handle(&event)?;
        account.updated_at = Utc::now();
        self.store.save(&account).await?;

        self.notifier
            .notify(&account.owner, &account, application.reason.as_deref())
            .await?;

        Ok(account)
    }

    /// GET /accounts/{id}: view directive for an account, available from any
    /// state. The owner guard runs in the HTTP layer before this handler.
    pub async fn display_account(&self, id: AccountId) -> Result<AccountView, ControllerError> {
        let account = self
            .store
            .find(id)
            .await?
            .ok_or(ControllerError::NotFound(id))?;
        Ok(AccountView {
            view: "account",
            account,
        })
    }
}
