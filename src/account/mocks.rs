// Mock implementations for testing - no side effects

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::traits::{AccountStore, ApplicationReviewer, NotificationService};
use super::types::{Account, AccountId, Owner};
use crate::review::AccountApplication;

/// Account store that records every save
#[derive(Debug, Default, Clone)]
pub struct MockAccountStore {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
    saved: Arc<Mutex<Vec<Account>>>,
    fail_save: Arc<Mutex<bool>>,
}

impl MockAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(account: Account) -> Self {
        let store = Self::default();
        store.accounts.lock().unwrap().insert(account.id, account);
        store
    }

    pub fn set_fail_save(&self, fail: bool) {
        *self.fail_save.lock().unwrap() = fail;
    }

    /// Every account passed to save, in call order
    pub fn saved_accounts(&self) -> Vec<Account> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountStore for MockAccountStore {
    async fn save(&self, account: &Account) -> Result<()> {
        if *self.fail_save.lock().unwrap() {
            return Err(anyhow!("store unavailable"));
        }
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        self.saved.lock().unwrap().push(account.clone());
        Ok(())
    }

    async fn find(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_owner(&self, email: &str) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.owner.email == email)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }
}

/// Reviewer that records submitted applications instead of dispatching them
#[derive(Debug, Default, Clone)]
pub struct MockReviewer {
    submissions: Arc<Mutex<Vec<AccountApplication>>>,
    fail_submit: Arc<Mutex<bool>>,
}

impl MockReviewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_submit(&self, fail: bool) {
        *self.fail_submit.lock().unwrap() = fail;
    }

    pub fn submissions(&self) -> Vec<AccountApplication> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApplicationReviewer for MockReviewer {
    async fn submit_for_approval(&self, application: AccountApplication) -> Result<()> {
        if *self.fail_submit.lock().unwrap() {
            return Err(anyhow!("review channel closed"));
        }
        self.submissions.lock().unwrap().push(application);
        Ok(())
    }
}

/// Recorded notify call: owner email, account snapshot, optional reason
#[derive(Debug, Clone)]
pub struct RecordedNotification {
    pub owner_email: String,
    pub account: Account,
    pub reason: Option<String>,
}

/// Notification service that records every call
#[derive(Debug, Default, Clone)]
pub struct MockNotifier {
    notifications: Arc<Mutex<Vec<RecordedNotification>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<RecordedNotification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationService for MockNotifier {
    async fn notify(&self, owner: &Owner, account: &Account, reason: Option<&str>) -> Result<()> {
        self.notifications.lock().unwrap().push(RecordedNotification {
            owner_email: owner.email.clone(),
            account: account.clone(),
            reason: reason.map(str::to_string),
        });
        Ok(())
    }
}
