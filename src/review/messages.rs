// Message payloads exchanged with the reviewer

use serde::{Deserialize, Serialize};

use crate::account::{AccountId, AccountType};

/// Application submitted for approval. Carries the account id and type on
/// the way out; the reviewer stamps the rejection reason on the way back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountApplication {
    pub account_id: AccountId,
    pub account_type: AccountType,
    pub reason: Option<String>,
}

impl AccountApplication {
    pub fn new(account_id: AccountId, account_type: AccountType) -> Self {
        Self {
            account_id,
            account_type,
            reason: None,
        }
    }
}

/// Outcome of a review, one per inbound event identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Approved,
    Rejected { reason: String },
}
