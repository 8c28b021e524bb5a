// Core types for the account lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AccountId = Uuid;

/// Lifecycle states an account moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountState {
    /// Account has not been persisted yet
    NonExistent,
    /// Application submitted, waiting on the reviewer
    ApprovalPending,
    /// Application approved, account usable
    Active,
    /// Application rejected
    Rejected,
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountState::NonExistent => "NON_EXISTENT",
            AccountState::ApprovalPending => "APPROVAL_PENDING",
            AccountState::Active => "ACTIVE",
            AccountState::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

impl FromStr for AccountState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NON_EXISTENT" => Ok(AccountState::NonExistent),
            "APPROVAL_PENDING" => Ok(AccountState::ApprovalPending),
            "ACTIVE" => Ok(AccountState::Active),
            "REJECTED" => Ok(AccountState::Rejected),
            other => Err(anyhow::anyhow!("unknown account state: {other}")),
        }
    }
}

/// Kinds of account a user can apply for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    Loan,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Loan => "loan",
        };
        f.write_str(s)
    }
}

impl FromStr for AccountType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "loan" => Ok(AccountType::Loan),
            other => Err(anyhow::anyhow!("unknown account type: {other}")),
        }
    }
}

/// The account owner, identified by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub email: String,
}

impl Owner {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: Owner,
    pub amount: f64,
    pub account_type: AccountType,
    pub state: AccountState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// New, not-yet-persisted account for an owner
    pub fn open(owner: Owner, account_type: AccountType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner,
            amount: 0.0,
            account_type,
            state: AccountState::NonExistent,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Transient payload submitted with POST /accounts. Not persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountForm {
    pub amount: f64,
    pub account_type: AccountType,
}
