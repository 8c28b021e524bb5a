// Review rules applied to incoming applications

use anyhow::Result;

use crate::account::AccountType;
use crate::config::ReviewConfig;

use super::messages::{AccountApplication, ReviewDecision};

/// Decides applications by account type: configured types are approved
/// outright, everything else is rejected with a reason naming the type.
#[derive(Debug, Clone)]
pub struct ReviewPolicy {
    auto_approve: Vec<AccountType>,
}

impl ReviewPolicy {
    pub fn new(auto_approve: Vec<AccountType>) -> Self {
        Self { auto_approve }
    }

    /// Build a policy from the review section of the configuration
    pub fn from_config(config: &ReviewConfig) -> Result<Self> {
        let auto_approve = config
            .auto_approve_types
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<AccountType>>>()?;
        Ok(Self::new(auto_approve))
    }

    pub fn review(&self, application: &AccountApplication) -> ReviewDecision {
        if self.auto_approve.contains(&application.account_type) {
            ReviewDecision::Approved
        } else {
            ReviewDecision::Rejected {
                reason: format!(
                    "{} applications require manual review",
                    application.account_type
                ),
            }
        }
    }
}
