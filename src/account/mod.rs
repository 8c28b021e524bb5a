// Account lifecycle module
//
// Domain types, the declared transition table and its engine, the
// collaborator contracts, and the handler set that ties them together.

pub mod controller;
pub mod state_machine;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mocks;


pub use controller::{AccountController, AccountView, ControllerError};
pub use state_machine::{
    AccountEvent, AccountLifecycle, EventKind, TransitionError, TransitionRecord, TRANSITIONS,
};
pub use traits::{AccountStore, ApplicationReviewer, NotificationService};
pub use types::{Account, AccountForm, AccountId, AccountState, AccountType, Owner};
