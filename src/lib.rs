// Teller Library - Account Onboarding with a State-Machine Lifecycle
// This exposes the core components for testing and integration

pub mod account;
pub mod config;
pub mod database;
pub mod notify;
pub mod review;
pub mod server;
pub mod shutdown;
pub mod store;
pub mod telemetry;

// Re-export key types for easy access
pub use account::{
    Account, AccountController, AccountForm, AccountState, AccountStore, AccountType,
    ApplicationReviewer, ControllerError, NotificationService, Owner, TransitionError,
};
pub use config::{config, init_config, TellerConfig};
pub use database::init_store;
pub use notify::{Notification, NotificationLog};
pub use review::{
    review_channel, AccountApplication, ChannelReviewer, ReviewDecision, ReviewPolicy,
    ReviewWorker,
};
pub use server::{create_router, AppState, Principal, AUTH_USER_HEADER};
pub use shutdown::ShutdownCoordinator;
pub use store::InMemoryAccountStore;
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};
