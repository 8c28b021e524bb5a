//! Review worker behavior tests
//!
//! The worker consumes the review channel, stamps rejection reasons onto the
//! message, applies outcomes through the controller, and keeps running when a
//! message cannot be applied.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use teller::account::{
    Account, AccountController, AccountId, AccountState, AccountStore, AccountType, Owner,
};
use teller::notify::NotificationLog;
use teller::review::{review_channel, AccountApplication, ChannelReviewer, ReviewPolicy, ReviewWorker};
use teller::store::InMemoryAccountStore;

struct WorkerHarness {
    reviewer: ChannelReviewer,
    store: InMemoryAccountStore,
    notifications: NotificationLog,
    shutdown_tx: watch::Sender<bool>,
    worker: JoinHandle<()>,
}

fn start_worker() -> WorkerHarness {
    let store = InMemoryAccountStore::new();
    let notifications = NotificationLog::new();
    let (reviewer, review_rx) = review_channel(8);

    let controller = Arc::new(AccountController::new(
        Arc::new(store.clone()),
        Arc::new(reviewer.clone()),
        Arc::new(notifications.clone()),
    ));

    let policy = ReviewPolicy::new(vec![AccountType::Checking, AccountType::Savings]);
    let worker = ReviewWorker::new(review_rx, controller, policy, Duration::ZERO);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(worker.run(shutdown_rx));

    WorkerHarness {
        reviewer,
        store,
        notifications,
        shutdown_tx,
        worker,
    }
}

async fn seed_pending(
    store: &InMemoryAccountStore,
    email: &str,
    account_type: AccountType,
) -> Account {
    let mut account = Account::open(Owner::new(email), account_type);
    account.state = AccountState::ApprovalPending;
    account.amount = 100.0;
    store.save(&account).await.unwrap();
    account
}

async fn wait_for_state(store: &InMemoryAccountStore, id: AccountId, expected: AccountState) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if let Some(account) = store.find(id).await.unwrap() {
            if account.state == expected {
                return;
            }
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("account {id} never reached {expected}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn rejection_reason_is_stamped_onto_the_notification() {
    use teller::account::ApplicationReviewer;
    use tokio_test::assert_ok;

    let harness = start_worker();
    let account = seed_pending(&harness.store, "bob@example.com", AccountType::Loan).await;

    let application = AccountApplication::new(account.id, account.account_type);
    assert_ok!(harness.reviewer.submit_for_approval(application).await);

    wait_for_state(&harness.store, account.id, AccountState::Rejected).await;

    let notifications = harness.notifications.for_owner("bob@example.com").await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].reason.as_deref(),
        Some("loan applications require manual review")
    );

    harness.shutdown_tx.send(true).unwrap();
    harness.worker.await.unwrap();
}

#[tokio::test]
async fn unapplicable_messages_do_not_stop_the_worker() {
    use teller::account::ApplicationReviewer;
    use tokio_test::assert_ok;

    let harness = start_worker();

    // First message references an account that does not exist
    let ghost = AccountApplication::new(uuid::Uuid::new_v4(), AccountType::Checking);
    assert_ok!(harness.reviewer.submit_for_approval(ghost).await);

    // Second message references an account already past review
    let mut settled = Account::open(Owner::new("amy@example.com"), AccountType::Checking);
    settled.state = AccountState::Active;
    harness.store.save(&settled).await.unwrap();
    let stale = AccountApplication::new(settled.id, settled.account_type);
    assert_ok!(harness.reviewer.submit_for_approval(stale).await);

    // The worker is still alive and processes the next valid application
    let pending = seed_pending(&harness.store, "cal@example.com", AccountType::Savings).await;
    let application = AccountApplication::new(pending.id, pending.account_type);
    assert_ok!(harness.reviewer.submit_for_approval(application).await);

    wait_for_state(&harness.store, pending.id, AccountState::Active).await;

    // The failed messages produced no notifications
    assert!(harness
        .notifications
        .for_owner("amy@example.com")
        .await
        .is_empty());
    assert_eq!(
        harness.notifications.for_owner("cal@example.com").await.len(),
        1
    );

    harness.shutdown_tx.send(true).unwrap();
    harness.worker.await.unwrap();
}

#[tokio::test]
async fn worker_exits_on_shutdown_signal() {
    let harness = start_worker();

    harness.shutdown_tx.send(true).unwrap();
    timeout(Duration::from_secs(2), harness.worker)
        .await
        .expect("worker did not exit after shutdown signal")
        .unwrap();
}

#[tokio::test]
async fn worker_exits_when_the_channel_closes() {
    let store = InMemoryAccountStore::new();
    let notifications = NotificationLog::new();
    let (reviewer, review_rx) = review_channel(8);

    // The controller submits to a different channel so that `reviewer` is
    // the only sender for the worker's channel
    let (detached_reviewer, _detached_rx) = review_channel(8);
    let controller = Arc::new(AccountController::new(
        Arc::new(store.clone()),
        Arc::new(detached_reviewer),
        Arc::new(notifications),
    ));

    let policy = ReviewPolicy::new(vec![AccountType::Checking]);
    let worker = ReviewWorker::new(review_rx, controller, policy, Duration::ZERO);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(worker.run(shutdown_rx));

    drop(reviewer);

    timeout(Duration::from_secs(2), handle)
        .await
        .expect("worker did not exit after channel close")
        .unwrap();
}
