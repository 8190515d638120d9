//! Dual-backend behavior: fallback service and preparation.

use std::sync::Arc;

use dir_model::AccountStatus;
use dir_lifecycle::Directory;
use dir_store::{DirectoryStore, MemoryStore};
use dir_store_local::LocalDirectoryStore;

use crate::common::{test_config, DownStore};

#[tokio::test]
async fn directory_stays_serviceable_on_the_local_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    let fallback = Arc::new(LocalDirectoryStore::new(tmp.path().join("directory.json")));
    let directory = Directory::with_failover(Arc::new(DownStore), fallback, test_config());

    // The primary is down for the whole flow; everything lands on the
    // local document store.
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    let started = directory
        .start_invite_sms_verification(&created.token, "5551234567")
        .await
        .unwrap();
    let (account, _) = directory
        .complete_invite_sms_verification(&created.token, &started.otp_code)
        .await
        .unwrap();
    assert_eq!(account.status, AccountStatus::Active);

    let accounts = directory.list_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
}

#[tokio::test]
async fn business_errors_do_not_trigger_fallback_writes() {
    let fallback = Arc::new(MemoryStore::new());
    let primary = Arc::new(MemoryStore::new());
    let directory = Directory::with_failover(
        Arc::clone(&primary) as _,
        Arc::clone(&fallback) as _,
        test_config(),
    );

    // A caller error with a healthy primary: nothing reaches the fallback.
    let err = directory
        .invite("not-an-email", "HR", "admin@example.com")
        .await
        .unwrap_err();
    assert!(err.is_business());

    directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    assert!(primary
        .get_account("alice@example.com")
        .await
        .unwrap()
        .is_some());
    assert!(fallback
        .get_account("alice@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn preparation_bootstraps_both_backends() {
    let tmp = tempfile::tempdir().unwrap();
    let primary = Arc::new(MemoryStore::new());
    let fallback = Arc::new(LocalDirectoryStore::new(tmp.path().join("directory.json")));
    let directory = Directory::with_failover(
        Arc::clone(&primary) as _,
        Arc::clone(&fallback) as _,
        test_config(),
    );

    let report = directory.prepare().await.unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.skipped_backends, 0);

    assert!(primary.get_account("ops@example.com").await.unwrap().is_some());
    assert!(fallback.get_account("ops@example.com").await.unwrap().is_some());
}

#[tokio::test]
async fn preparation_skips_a_down_backend_and_reports_it() {
    let fallback = Arc::new(MemoryStore::new());
    let directory = Directory::with_failover(
        Arc::new(DownStore),
        Arc::clone(&fallback) as _,
        test_config(),
    );

    let report = directory.prepare().await.unwrap();
    assert_eq!(report.skipped_backends, 1);
    assert!(fallback.get_account("ops@example.com").await.unwrap().is_some());
}
