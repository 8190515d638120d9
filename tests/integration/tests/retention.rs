//! Archival and retention purge end to end.

use chrono::{Duration, Utc};
use dir_model::AccountStatus;
use dir_store::DirectoryStore;

use crate::common::directory;

#[tokio::test]
async fn archived_account_is_purged_after_the_retention_window() {
    let (directory, store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    directory.verify_invite_email(&created.token).await.unwrap();

    // Offboarding approved: the workflow engine archives the account.
    let archived = directory
        .archive("alice@example.com", "workflow@example.com", None, None)
        .await
        .unwrap();
    assert_eq!(archived.status, AccountStatus::Disabled);
    assert!(archived.is_archived);

    let deadline = archived.retention_delete_at.unwrap();
    assert_eq!(deadline, archived.archived_at.unwrap() + Duration::days(5 * 365));

    // One day before the deadline: nothing happens.
    let report = directory.purge_due(deadline - Duration::days(1)).await.unwrap();
    assert_eq!(report.purged, 0);

    // One day past the deadline: account and invitations are gone.
    let report = directory.purge_due(deadline + Duration::days(1)).await.unwrap();
    assert_eq!(report.purged, 1);
    assert_eq!(report.purged_emails, vec!["alice@example.com".to_string()]);
    assert!(store.get_account("alice@example.com").await.unwrap().is_none());
    assert!(store
        .list_invitations_by_email("alice@example.com")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn purge_never_touches_unarchived_accounts() {
    let (directory, store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    directory.verify_invite_email(&created.token).await.unwrap();

    // Force a past deadline without going through archival.
    let mut account = store.get_account("alice@example.com").await.unwrap().unwrap();
    account.retention_delete_at = Some(Utc::now() - Duration::days(1));
    store.put_account(&account).await.unwrap();

    let report = directory.purge_due(Utc::now()).await.unwrap();
    assert_eq!(report.purged, 0);
    assert!(store.get_account("alice@example.com").await.unwrap().is_some());
}

#[tokio::test]
async fn archived_account_can_only_be_reopened_by_reinvite() {
    let (directory, _store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    directory.verify_invite_email(&created.token).await.unwrap();
    directory
        .archive("alice@example.com", "admin@example.com", None, None)
        .await
        .unwrap();

    let err = directory
        .set_status("alice@example.com", "active")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid_status");

    let (account, _) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    assert_eq!(account.status, AccountStatus::Pending);
    assert!(!account.is_archived);
}
