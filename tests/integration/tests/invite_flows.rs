//! Invitation and activation flows end to end.

use dir_model::{AccountStatus, InvitationStatus};
use dir_store::DirectoryStore;

use crate::common::{directory, wrong_otp};

#[tokio::test]
async fn invite_then_sms_verification_activates_the_account() {
    let (directory, _store) = directory();

    let (account, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    assert_eq!(account.status, AccountStatus::Pending);
    assert_eq!(account.session_version, 1);

    // The invitee opens the link and verifies a phone number.
    let opened = directory.get_invite_for_opening(&created.token).await.unwrap();
    assert_eq!(opened.status, InvitationStatus::Sent);

    let started = directory
        .start_invite_sms_verification(&created.token, "+1 555 123 4567")
        .await
        .unwrap();
    let (account, invitation) = directory
        .complete_invite_sms_verification(&created.token, &started.otp_code)
        .await
        .unwrap();

    assert_eq!(account.status, AccountStatus::Active);
    assert!(account.phone_verified_at.is_some());
    assert_eq!(invitation.status, InvitationStatus::Verified);
}

#[tokio::test]
async fn repeated_invites_keep_one_account_per_email() {
    let (directory, store) = directory();

    for role in ["HR", "Manager", "Employee", "HR"] {
        directory
            .invite("Alice@Example.com", role, "admin@example.com")
            .await
            .unwrap();
    }

    let accounts = store.list_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].email, "alice@example.com");
    assert_eq!(accounts[0].role, "HR");

    // Exactly one invitation is still open; the rest were revoked.
    let invitations = store
        .list_invitations_by_email("alice@example.com")
        .await
        .unwrap();
    let open = invitations
        .iter()
        .filter(|invite| !invite.status.is_terminal())
        .count();
    assert_eq!(open, 1);
    assert_eq!(invitations.len(), 4);
}

#[tokio::test]
async fn five_wrong_codes_lock_out_and_revoke_the_invitation() {
    let (directory, _store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    let started = directory
        .start_invite_sms_verification(&created.token, "5551234567")
        .await
        .unwrap();
    let wrong = wrong_otp(&started.otp_code);

    for attempt in 1..=5u32 {
        let err = directory
            .complete_invite_sms_verification(&created.token, &wrong)
            .await
            .unwrap_err();
        if attempt < 5 {
            assert_eq!(err.code(), "invalid_otp");
        } else {
            assert_eq!(err.code(), "otp_attempts_exceeded");
        }
    }

    let invitation = directory.get_invite_for_opening(&created.token).await.unwrap();
    assert_eq!(invitation.status, InvitationStatus::Revoked);

    // No automatic unlock: the account needs a brand-new invitation.
    let (_, fresh) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    let started = directory
        .start_invite_sms_verification(&fresh.token, "5551234567")
        .await
        .unwrap();
    directory
        .complete_invite_sms_verification(&fresh.token, &started.otp_code)
        .await
        .unwrap();
}

#[tokio::test]
async fn business_errors_carry_stable_codes_for_the_workflow_engine() {
    let (directory, _store) = directory();

    let err = directory
        .invite("bad", "HR", "admin@example.com")
        .await
        .unwrap_err();
    assert!(err.is_business());
    assert_eq!(err.code(), "invalid_email");

    let err = directory
        .set_role("ghost@example.com", "HR")
        .await
        .unwrap_err();
    assert!(err.is_business());
    assert_eq!(err.code(), "user_not_found");
}
