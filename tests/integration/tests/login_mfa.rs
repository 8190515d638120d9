//! Step-up login verification end to end.

use crate::common::directory;

#[tokio::test]
async fn email_activated_account_completes_step_up_and_binds_phone() {
    let (directory, _store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    directory.verify_invite_email(&created.token).await.unwrap();

    // The login layer sees an active account without a verified phone and
    // requests a step-up challenge.
    let login = directory
        .get_account_for_login("alice@example.com")
        .await
        .unwrap();
    assert!(login.phone_verified_at.is_none());

    let challenge = directory
        .create_login_mfa_challenge("alice@example.com")
        .await
        .unwrap();
    let started = directory
        .start_login_sms_verification(
            "alice@example.com",
            &challenge.challenge_token,
            "0015551234567",
        )
        .await
        .unwrap();
    assert_eq!(started.phone_masked, "********4567");

    let account = directory
        .complete_login_sms_verification(
            "alice@example.com",
            &challenge.challenge_token,
            &started.otp_code,
        )
        .await
        .unwrap();
    assert!(account.phone_verified_at.is_some());
    assert!(!account.mfa_challenge_pending);

    directory.mark_login("alice@example.com").await.unwrap();
    let login = directory
        .get_account_for_login("alice@example.com")
        .await
        .unwrap();
    assert!(login.last_login_at.is_some());
}

#[tokio::test]
async fn challenge_gates_every_otp_call() {
    let (directory, _store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    directory.verify_invite_email(&created.token).await.unwrap();
    directory
        .create_login_mfa_challenge("alice@example.com")
        .await
        .unwrap();

    let err = directory
        .start_login_sms_verification("alice@example.com", "forged-token", "5551234567")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid_mfa_challenge");

    let err = directory
        .complete_login_sms_verification("alice@example.com", "forged-token", "123456")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid_mfa_challenge");
}

#[tokio::test]
async fn disabled_account_cannot_start_step_up() {
    let (directory, _store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    directory.verify_invite_email(&created.token).await.unwrap();
    directory
        .set_status("alice@example.com", "disabled")
        .await
        .unwrap();

    let err = directory
        .create_login_mfa_challenge("alice@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "account_disabled");
}

#[tokio::test]
async fn session_version_is_visible_to_the_login_layer() {
    let (directory, _store) = directory();
    let (_, created) = directory
        .invite("alice@example.com", "HR", "admin@example.com")
        .await
        .unwrap();
    directory.verify_invite_email(&created.token).await.unwrap();

    let before = directory
        .get_account_for_login("alice@example.com")
        .await
        .unwrap()
        .session_version;

    directory
        .set_role("alice@example.com", "Manager")
        .await
        .unwrap();

    let after = directory
        .get_account_for_login("alice@example.com")
        .await
        .unwrap()
        .session_version;
    assert_eq!(after, before + 1);
}
