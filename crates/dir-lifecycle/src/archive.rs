//! Account archival and retention purge.

use chrono::{DateTime, Utc};
use dir_crypto::mask_email;
use dir_model::{AccountView, PurgeReport};

use crate::directory::Directory;
use crate::error::LifecycleResult;

impl Directory {
    /// Archives an account: forces `disabled`, records who/why/when, and
    /// computes the retention deadline as the later of the supplied value
    /// and `archived_at + retention window`, so the deadline can be
    /// pushed out but never pulled inside the policy window.
    ///
    /// ## Errors
    ///
    /// Returns `user_not_found` if the account is missing.
    pub async fn archive(
        &self,
        user_id: &str,
        archived_by: &str,
        reason: Option<&str>,
        retention_delete_at: Option<DateTime<Utc>>,
    ) -> LifecycleResult<AccountView> {
        let mut account = self.load_account(user_id).await?;

        let archived_at = Utc::now();
        let floor = archived_at + self.config.retention_window();
        let deadline = retention_delete_at.map_or(floor, |requested| requested.max(floor));

        let status_changed = account.archive(
            archived_by,
            reason.unwrap_or("Resigned"),
            archived_at,
            deadline,
        );
        self.store.put_account(&account).await?;
        if status_changed {
            self.sync_claims_best_effort(&account).await;
        }

        tracing::info!(
            account = %mask_email(&account.email),
            retention_delete_at = %deadline,
            "account archived",
        );
        Ok(AccountView::from(&account))
    }

    /// Purges every account whose retention deadline has elapsed, along
    /// with all of its invitations. Archival is a precondition: an
    /// account that never passed through archival is not purged even if
    /// its deadline field reads as due.
    ///
    /// The sweep is externally triggered and takes `now` from the
    /// trigger.
    ///
    /// ## Errors
    ///
    /// Returns an error if the store is unavailable.
    pub async fn purge_due(&self, now: DateTime<Utc>) -> LifecycleResult<PurgeReport> {
        let accounts = self.store.list_accounts().await?;
        let mut report = PurgeReport {
            scanned: accounts.len(),
            ..PurgeReport::default()
        };

        for account in accounts {
            if !account.is_purge_due(now) {
                continue;
            }
            self.store
                .delete_invitations_by_email(&account.email)
                .await?;
            self.store.delete_account(&account.email).await?;
            report.purged += 1;
            report.purged_emails.push(account.email);
        }

        tracing::info!(
            scanned = report.scanned,
            purged = report.purged,
            "retention purge sweep complete",
        );
        Ok(report)
    }
}
