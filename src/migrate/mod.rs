//! Best-effort upload of guest-created data into a freshly authenticated
//! account: attempt every item, count what landed, never let one failure
//! block the rest.

use crate::api::{ApiClient, ApiResult};
use crate::guest;
use crate::models::{Idea, IdeaDraft, Memo, MemoDraft};
use leptos::logging::warn;

/// Per-kind count of items created server-side. Counters never exceed the
/// input sizes; which specific items failed is deliberately not reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub ideas: usize,
    pub memos: usize,
}

/// The two create operations migration replays. `ApiClient` is the real
/// backend; tests substitute their own.
#[allow(async_fn_in_trait)]
pub trait MigrationApi {
    async fn create_idea(&self, draft: &IdeaDraft) -> ApiResult<Idea>;
    async fn save_memo(&self, date: &str, content: &str) -> ApiResult<Memo>;
}

impl MigrationApi for ApiClient {
    async fn create_idea(&self, draft: &IdeaDraft) -> ApiResult<Idea> {
        ApiClient::create_idea(self, draft).await
    }

    async fn save_memo(&self, date: &str, content: &str) -> ApiResult<Memo> {
        ApiClient::save_memo(self, date, content).await
    }
}

/// Replays guest items against the account, one request at a time, in input
/// order. A failed item is logged and skipped; the rest still run. Memo
/// uploads use create-or-update semantics, so a date that already has server
/// content is overwritten.
pub async fn migrate_guest_data(
    api: &impl MigrationApi,
    ideas: &[IdeaDraft],
    memos: &[MemoDraft],
) -> MigrationReport {
    let mut report = MigrationReport::default();

    for draft in ideas {
        match api.create_idea(draft).await {
            Ok(_) => report.ideas += 1,
            Err(e) => warn!("guest idea \"{}\" not migrated: {e}", draft.title),
        }
    }

    for memo in memos {
        match api.save_memo(&memo.date, &memo.content).await {
            Ok(_) => report.memos += 1,
            Err(e) => warn!("guest memo {} not migrated: {e}", memo.date),
        }
    }

    report
}

/// Reads everything the guest store holds and uploads it. The local copies
/// stay put; clearing them afterwards is the caller's call.
pub async fn migrate_guest_store(api: &ApiClient) -> MigrationReport {
    let (ideas, memos) = guest::guest_migration_payload();
    migrate_guest_data(api, &ideas, &memos).await
}
