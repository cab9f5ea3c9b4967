pub mod api;
pub mod guest;
pub mod migrate;
pub mod models;
pub mod state;
mod storage;
pub mod util;

pub use api::{
    collect_all_pages, ApiClient, ApiError, ApiErrorKind, ApiResult, AuthResponse, Crawl,
    EnvConfig, Message, ProfilePatch, SessionStore, MAX_AGGREGATED_PAGES, MAX_PAGE_SIZE,
};
pub use migrate::{migrate_guest_data, migrate_guest_store, MigrationApi, MigrationReport};
pub use state::{AppContext, AppState};

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
/// Install the panic hook once, before the app shell mounts anything.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn init() {
    console_error_panic_hook::set_once();
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::models::{IdeaDraft, User};
    use crate::{guest, storage};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn session_token_roundtrip() {
        SessionStore::restore().set_token(None);

        let store = SessionStore::restore();
        assert!(!store.is_authenticated());

        store.set_token(Some("t1".to_string()));
        let reloaded = SessionStore::restore();
        assert_eq!(reloaded.token().as_deref(), Some("t1"));

        reloaded.set_token(None);
        assert!(SessionStore::restore().token().is_none());
    }

    #[wasm_bindgen_test]
    fn user_storage_roundtrip() {
        let user = User {
            id: "u1".to_string(),
            email: "u@example.com".to_string(),
            name: "U".to_string(),
        };
        storage::save_user_to_storage(&user);
        let loaded = storage::load_user_from_storage().expect("should load user from localStorage");
        assert_eq!(loaded.email, "u@example.com");
        storage::clear_user_storage();
        assert!(storage::load_user_from_storage().is_none());
    }

    #[wasm_bindgen_test]
    fn guest_store_roundtrip_and_payload_order() {
        guest::clear_guest_data();

        let first = guest::create_guest_idea(&IdeaDraft {
            title: "first".to_string(),
            ..Default::default()
        });
        guest::create_guest_idea(&IdeaDraft {
            title: "second".to_string(),
            ..Default::default()
        });
        assert!(first.id.starts_with("guest-"));

        guest::save_guest_memo("2026-08-01", "hello");
        guest::save_guest_memo("2026-08-01", "hello again");

        let (ideas, memos) = guest::guest_migration_payload();
        assert_eq!(
            ideas.iter().map(|d| d.title.as_str()).collect::<Vec<_>>(),
            ["first", "second"]
        );
        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0].content, "hello again");

        // Building the payload must not consume the store.
        assert_eq!(guest::list_guest_ideas().len(), 2);

        guest::clear_guest_data();
        assert!(guest::list_guest_ideas().is_empty());
        assert!(guest::list_guest_memos().is_empty());
    }

    #[wasm_bindgen_test]
    fn auth_failure_clears_persisted_token() {
        let client = ApiClient::new("http://localhost:3001".to_string());
        client.session().set_token(Some("stale".to_string()));

        let err = client.failure(401, r#"{"error":"Token expired"}"#);
        assert!(err.is_auth_failure());
        assert!(SessionStore::restore().token().is_none());
    }
}
