use crate::api::ApiClient;
use crate::models::User;
use crate::storage::{load_user_from_storage, save_user_to_storage};
use leptos::prelude::*;

#[derive(Clone)]
pub struct AppState {
    /// One client for the whole app, handed to consumers by context so tests
    /// can build isolated instances instead of reaching for a global.
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<User>>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::restore();
        let stored_user = load_user_from_storage();

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
        }
    }

    /// Post-auth bookkeeping shared by the login and signup flows.
    pub fn set_session_user(&self, user: User) {
        save_user_to_storage(&user);
        self.current_user.set(Some(user));
    }

    pub fn clear_session_user(&self) {
        self.current_user.set(None);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppContext(pub AppState);
