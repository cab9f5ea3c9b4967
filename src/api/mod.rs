mod pagination;
mod session;

pub use pagination::{collect_all_pages, Crawl, MAX_AGGREGATED_PAGES, MAX_PAGE_SIZE};
pub use session::SessionStore;

use crate::models::{
    HistoryEntry, Idea, IdeaDraft, IdeaFilter, IdeaPatch, IdeaStats, IdeaStatus, Memo, MemoDraft,
    Paged, User,
};
use crate::storage::clear_user_storage;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The HTTP call itself could not complete (offline, DNS, timeout).
    Network,
    /// Non-2xx response.
    Http,
    /// Non-2xx response saying the credential itself is no longer valid.
    Auth,
    /// 2xx response whose body did not decode as the expected shape.
    Parse,
}

#[derive(Clone, Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// Human-readable, suitable for direct display.
    pub message: String,
    pub status: Option<u16>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
            status: None,
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
            status: None,
        }
    }

    fn http(status: u16, message: String) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message,
            status: Some(status),
        }
    }

    fn auth(status: u16, message: String) -> Self {
        Self {
            kind: ApiErrorKind::Auth,
            message,
            status: Some(status),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The backend has no machine-readable "dead token" code; it signals one only
/// through free text. Best-effort by construction — a plain 401 stays a plain
/// request failure.
pub(crate) fn is_auth_failure(status: u16, message: &str) -> bool {
    if status != 401 {
        return false;
    }
    let message = message.to_lowercase();
    ["expired", "invalid", "revoked"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// Error bodies are duck-typed `{error?: string}`. Anything else (missing
/// field, malformed JSON, HTML error page) yields `None`.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(|s| s.to_string())
}

fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:3001".to_string();

        // Deployment injects `window.ENV.API_URL`; older bundles used the
        // lowercase key, so accept both.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Partial profile update; unset fields keep their server values.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct BulkStatusRequest {
    pub ids: Vec<String>,
    pub status: IdeaStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub message: String,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct ResetTokenCheck {
    pub valid: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Explicit `None` body for GET/DELETE-style requests; `()` keeps the
/// `Option<&impl Serialize>` parameter inferable.
const NO_BODY: Option<&()> = None;

/// One client instance is constructed at application start and handed to
/// consumers by context. Clones share the same session.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            session: SessionStore::new(),
        }
    }

    /// Client for app startup: configured base URL plus the persisted session,
    /// so a reload resumes where the user left off.
    pub fn restore() -> Self {
        Self {
            base_url: EnvConfig::new().api_url,
            session: SessionStore::restore(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub(crate) fn auth_header(&self) -> Option<String> {
        self.session.token().map(|t| format!("Bearer {t}"))
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client
            .request(method, url)
            .header("Content-Type", "application/json");

        // The header value is captured here; a token change mid-flight does
        // not retroactively affect this request.
        if let Some(auth) = self.auth_header() {
            req = req.header("Authorization", auth);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status().as_u16();

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(self.failure(status, &body))
        }
    }

    /// Builds the error for a non-2xx response. When the response says the
    /// credential itself is dead, the session is cleared *before* the error
    /// is returned, so any UI reacting to it already observes an
    /// unauthenticated client.
    pub(crate) fn failure(&self, status: u16, body: &str) -> ApiError {
        let message =
            parse_error_message(body).unwrap_or_else(|| format!("Request failed ({status})"));
        if is_auth_failure(status, &message) {
            self.session.set_token(None);
            ApiError::auth(status, message)
        } else {
            ApiError::http(status, message)
        }
    }

    // Auth

    pub async fn register(&self, email: &str, password: &str, name: &str) -> ApiResult<AuthResponse> {
        let res: AuthResponse = self
            .request(
                Method::POST,
                "/auth/register",
                Some(&RegisterRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                    name: name.to_string(),
                }),
            )
            .await?;
        self.session.set_token(Some(res.token.clone()));
        Ok(res)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let res: AuthResponse = self
            .request(
                Method::POST,
                "/auth/login",
                Some(&LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                }),
            )
            .await?;
        self.session.set_token(Some(res.token.clone()));
        Ok(res)
    }

    /// Server-side invalidation is best-effort; the local session and the
    /// persisted user are gone either way once this returns.
    pub async fn logout(&self) {
        let res: ApiResult<Message> = self.request(Method::POST, "/auth/logout", NO_BODY).await;
        if let Err(e) = res {
            leptos::logging::log!("logout: server-side invalidation failed: {e}");
        }
        self.session.set_token(None);
        clear_user_storage();
    }

    pub async fn request_password_reset(&self, email: &str) -> ApiResult<Message> {
        self.request(
            Method::POST,
            "/auth/password-reset/request",
            Some(&serde_json::json!({ "email": email })),
        )
        .await
    }

    pub async fn verify_password_reset(&self, token: &str) -> ApiResult<bool> {
        let res: ResetTokenCheck = self
            .request(
                Method::POST,
                "/auth/password-reset/verify",
                Some(&serde_json::json!({ "token": token })),
            )
            .await?;
        Ok(res.valid)
    }

    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> ApiResult<Message> {
        self.request(
            Method::POST,
            "/auth/password-reset/confirm",
            Some(&PasswordResetConfirmRequest {
                token: token.to_string(),
                new_password: new_password.to_string(),
            }),
        )
        .await
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.request(Method::GET, "/auth/me", NO_BODY).await
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> ApiResult<User> {
        self.request(Method::PUT, "/auth/profile", Some(patch)).await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ApiResult<Message> {
        self.request(
            Method::PUT,
            "/auth/password",
            Some(&ChangePasswordRequest {
                current_password: current_password.to_string(),
                new_password: new_password.to_string(),
            }),
        )
        .await
    }

    // Ideas

    pub async fn list_ideas(
        &self,
        filter: &IdeaFilter,
        page: u32,
        limit: u32,
    ) -> ApiResult<Paged<Idea>> {
        let mut pairs = filter.query_pairs();
        pairs.push(("page", page.max(1).to_string()));
        pairs.push(("limit", limit.clamp(1, MAX_PAGE_SIZE).to_string()));
        self.request(Method::GET, &with_query("/ideas", &pairs), NO_BODY)
            .await
    }

    /// Everything matching `filter`, pagination handled here. See
    /// [`collect_all_pages`] for the termination guarantee.
    pub async fn all_ideas(&self, filter: &IdeaFilter) -> ApiResult<Crawl<Idea>> {
        collect_all_pages(|page| self.list_ideas(filter, page, MAX_PAGE_SIZE)).await
    }

    pub async fn create_idea(&self, draft: &IdeaDraft) -> ApiResult<Idea> {
        self.request(Method::POST, "/ideas", Some(draft)).await
    }

    pub async fn update_idea(&self, id: &str, patch: &IdeaPatch) -> ApiResult<Idea> {
        self.request(Method::PUT, &format!("/ideas/{id}"), Some(patch))
            .await
    }

    pub async fn delete_idea(&self, id: &str) -> ApiResult<Message> {
        self.request(Method::DELETE, &format!("/ideas/{id}"), NO_BODY)
            .await
    }

    pub async fn idea_stats(&self) -> ApiResult<IdeaStats> {
        self.request(Method::GET, "/ideas/stats/summary", NO_BODY)
            .await
    }

    pub async fn bulk_update_status(
        &self,
        ids: &[String],
        status: IdeaStatus,
    ) -> ApiResult<Message> {
        self.request(
            Method::PATCH,
            "/ideas/bulk/status",
            Some(&BulkStatusRequest {
                ids: ids.to_vec(),
                status,
            }),
        )
        .await
    }

    // Memos

    pub async fn list_memos(&self, month: u32, year: i32) -> ApiResult<Vec<Memo>> {
        let pairs = [("month", month.to_string()), ("year", year.to_string())];
        let res: DataEnvelope<Vec<Memo>> = self
            .request(Method::GET, &with_query("/memos", &pairs), NO_BODY)
            .await?;
        Ok(res.data)
    }

    pub async fn memo_by_date(&self, date: &str) -> ApiResult<Option<Memo>> {
        self.request(Method::GET, &format!("/memos/date/{date}"), NO_BODY)
            .await
    }

    /// Create-or-update: saving to a date that already has a memo overwrites it.
    pub async fn save_memo(&self, date: &str, content: &str) -> ApiResult<Memo> {
        self.request(
            Method::POST,
            "/memos",
            Some(&MemoDraft {
                date: date.to_string(),
                content: content.to_string(),
            }),
        )
        .await
    }

    pub async fn delete_memo(&self, id: &str) -> ApiResult<Message> {
        self.request(Method::DELETE, &format!("/memos/{id}"), NO_BODY)
            .await
    }

    pub async fn delete_memo_by_date(&self, date: &str) -> ApiResult<Message> {
        self.request(Method::DELETE, &format!("/memos/date/{date}"), NO_BODY)
            .await
    }

    // History

    pub async fn history(&self, limit: u32, offset: u32) -> ApiResult<Vec<HistoryEntry>> {
        let pairs = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let res: DataEnvelope<Vec<HistoryEntry>> = self
            .request(Method::GET, &with_query("/history", &pairs), NO_BODY)
            .await?;
        Ok(res.data)
    }

    pub async fn idea_history(&self, idea_id: &str) -> ApiResult<Vec<HistoryEntry>> {
        let res: DataEnvelope<Vec<HistoryEntry>> = self
            .request(Method::GET, &format!("/history/idea/{idea_id}"), NO_BODY)
            .await?;
        Ok(res.data)
    }

    pub async fn recent_history(&self) -> ApiResult<Vec<HistoryEntry>> {
        let res: DataEnvelope<Vec<HistoryEntry>> = self
            .request(Method::GET, "/history/recent", NO_BODY)
            .await?;
        Ok(res.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_needs_401_and_a_matching_phrase() {
        assert!(is_auth_failure(401, "Token expired"));
        assert!(is_auth_failure(401, "Invalid token"));
        assert!(is_auth_failure(401, "Session REVOKED by admin"));
        assert!(!is_auth_failure(401, "Unauthorized"));
        assert!(!is_auth_failure(403, "Token expired"));
        assert!(!is_auth_failure(500, "invalid"));
    }

    #[test]
    fn error_body_is_duck_typed() {
        assert_eq!(
            parse_error_message(r#"{"error":"Token expired"}"#).as_deref(),
            Some("Token expired")
        );
        assert_eq!(parse_error_message(r#"{"message":"nope"}"#), None);
        assert_eq!(parse_error_message("<html>502</html>"), None);
        assert_eq!(parse_error_message(""), None);
    }

    #[test]
    fn with_query_encodes_values() {
        assert_eq!(with_query("/ideas", &[]), "/ideas");
        assert_eq!(
            with_query(
                "/ideas",
                &[
                    ("search", "solar panel".to_string()),
                    ("page", "2".to_string()),
                ]
            ),
            "/ideas?search=solar%20panel&page=2"
        );
    }

    #[test]
    fn auth_response_contract_deserialize() {
        let json = r#"{
            "token": "jwt-token",
            "user": {"id": "u1", "email": "u@example.com", "name": "U"}
        }"#;
        let parsed: AuthResponse = serde_json::from_str(json).expect("auth response should parse");
        assert_eq!(parsed.token, "jwt-token");
        assert_eq!(parsed.user.email, "u@example.com");
    }

    #[test]
    fn client_without_token_sends_no_auth_header() {
        let client = ApiClient::new("http://localhost:3001".to_string());
        assert!(client.auth_header().is_none());
        assert!(!client.is_authenticated());
    }

    #[test]
    fn auth_header_matches_stored_token() {
        let client = ApiClient::new("http://localhost:3001".to_string());
        client.session().set_token(Some("my-jwt-token".to_string()));
        assert_eq!(client.auth_header().as_deref(), Some("Bearer my-jwt-token"));
    }

    #[test]
    fn fresh_token_is_visible_to_existing_clones() {
        let client = ApiClient::new("http://localhost:3001".to_string());
        let clone = client.clone();
        client.session().set_token(Some("fresh".to_string()));
        assert_eq!(clone.auth_header().as_deref(), Some("Bearer fresh"));
    }

    #[test]
    fn auth_failure_response_clears_session_before_surfacing() {
        let client = ApiClient::new("http://localhost:3001".to_string());
        client.session().set_token(Some("stale".to_string()));

        let err = client.failure(401, r#"{"error":"Token expired"}"#);
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert_eq!(err.status, Some(401));
        assert!(err.is_auth_failure());
        assert!(client.session().token().is_none());
    }

    #[test]
    fn plain_unauthorized_keeps_session() {
        let client = ApiClient::new("http://localhost:3001".to_string());
        client.session().set_token(Some("kept".to_string()));

        let err = client.failure(401, r#"{"error":"Unauthorized"}"#);
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert!(!err.is_auth_failure());
        assert_eq!(client.session().token().as_deref(), Some("kept"));
    }

    #[test]
    fn failure_defaults_message_when_body_is_opaque() {
        let client = ApiClient::new("http://localhost:3001".to_string());
        let err = client.failure(503, "upstream blew up");
        assert_eq!(err.message, "Request failed (503)");
        assert_eq!(err.status, Some(503));
        assert_eq!(err.kind, ApiErrorKind::Http);
    }
}
