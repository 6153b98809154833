//! API client for the WorkHub admin backend.
//!
//! This module provides the `AdminClient` struct every console surface
//! shares. It owns credential attachment and recovery from access-token
//! expiry: a request that comes back 401 triggers a single token refresh
//! and is replayed with the new bearer, invisibly to the caller. A failed
//! refresh purges the session and surfaces `ApiError::SessionExpired`,
//! which the application shell turns into a fresh login.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::{SessionStore, SessionUser, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use crate::models::{
    BillingConfig, CheckoutRequest, CheckoutSession, Company, CompanyInput, CompanyUser,
    DashboardStats, Invoice, LogEntry, LogQuery, Paginated, Plan, PlanInput, PromoCode,
    PromoCodeInput, ServiceHealth, Subscription, Transaction, UserInput,
};

use super::notify::{LogNotices, Notice, NoticeSink};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Login endpoint, unauthenticated
const LOGIN_PATH: &str = "/api/auth/login/";

/// Token refresh endpoint, unauthenticated
const REFRESH_PATH: &str = "/api/auth/refresh/";

/// Refresh-token revocation endpoint
const LOGOUT_PATH: &str = "/api/auth/logout/";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Shared client for the admin backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling,
/// and the session store, notice sink, and refresh gate are shared behind Arcs.
#[derive(Clone)]
pub struct AdminClient {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    notices: Arc<dyn NoticeSink>,
    refresh_gate: Arc<Mutex<()>>,
}

impl AdminClient {
    /// Create a client against `base_url` using `session` for credentials
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            notices: Arc::new(LogNotices),
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }

    /// Replace the advisory notice sink (the default logs via tracing)
    pub fn with_notice_sink(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Request pipeline
    // ========================================================================

    /// Execute a request through the full credential pipeline.
    ///
    /// Every attempt attaches the current access token when one exists. A
    /// 401 on a not-yet-retried request triggers one refresh-and-replay;
    /// the `retried` flag makes the at-most-once contract explicit. A 5xx
    /// raises an advisory notice and is never itself a refresh trigger.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        let mut bearer = self.session.get(ACCESS_TOKEN_KEY);
        let mut retried = false;

        loop {
            let mut request = self.http.request(method.clone(), &url);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(token) = bearer.as_deref() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    self.notices.notify(Notice::ConnectionError);
                    warn!(url = %url, error = %e, "Request failed without a response");
                    return Err(ApiError::Network(e));
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status.is_server_error() {
                self.notices.notify(Notice::ServerError);
            }

            if status == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                debug!(url = %url, "Unauthorized, refreshing access token");
                bearer = Some(self.refresh_access(bearer.as_deref()).await?);
                continue;
            }

            let body_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body_text));
        }
    }

    /// Mint a new access token from the stored refresh token.
    ///
    /// Concurrent 401s coalesce behind the gate: a waiter that finds the
    /// stored access token already differs from the one its failed attempt
    /// carried (`stale`) adopts it instead of issuing another refresh call.
    /// Any failure purges the whole session.
    async fn refresh_access(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _flight = self.refresh_gate.lock().await;

        if let Some(current) = self.session.get(ACCESS_TOKEN_KEY) {
            if Some(current.as_str()) != stale {
                debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.session.get(REFRESH_TOKEN_KEY) else {
            return Err(self.expire_session("no refresh token in session"));
        };

        let response = match self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&json!({ "refresh": refresh_token }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(self.expire_session(&format!("refresh request failed: {e}"))),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(self.expire_session(&format!("refresh rejected with status {status}")));
        }

        let refreshed: RefreshResponse = match response.json().await {
            Ok(refreshed) => refreshed,
            Err(e) => return Err(self.expire_session(&format!("bad refresh response: {e}"))),
        };

        if let Err(e) = self.session.set(ACCESS_TOKEN_KEY, &refreshed.access) {
            // The replay still works with the in-hand token
            warn!(error = %e, "Failed to persist refreshed access token");
        }
        debug!("Access token refreshed");
        Ok(refreshed.access)
    }

    /// Purge the session and produce the error every exhausted-auth path returns
    fn expire_session(&self, reason: &str) -> ApiError {
        warn!(reason, "Session expired, clearing stored credentials");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session store");
        }
        ApiError::SessionExpired(reason.to_string())
    }

    // ========================================================================
    // Generic helpers
    // ========================================================================

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_json_with(path, &[]).await
    }

    async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, query, None).await?;
        Self::decode(path, response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::POST, path, &[], Some(&body)).await?;
        Self::decode(path, response).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::PUT, path, &[], Some(&body)).await?;
        Self::decode(path, response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request body: {e}")))
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {path} response: {e}")))
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Authenticate and persist the session. 401 means bad credentials;
    /// no refresh is attempted because there is no session yet.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let auth: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse login response: {e}")))?;

        let user_json = Self::encode(&auth.user)?.to_string();
        for (key, value) in [
            (ACCESS_TOKEN_KEY, auth.access.as_str()),
            (REFRESH_TOKEN_KEY, auth.refresh.as_str()),
            (USER_KEY, user_json.as_str()),
        ] {
            if let Err(e) = self.session.set(key, value) {
                warn!(key, error = %e, "Failed to persist session entry");
            }
        }

        debug!(email, "Login succeeded");
        Ok(auth.user)
    }

    /// Revoke the refresh token (best effort) and purge the session
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(refresh_token) = self.session.get(REFRESH_TOKEN_KEY) {
            let mut request = self
                .http
                .post(self.url(LOGOUT_PATH))
                .json(&json!({ "refresh": refresh_token }));
            if let Some(token) = self.session.get(ACCESS_TOKEN_KEY) {
                request = request.bearer_auth(token);
            }
            if let Err(e) = request.send().await {
                debug!(error = %e, "Logout revocation call failed, purging anyway");
            }
        }

        self.session
            .clear()
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    /// Decode the cached profile of the signed-in user, if any
    pub fn current_user(&self) -> Option<SessionUser> {
        let raw = self.session.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    // ========================================================================
    // Companies
    // ========================================================================

    pub async fn list_companies(&self) -> Result<Paginated<Company>, ApiError> {
        self.get_json("/api/companies/").await
    }

    pub async fn get_company(&self, id: i64) -> Result<Company, ApiError> {
        self.get_json(&format!("/api/companies/{id}/")).await
    }

    pub async fn create_company(&self, input: &CompanyInput) -> Result<Company, ApiError> {
        self.post_json("/api/companies/", input).await
    }

    pub async fn update_company(&self, id: i64, input: &CompanyInput) -> Result<Company, ApiError> {
        self.put_json(&format!("/api/companies/{id}/"), input).await
    }

    pub async fn delete_company(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/companies/{id}/")).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// List user accounts, optionally scoped to one company
    pub async fn list_users(
        &self,
        company: Option<i64>,
    ) -> Result<Paginated<CompanyUser>, ApiError> {
        let query: Vec<(&str, String)> = company
            .map(|id| vec![("company", id.to_string())])
            .unwrap_or_default();
        self.get_json_with("/api/users/", &query).await
    }

    pub async fn create_user(&self, input: &UserInput) -> Result<CompanyUser, ApiError> {
        self.post_json("/api/users/", input).await
    }

    pub async fn update_user(&self, id: i64, input: &UserInput) -> Result<CompanyUser, ApiError> {
        self.put_json(&format!("/api/users/{id}/"), input).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/users/{id}/")).await
    }

    // ========================================================================
    // Billing configuration
    // ========================================================================

    pub async fn billing_config(&self) -> Result<BillingConfig, ApiError> {
        self.get_json("/api/billing/config/").await
    }

    pub async fn update_billing_config(
        &self,
        config: &BillingConfig,
    ) -> Result<BillingConfig, ApiError> {
        self.put_json("/api/billing/config/", config).await
    }

    pub async fn list_plans(&self) -> Result<Paginated<Plan>, ApiError> {
        self.get_json("/api/billing/plans/").await
    }

    pub async fn create_plan(&self, input: &PlanInput) -> Result<Plan, ApiError> {
        self.post_json("/api/billing/plans/", input).await
    }

    pub async fn update_plan(&self, id: i64, input: &PlanInput) -> Result<Plan, ApiError> {
        self.put_json(&format!("/api/billing/plans/{id}/"), input).await
    }

    pub async fn delete_plan(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/billing/plans/{id}/")).await
    }

    pub async fn list_promo_codes(&self) -> Result<Paginated<PromoCode>, ApiError> {
        self.get_json("/api/billing/promo-codes/").await
    }

    pub async fn create_promo_code(&self, input: &PromoCodeInput) -> Result<PromoCode, ApiError> {
        self.post_json("/api/billing/promo-codes/", input).await
    }

    pub async fn delete_promo_code(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/billing/promo-codes/{id}/")).await
    }

    // ========================================================================
    // Subscriptions, invoices, transactions
    // ========================================================================

    pub async fn list_subscriptions(&self) -> Result<Paginated<Subscription>, ApiError> {
        self.get_json("/api/subscriptions/").await
    }

    pub async fn get_subscription(&self, id: i64) -> Result<Subscription, ApiError> {
        self.get_json(&format!("/api/subscriptions/{id}/")).await
    }

    pub async fn cancel_subscription(&self, id: i64) -> Result<Subscription, ApiError> {
        self.post_json(&format!("/api/subscriptions/{id}/cancel/"), &json!({}))
            .await
    }

    pub async fn list_invoices(&self) -> Result<Paginated<Invoice>, ApiError> {
        self.get_json("/api/invoices/").await
    }

    pub async fn get_invoice(&self, id: i64) -> Result<Invoice, ApiError> {
        self.get_json(&format!("/api/invoices/{id}/")).await
    }

    pub async fn list_transactions(&self) -> Result<Paginated<Transaction>, ApiError> {
        self.get_json("/api/transactions/").await
    }

    // ========================================================================
    // Checkout and pricing
    // ========================================================================

    /// Open a checkout session for an invoice on the chosen payment rail
    pub async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ApiError> {
        self.post_json("/api/checkout/", request).await
    }

    pub async fn checkout_status(&self, id: &str) -> Result<CheckoutSession, ApiError> {
        self.get_json(&format!("/api/checkout/{id}/status/")).await
    }

    /// Public plan listing; works without any stored token
    pub async fn public_pricing(&self) -> Result<Vec<Plan>, ApiError> {
        self.get_json("/api/pricing/").await
    }

    // ========================================================================
    // Logs, monitoring, dashboard
    // ========================================================================

    pub async fn list_logs(&self, query: &LogQuery) -> Result<Paginated<LogEntry>, ApiError> {
        self.get_json_with("/api/logs/", &query.to_pairs()).await
    }

    pub async fn service_health(&self) -> Result<Vec<ServiceHealth>, ApiError> {
        self.get_json("/api/monitoring/status/").await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/api/dashboard/stats/").await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use mockito::Matcher;

    use super::*;
    use crate::auth::MemoryStore;

    #[derive(Default)]
    struct RecordingNotices(StdMutex<Vec<Notice>>);

    impl RecordingNotices {
        fn taken(&self) -> Vec<Notice> {
            self.0.lock().unwrap().clone()
        }
    }

    impl NoticeSink for RecordingNotices {
        fn notify(&self, notice: Notice) {
            self.0.lock().unwrap().push(notice);
        }
    }

    fn test_client(base_url: &str) -> (AdminClient, Arc<MemoryStore>, Arc<RecordingNotices>) {
        let store = Arc::new(MemoryStore::new());
        let notices = Arc::new(RecordingNotices::default());
        let client = AdminClient::new(base_url, store.clone())
            .unwrap()
            .with_notice_sink(notices.clone());
        (client, store, notices)
    }

    const EMPTY_PAGE: &str = r#"{"count":0,"next":null,"previous":null,"results":[]}"#;

    fn companies_page(name: &str) -> String {
        format!(
            r#"{{"count":1,"next":null,"previous":null,"results":[
                {{"id":1,"name":"{name}","email":"ops@x.example","phone":null,"country":"CI",
                  "employee_count":10,"is_active":true,"created_at":"2025-01-01T00:00:00Z"}}]}}"#
        )
    }

    #[tokio::test]
    async fn test_bearer_attached_from_store() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();

        let mock = server
            .mock("GET", "/api/companies/")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(EMPTY_PAGE)
            .create_async()
            .await;

        client.list_companies().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_header_when_no_token() {
        let mut server = mockito::Server::new_async().await;
        let (client, _, _) = test_client(&server.url());

        let mock = server
            .mock("GET", "/api/pricing/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let plans = client.public_pricing().await.unwrap();
        assert!(plans.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_network_failure_notifies_once() {
        // Nothing listens here; the connection is refused outright
        let (client, _, notices) = test_client("http://127.0.0.1:9");

        let err = client.list_companies().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(notices.taken(), vec![Notice::ConnectionError]);
    }

    #[tokio::test]
    async fn test_server_error_notifies_once_and_never_refreshes() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, notices) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        store.set(REFRESH_TOKEN_KEY, "xyz").unwrap();

        server
            .mock("GET", "/api/companies/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/api/auth/refresh/")
            .expect(0)
            .create_async()
            .await;

        let err = client.list_companies().await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
        assert_eq!(notices.taken(), vec![Notice::ServerError]);
        refresh.assert_async().await;
        // Tokens untouched by a 5xx
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_refresh_and_replay_end_to_end() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, notices) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        store.set(REFRESH_TOKEN_KEY, "xyz").unwrap();

        let first = server
            .mock("GET", "/api/companies/")
            .match_header("authorization", "Bearer abc")
            .with_status(401)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/api/auth/refresh/")
            .match_body(Matcher::Json(json!({ "refresh": "xyz" })))
            .with_status(200)
            .with_body(r#"{"access":"new123"}"#)
            .expect(1)
            .create_async()
            .await;
        let replay = server
            .mock("GET", "/api/companies/")
            .match_header("authorization", "Bearer new123")
            .with_status(200)
            .with_body(companies_page("Sahel Logistics"))
            .expect(1)
            .create_async()
            .await;

        let page = client.list_companies().await.unwrap();
        assert_eq!(page.results[0].name, "Sahel Logistics");

        first.assert_async().await;
        refresh.assert_async().await;
        replay.assert_async().await;

        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("new123"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("xyz"));
        assert!(notices.taken().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_rejected_purges_session() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        store.set(REFRESH_TOKEN_KEY, "expired").unwrap();
        store.set(USER_KEY, r#"{"id":1}"#).unwrap();

        server
            .mock("GET", "/api/companies/")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/api/auth/refresh/")
            .with_status(401)
            .with_body(r#"{"detail":"Token is invalid or expired"}"#)
            .create_async()
            .await;

        let err = client.list_companies().await.unwrap_err();
        // The refresh failure is surfaced, not the original 401
        assert!(matches!(err, ApiError::SessionExpired(_)));
        for key in crate::auth::SESSION_KEYS {
            assert_eq!(store.get(key), None, "key {key} should be purged");
        }
    }

    #[tokio::test]
    async fn test_second_401_is_not_refreshed_again() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        store.set(REFRESH_TOKEN_KEY, "xyz").unwrap();

        let unauthorized = server
            .mock("GET", "/api/companies/")
            .with_status(401)
            .expect(2)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_body(r#"{"access":"tok2"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client.list_companies().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));

        unauthorized.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_without_network_call() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        store.set(USER_KEY, r#"{"id":1}"#).unwrap();

        server
            .mock("GET", "/api/companies/")
            .with_status(401)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/api/auth/refresh/")
            .expect(0)
            .create_async()
            .await;

        let err = client.list_companies().await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired(_)));
        refresh.assert_async().await;
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
        assert_eq!(store.get(USER_KEY), None);
    }

    #[tokio::test]
    async fn test_sequential_refresh_cycles_are_independent() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(REFRESH_TOKEN_KEY, "xyz").unwrap();

        server
            .mock("GET", "/api/companies/")
            .match_header("authorization", "Bearer stale")
            .with_status(401)
            .expect(2)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_body(r#"{"access":"fresh"}"#)
            .expect(2)
            .create_async()
            .await;
        server
            .mock("GET", "/api/companies/")
            .match_header("authorization", "Bearer fresh")
            .with_status(200)
            .with_body(EMPTY_PAGE)
            .expect(2)
            .create_async()
            .await;

        for _ in 0..2 {
            store.set(ACCESS_TOKEN_KEY, "stale").unwrap();
            client.list_companies().await.unwrap();
            assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("fresh"));
        }

        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "stale").unwrap();
        store.set(REFRESH_TOKEN_KEY, "xyz").unwrap();

        server
            .mock("GET", "/api/companies/")
            .match_header("authorization", "Bearer stale")
            .with_status(401)
            .expect_at_most(2)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_body(r#"{"access":"fresh"}"#)
            .expect(1)
            .create_async()
            .await;
        let replay = server
            .mock("GET", "/api/companies/")
            .match_header("authorization", "Bearer fresh")
            .with_status(200)
            .with_body(EMPTY_PAGE)
            .expect(2)
            .create_async()
            .await;

        let (a, b) = tokio::join!(client.list_companies(), client.list_companies());
        a.unwrap();
        b.unwrap();

        refresh.assert_async().await;
        replay.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());

        server
            .mock("POST", "/api/auth/login/")
            .match_body(Matcher::Json(json!({
                "email": "admin@workhub.example",
                "password": "hunter2"
            })))
            .with_status(200)
            .with_body(
                r#"{"access":"a1","refresh":"r1",
                    "user":{"id":7,"email":"admin@workhub.example",
                            "first_name":"Awa","last_name":"Traore","role":"admin"}}"#,
            )
            .create_async()
            .await;

        let user = client.login("admin@workhub.example", "hunter2").await.unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("a1"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));

        let cached = client.current_user().unwrap();
        assert_eq!(cached.full_name(), "Awa Traore");
    }

    #[tokio::test]
    async fn test_login_rejection_maps_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());

        server
            .mock("POST", "/api/auth/login/")
            .with_status(401)
            .with_body(r#"{"detail":"No active account found"}"#)
            .create_async()
            .await;

        let err = client.login("admin@workhub.example", "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_logout_purges_even_if_revocation_fails() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        store.set(REFRESH_TOKEN_KEY, "xyz").unwrap();
        store.set(USER_KEY, r#"{"id":1}"#).unwrap();

        server
            .mock("POST", "/api/auth/logout/")
            .with_status(500)
            .create_async()
            .await;

        client.logout().await.unwrap();
        for key in crate::auth::SESSION_KEYS {
            assert_eq!(store.get(key), None);
        }
    }

    #[tokio::test]
    async fn test_log_query_sent_as_url_params() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, _) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();

        let mock = server
            .mock("GET", "/api/logs/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("level".into(), "error".into()),
                Matcher::UrlEncoded("page".into(), "3".into()),
            ]))
            .with_status(200)
            .with_body(EMPTY_PAGE)
            .create_async()
            .await;

        let query = LogQuery {
            level: Some(crate::models::LogLevel::Error),
            search: None,
            page: Some(3),
        };
        client.list_logs(&query).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_propagates_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let (client, store, notices) = test_client(&server.url());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();

        server
            .mock("GET", "/api/companies/99/")
            .with_status(404)
            .with_body(r#"{"detail":"Not found."}"#)
            .create_async()
            .await;

        let err = client.get_company(99).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(notices.taken().is_empty());
    }
}
