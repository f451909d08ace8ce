//! Firebase Authentication driver (Identity Toolkit REST API)

use super::ensure_success;
use crate::config::{ACCESS_TOKEN, API_KEY, AUTH_URL, DEFAULT_AUTH_URL, PROJECT_ID};
use crate::core::{FirekitError, FirekitResult};
use crate::di::traits::{AuthDriver, ConfigProvider, CreateUser, UserRecord, VerifiedToken};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Auth driver that forwards to the Identity Toolkit REST API
pub struct FirebaseAuthDriver {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountResponse>,
}

impl FirebaseAuthDriver {
    /// Create a driver from configuration
    ///
    /// Requires `FIREBASE_PROJECT_ID`. `FIREBASE_ACCESS_TOKEN` and
    /// `FIREBASE_API_KEY` are checked when the call needing them is made.
    pub fn from_config(config: &dyn ConfigProvider) -> FirekitResult<Self> {
        let project_id =
            config.get_or_throw(PROJECT_ID, Some("required by the Firebase auth driver"))?;
        let base_url = config
            .get_or(AUTH_URL, DEFAULT_AUTH_URL)
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FirekitError::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(project = %project_id, base_url = %base_url, "created Firebase auth driver");
        Ok(Self {
            client,
            base_url,
            project_id,
            api_key: config.get(API_KEY),
            access_token: config.get(ACCESS_TOKEN),
        })
    }

    fn required<'a>(value: &'a Option<String>, key: &str, why: &str) -> FirekitResult<&'a str> {
        value.as_deref().ok_or_else(|| FirekitError::MissingConfig {
            key: key.to_string(),
            message: Some(why.to_string()),
        })
    }
}

#[async_trait]
impl AuthDriver for FirebaseAuthDriver {
    async fn create_user(&self, request: CreateUser) -> FirekitResult<UserRecord> {
        let token = Self::required(&self.access_token, ACCESS_TOKEN, "required to create users")?;
        let url = format!(
            "{}/v1/projects/{}/accounts",
            self.base_url, self.project_id
        );

        let mut body = serde_json::Map::new();
        if let Some(uid) = request.uid {
            body.insert("localId".to_string(), uid.into());
        }
        if let Some(email) = request.email {
            body.insert("email".to_string(), email.into());
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let account: AccountResponse = ensure_success(response).await?.json().await?;

        Ok(UserRecord {
            uid: account.local_id,
            email: account.email.unwrap_or_default(),
        })
    }

    async fn verify_id_token(&self, token: &str) -> FirekitResult<VerifiedToken> {
        let api_key = Self::required(&self.api_key, API_KEY, "required to verify ID tokens")?;
        let url = format!("{}/v1/accounts:lookup", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await?;
        let lookup: LookupResponse = ensure_success(response).await?.json().await?;

        lookup
            .users
            .into_iter()
            .next()
            .map(|account| VerifiedToken {
                uid: account.local_id,
            })
            .ok_or(FirekitError::UnrecognizedToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::MockConfigProvider;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> MockConfigProvider {
        MockConfigProvider::new()
            .with(PROJECT_ID, "demo")
            .with(AUTH_URL, server.uri())
            .with(API_KEY, "web-key")
            .with(ACCESS_TOKEN, "admin-token")
    }

    #[test]
    fn test_from_config_requires_project() {
        let err = FirebaseAuthDriver::from_config(&MockConfigProvider::new())
            .err()
            .unwrap();
        assert!(matches!(err, FirekitError::MissingConfig { ref key, .. } if key == PROJECT_ID));
    }

    #[test]
    fn test_from_config_defaults_base_url() {
        let config = MockConfigProvider::new().with(PROJECT_ID, "demo");
        let driver = FirebaseAuthDriver::from_config(&config).unwrap();
        assert_eq!(driver.base_url, DEFAULT_AUTH_URL);
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts"))
            .and(header("authorization", "Bearer admin-token"))
            .and(body_json(serde_json::json!({ "localId": "u1", "email": "a@b.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "identitytoolkit#SignupNewUserResponse",
                "localId": "u1",
                "email": "a@b.com"
            })))
            .mount(&server)
            .await;

        let driver = FirebaseAuthDriver::from_config(&config(&server)).unwrap();
        let user = driver
            .create_user(CreateUser::with_uid("u1").email("a@b.com"))
            .await
            .unwrap();

        assert_eq!(user.uid, "u1");
        assert_eq!(user.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_create_user_surfaces_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/accounts"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "DUPLICATE_LOCAL_ID" }
            })))
            .mount(&server)
            .await;

        let driver = FirebaseAuthDriver::from_config(&config(&server)).unwrap();
        let err = driver
            .create_user(CreateUser::with_uid("u1"))
            .await
            .unwrap_err();

        match err {
            FirekitError::Remote { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "DUPLICATE_LOCAL_ID");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_user_without_access_token() {
        let server = MockServer::start().await;
        let config = MockConfigProvider::new()
            .with(PROJECT_ID, "demo")
            .with(AUTH_URL, server.uri());

        let driver = FirebaseAuthDriver::from_config(&config).unwrap();
        let err = driver
            .create_user(CreateUser::with_uid("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FirekitError::MissingConfig { ref key, .. } if key == ACCESS_TOKEN));
    }

    #[tokio::test]
    async fn test_verify_id_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .and(query_param("key", "web-key"))
            .and(body_json(serde_json::json!({ "idToken": "h.p.s" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "users": [{ "localId": "u1", "email": "a@b.com" }]
            })))
            .mount(&server)
            .await;

        let driver = FirebaseAuthDriver::from_config(&config(&server)).unwrap();
        let verified = driver.verify_id_token("h.p.s").await.unwrap();
        assert_eq!(verified.uid, "u1");
    }

    #[tokio::test]
    async fn test_verify_id_token_without_users() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let driver = FirebaseAuthDriver::from_config(&config(&server)).unwrap();
        let err = driver.verify_id_token("h.p.s").await.unwrap_err();
        assert!(matches!(err, FirekitError::UnrecognizedToken));
        assert_eq!(err.to_string(), "ID token not recognized");
    }
}
