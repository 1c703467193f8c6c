//! HTTP transport shared by every endpoint wrapper.

use reqwest::{Method, RequestBuilder, Response, Url};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// List endpoints answer either with a bare array or with `{ "data": [...] }`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Plain(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(v) | Self::Wrapped { data: v } => v,
        }
    }
}

/// Client for the WorkNow REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.api_base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// The session store this client reads its token from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Append `segments` to the base URL, each as exactly one path segment
    /// (`/`, `?`, `#` and `%` inside a segment are percent-encoded).
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ApiError::InvalidId(bad.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the stored bearer token if there is one.
    async fn request(&self, method: Method, path: &[&str]) -> Result<RequestBuilder, ApiError> {
        let mut builder = self.http.request(method, self.url(path)?);
        if let Some(token) = self.session.token().await? {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    pub(crate) async fn get<R: DeserializeOwned>(&self, path: &[&str]) -> Result<R, ApiError> {
        let req = self.request(Method::GET, path).await?;
        self.send(&endpoint(path), req).await
    }

    pub(crate) async fn get_query<R: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<R, ApiError> {
        let req = self.request(Method::GET, path).await?.query(query);
        self.send(&endpoint(path), req).await
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let body: ListBody<T> = self.get_query(path, query).await?;
        Ok(body.into_vec())
    }

    pub(crate) async fn send_json<B, R>(
        &self,
        method: Method,
        path: &[&str],
        body: &B,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let req = self.request(method, path).await?.json(body);
        self.send(&endpoint(path), req).await
    }

    /// Send the request and decode a 2xx JSON body. Anything else becomes an
    /// [`ApiError`].
    async fn send<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        req: RequestBuilder,
    ) -> Result<R, ApiError> {
        let resp = req.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Request failed to send");
            ApiError::Network(e.to_string())
        })?;

        let resp = check_status(endpoint, resp).await?;
        debug!(endpoint, status = %resp.status(), "Request succeeded");

        resp.json::<R>()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Human-readable endpoint for logs and errors.
fn endpoint(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

async fn check_status(endpoint: &str, resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!(endpoint, %status, message = message.as_deref().unwrap_or(""), "Request rejected");
    Err(ApiError::Status {
        endpoint: endpoint.to_string(),
        status,
        message,
    })
}

/// Pull the optional `message` field out of an error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::storage::MemoryStore;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig {
            api_base_url: base.to_string(),
            ..Default::default()
        };
        ApiClient::new(&config, SessionStore::new(Arc::new(MemoryStore::new()))).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let c = client("http://api.test/v1/");
        assert_eq!(c.url(&["jobs"]).unwrap().as_str(), "http://api.test/v1/jobs");
        assert_eq!(
            c.url(&["jobs", "42", "apply"]).unwrap().as_str(),
            "http://api.test/v1/jobs/42/apply"
        );
        let root = client("http://api.test");
        assert_eq!(root.url(&["jobs"]).unwrap().as_str(), "http://api.test/jobs");
    }

    #[test]
    fn ids_stay_one_segment() {
        let c = client("http://api.test/v1");
        assert_eq!(
            c.url(&["jobs", "42#frag"]).unwrap().as_str(),
            "http://api.test/v1/jobs/42%23frag"
        );
        assert_eq!(
            c.url(&["jobs", "../projects/7"]).unwrap().as_str(),
            "http://api.test/v1/jobs/..%2Fprojects%2F7"
        );
        assert_eq!(
            c.url(&["jobs", "a?b=1"]).unwrap().as_str(),
            "http://api.test/v1/jobs/a%3Fb=1"
        );
    }

    #[test]
    fn dot_and_empty_ids_rejected() {
        let c = client("http://api.test/v1");
        for id in ["", ".", ".."] {
            assert!(matches!(c.url(&["jobs", id]), Err(ApiError::InvalidId(_))));
        }
    }

    #[test]
    fn bad_base_url_rejected() {
        let config = ClientConfig {
            api_base_url: "not a url".to_string(),
            ..Default::default()
        };
        let result = ApiClient::new(&config, SessionStore::new(Arc::new(MemoryStore::new())));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn message_extracted_from_json_body() {
        assert_eq!(
            error_message(r#"{"message":"Email already used"}"#).as_deref(),
            Some("Email already used")
        );
        assert_eq!(error_message(r#"{"error":"x"}"#), None);
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn list_body_accepts_both_shapes() {
        let plain: ListBody<u32> = serde_json::from_str("[1,2]").unwrap();
        let wrapped: ListBody<u32> = serde_json::from_str(r#"{"data":[3]}"#).unwrap();
        assert_eq!(plain.into_vec(), vec![1, 2]);
        assert_eq!(wrapped.into_vec(), vec![3]);
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let c = client("http://127.0.0.1:1");
        let err = c.get::<serde_json::Value>(&["jobs"]).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
