//! reqwest-backed implementation of [`FotaApi`].

use async_trait::async_trait;
use fota_common::ExternalRecord;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use std::time::Duration;

use super::api::*;
use crate::config::ApiConfig;
use crate::error::{ApiError, json_type_name};

/// Join an API base and a path with exactly one `/` between them. An empty
/// base leaves the path relative.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim();
    let path = path.trim();
    if base.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// `base/id` with the id as one percent-encoded path segment. Dot segments
/// would be resolved away by URL parsing, so they are refused.
fn id_path(base: &str, id: &str) -> Result<String, ApiError> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(ApiError::InvalidUrl {
            url: format!("{}/{}", base, id),
        });
    }
    Ok(format!("{}/{}", base, urlencoding::encode(id)))
}

/// HTTP client for the FOTA backend. Cloning shares the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: config.base_url.clone(),
                source,
            })?;

        tracing::info!("API client ready for {}", config.base_url);

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &QueryParams) -> Result<Url, ApiError> {
        let raw = join_url(&self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|_| ApiError::InvalidUrl { url: raw.clone() })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path, query)?;
        Ok(self
            .http
            .request(method, url)
            .header("Accept", "application/json"))
    }

    /// Send and decode. Non-2xx answers become [`ApiError::Status`] carrying
    /// the JSON body when there is one; an empty 2xx body decodes to null.
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !status.is_success() {
            tracing::debug!("{} answered HTTP {}", endpoint, status);
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: serde_json::from_slice(&bytes).ok(),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get_value(&self, path: &str, query: &QueryParams) -> Result<Value, ApiError> {
        let request = self.request(Method::GET, path, query)?;
        self.send(request, path).await
    }

    async fn get_list(&self, path: &str, query: &QueryParams) -> Result<Vec<Value>, ApiError> {
        let value = self.get_value(path, query).await?;
        let records = expect_array(path, value)?;
        tracing::debug!("{} returned {} records", path, records.len());
        Ok(records)
    }

    async fn write(&self, method: Method, path: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self.request(method, path, &QueryParams::new())?.json(body);
        self.send(request, path).await
    }

    async fn write_hashed(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self
            .request(Method::POST, path, &QueryParams::new())?
            .header("X-Password-Hashed", "SHA-256")
            .json(body);
        self.send(request, path).await
    }
}

fn expect_array(endpoint: &str, value: Value) -> Result<Vec<Value>, ApiError> {
    match value {
        Value::Array(records) => Ok(records),
        other => Err(ApiError::Shape {
            endpoint: endpoint.to_string(),
            expected: "array",
            found: json_type_name(&other),
        }),
    }
}

fn expect_object(endpoint: &str, value: Value) -> Result<Value, ApiError> {
    match value {
        Value::Object(_) => Ok(value),
        other => Err(ApiError::Shape {
            endpoint: endpoint.to_string(),
            expected: "object",
            found: json_type_name(&other),
        }),
    }
}

#[async_trait]
impl FotaApi for ApiClient {
    async fn list_contacts(&self, query: &QueryParams) -> Result<Vec<ExternalRecord>, ApiError> {
        self.get_list(CONTACTS_PATH, query).await
    }

    async fn list_activations(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<ExternalRecord>, ApiError> {
        self.get_list(ACTIVATIONS_PATH, query).await
    }

    async fn create_activation(&self, payload: &Value) -> Result<ExternalRecord, ApiError> {
        self.write(Method::POST, ACTIVATIONS_PATH, payload).await
    }

    async fn update_activation(
        &self,
        id: &str,
        patch: &Value,
    ) -> Result<ExternalRecord, ApiError> {
        let path = id_path(ACTIVATIONS_PATH, id)?;
        self.write(Method::PATCH, &path, patch).await
    }

    async fn list_activation_posts(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<ExternalRecord>, ApiError> {
        self.get_list(ACTIVATION_POSTS_PATH, query).await
    }

    async fn create_activation_post(&self, payload: &Value) -> Result<ExternalRecord, ApiError> {
        self.write(Method::POST, ACTIVATION_POSTS_PATH, payload).await
    }

    async fn list_sites(&self) -> Result<Vec<ExternalRecord>, ApiError> {
        let path = format!("{}/all", SITES_PATH);
        self.get_list(&path, &QueryParams::new()).await
    }

    async fn get_site(&self, id: &str) -> Result<ExternalRecord, ApiError> {
        let path = id_path(SITES_PATH, id)?;
        let value = self.get_value(&path, &QueryParams::new()).await?;
        expect_object(&path, value)
    }

    async fn login(&self, body: &Value) -> Result<ExternalRecord, ApiError> {
        self.write_hashed(LOGIN_PATH, body).await
    }

    async fn register(&self, body: &Value) -> Result<ExternalRecord, ApiError> {
        self.write_hashed(REGISTER_PATH, body).await
    }

    async fn dashboard_greeting(&self, callsign: &str) -> Result<ExternalRecord, ApiError> {
        let query = QueryParams::new().with("callsign", callsign);
        let value = self.get_value(DASHBOARD_PATH, &query).await?;
        expect_object(DASHBOARD_PATH, value)
    }

    async fn motd(&self) -> Result<ExternalRecord, ApiError> {
        self.get_value(MOTD_PATH, &QueryParams::new()).await
    }

    async fn location_categories(&self) -> Result<Vec<ExternalRecord>, ApiError> {
        self.get_list(LOCATION_CATEGORIES_PATH, &QueryParams::new())
            .await
    }

    async fn submit_location_proposal(&self, body: &Value) -> Result<ExternalRecord, ApiError> {
        self.write(Method::POST, LOCATION_PROPOSALS_PATH, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://api.example.org/", "/api/contacts"), "https://api.example.org/api/contacts");
        assert_eq!(join_url("https://api.example.org", "api/contacts"), "https://api.example.org/api/contacts");
        assert_eq!(join_url("  ", "/api/contacts"), "/api/contacts");
        assert_eq!(join_url("http://h:8080//", "//api/x "), "http://h:8080/api/x");
    }

    #[test]
    fn test_id_path_is_one_segment() {
        assert_eq!(id_path(SITES_PATH, "42").unwrap(), "/api/site/42");
        assert_eq!(
            id_path(SITES_PATH, "../users/dashboard").unwrap(),
            "/api/site/..%2Fusers%2Fdashboard"
        );
        assert_eq!(id_path(ACTIVATIONS_PATH, "7?x=1").unwrap(), "/api/activations/7%3Fx%3D1");
        for id in ["", ".", ".."] {
            let err = id_path(SITES_PATH, id).unwrap_err();
            assert!(matches!(err, ApiError::InvalidUrl { .. }));
        }
    }

    #[test]
    fn test_encoded_id_survives_url_parsing() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:8080".to_string(),
            ..Default::default()
        })
        .unwrap();
        let path = id_path(ACTIVATIONS_PATH, "../site/all").unwrap();
        let url = client.url(&path, &QueryParams::new()).unwrap();
        assert_eq!(url.path(), "/api/activations/..%2Fsite%2Fall");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_url_with_query() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        })
        .unwrap();
        let url = client
            .url(CONTACTS_PATH, &QueryParams::new().with("activation_id", "4 2"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/contacts?activation_id=4+2");
    }

    #[test]
    fn test_relative_base_is_invalid_url() {
        let client = ApiClient::new(&ApiConfig {
            base_url: String::new(),
            ..Default::default()
        })
        .unwrap();
        let err = client.url(CONTACTS_PATH, &QueryParams::new()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn test_shape_checks() {
        assert_eq!(expect_array("/x", json!([1])).unwrap().len(), 1);
        let err = expect_array("/x", json!({ "items": [] })).unwrap_err();
        assert!(matches!(err, ApiError::Shape { found: "object", .. }));
        assert!(expect_object("/x", json!(null)).is_err());
    }
}
