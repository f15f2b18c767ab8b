//! The backend endpoints this front end consumes.
//!
//! Views depend on [`FotaApi`] rather than on the HTTP client so they can be
//! driven by any implementation. Records come back raw; normalizing them is
//! the caller's job.

use async_trait::async_trait;
use fota_common::ExternalRecord;
use serde_json::Value;

use crate::error::ApiError;

pub const CONTACTS_PATH: &str = "/api/contacts";
pub const ACTIVATIONS_PATH: &str = "/api/activations";
pub const ACTIVATION_POSTS_PATH: &str = "/api/activation_post";
pub const SITES_PATH: &str = "/api/site";
pub const LOGIN_PATH: &str = "/api/users/login";
pub const REGISTER_PATH: &str = "/api/users/register";
pub const DASHBOARD_PATH: &str = "/api/users/dashboard";
pub const MOTD_PATH: &str = "/api/meta/motd";
pub const LOCATION_CATEGORIES_PATH: &str = "/api/meta/location-categories";
pub const LOCATION_PROPOSALS_PATH: &str = "/api/locations/proposals";

/// Ordered query parameters. Later values for the same key are kept; the
/// backend decides which it honours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[async_trait]
pub trait FotaApi: Send + Sync {
    /// `GET /api/contacts`
    async fn list_contacts(&self, query: &QueryParams) -> Result<Vec<ExternalRecord>, ApiError>;

    /// `GET /api/activations`
    async fn list_activations(&self, query: &QueryParams)
    -> Result<Vec<ExternalRecord>, ApiError>;

    /// `POST /api/activations`
    async fn create_activation(&self, payload: &Value) -> Result<ExternalRecord, ApiError>;

    /// `PATCH /api/activations/{id}`
    async fn update_activation(&self, id: &str, patch: &Value)
    -> Result<ExternalRecord, ApiError>;

    /// `GET /api/activation_post`
    async fn list_activation_posts(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<ExternalRecord>, ApiError>;

    /// `POST /api/activation_post`
    async fn create_activation_post(&self, payload: &Value) -> Result<ExternalRecord, ApiError>;

    /// `GET /api/site/all`
    async fn list_sites(&self) -> Result<Vec<ExternalRecord>, ApiError>;

    /// `GET /api/site/{id}`
    async fn get_site(&self, id: &str) -> Result<ExternalRecord, ApiError>;

    /// `POST /api/users/login` with a pre-hashed password.
    async fn login(&self, body: &Value) -> Result<ExternalRecord, ApiError>;

    /// `POST /api/users/register` with a pre-hashed password.
    async fn register(&self, body: &Value) -> Result<ExternalRecord, ApiError>;

    /// `GET /api/users/dashboard?callsign=`
    async fn dashboard_greeting(&self, callsign: &str) -> Result<ExternalRecord, ApiError>;

    /// `GET /api/meta/motd`
    async fn motd(&self) -> Result<ExternalRecord, ApiError>;

    /// `GET /api/meta/location-categories`
    async fn location_categories(&self) -> Result<Vec<ExternalRecord>, ApiError>;

    /// `POST /api/locations/proposals`
    async fn submit_location_proposal(&self, body: &Value) -> Result<ExternalRecord, ApiError>;

    /// Newest post of one activation, if any.
    async fn latest_post(&self, activation_id: &str) -> Result<Option<ExternalRecord>, ApiError> {
        let query = QueryParams::new()
            .with("activationId", activation_id)
            .with("limit", 1)
            .with("sort", "desc");
        let posts = self.list_activation_posts(&query).await?;
        Ok(posts.into_iter().next())
    }
}
