//! In-memory [`FotaApi`] for view tests.

use async_trait::async_trait;
use fota_common::{ExternalRecord, NormalizedContact, NormalizedPost};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

use super::api::{FotaApi, QueryParams};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Status(u16, Option<Value>),
    Shape,
}

impl Failure {
    fn into_error(self, endpoint: &str) -> ApiError {
        match self {
            Failure::Status(status, body) => ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            },
            Failure::Shape => ApiError::Shape {
                endpoint: endpoint.to_string(),
                expected: "array",
                found: "object",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub endpoint: &'static str,
    pub query: QueryParams,
    pub body: Option<Value>,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    pub contacts: Vec<Value>,
    pub activations: Vec<Value>,
    pub posts: Vec<Value>,
    pub sites: Vec<Value>,
    pub categories: Vec<Value>,
    pub greeting: Value,
    pub motd: Value,
    failures: HashMap<&'static str, Failure>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make one endpoint (named after its trait method) fail.
    pub fn failing(mut self, endpoint: &'static str, failure: Failure) -> Self {
        self.failures.insert(endpoint, failure);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.endpoint == endpoint)
            .collect()
    }

    fn record(
        &self,
        endpoint: &'static str,
        query: QueryParams,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(Call {
            endpoint,
            query,
            body,
        });
        match self.failures.get(endpoint) {
            Some(failure) => Err(failure.clone().into_error(endpoint)),
            None => Ok(()),
        }
    }
}

fn id_of(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        other => Some(other.to_string()),
    }
}

fn activation_param(query: &QueryParams) -> Option<&str> {
    query
        .get("activation_id")
        .or_else(|| query.get("activationId"))
}

#[async_trait]
impl FotaApi for FakeApi {
    async fn list_contacts(&self, query: &QueryParams) -> Result<Vec<ExternalRecord>, ApiError> {
        self.record("list_contacts", query.clone(), None)?;
        let wanted = activation_param(query);
        Ok(self
            .contacts
            .iter()
            .filter(|record| {
                wanted.is_none()
                    || NormalizedContact::from_record(record).activation_id.as_deref() == wanted
            })
            .cloned()
            .collect())
    }

    async fn list_activations(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<ExternalRecord>, ApiError> {
        self.record("list_activations", query.clone(), None)?;
        let wanted = query.get("id");
        Ok(self
            .activations
            .iter()
            .filter(|record| wanted.is_none_or(|id| id_of(record).as_deref() == Some(id)))
            .cloned()
            .collect())
    }

    async fn create_activation(&self, payload: &Value) -> Result<ExternalRecord, ApiError> {
        self.record("create_activation", QueryParams::new(), Some(payload.clone()))?;
        let mut created = payload.clone();
        if let Some(object) = created.as_object_mut() {
            object.insert("id".to_string(), json!(100));
        }
        Ok(created)
    }

    async fn update_activation(
        &self,
        id: &str,
        patch: &Value,
    ) -> Result<ExternalRecord, ApiError> {
        self.record(
            "update_activation",
            QueryParams::new().with("id", id),
            Some(patch.clone()),
        )?;
        let mut updated = patch.clone();
        if let Some(object) = updated.as_object_mut() {
            object.insert("id".to_string(), json!(id));
        }
        Ok(updated)
    }

    async fn list_activation_posts(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<ExternalRecord>, ApiError> {
        self.record("list_activation_posts", query.clone(), None)?;
        let wanted = activation_param(query);
        let limit = query
            .get("limit")
            .and_then(|limit| limit.parse().ok())
            .unwrap_or(usize::MAX);
        Ok(self
            .posts
            .iter()
            .filter(|record| {
                wanted.is_none()
                    || NormalizedPost::from_record(record).activation_id.as_deref() == wanted
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create_activation_post(&self, payload: &Value) -> Result<ExternalRecord, ApiError> {
        self.record("create_activation_post", QueryParams::new(), Some(payload.clone()))?;
        Ok(payload.clone())
    }

    async fn list_sites(&self) -> Result<Vec<ExternalRecord>, ApiError> {
        self.record("list_sites", QueryParams::new(), None)?;
        Ok(self.sites.clone())
    }

    async fn get_site(&self, id: &str) -> Result<ExternalRecord, ApiError> {
        self.record("get_site", QueryParams::new().with("id", id), None)?;
        self.sites
            .iter()
            .find(|site| id_of(site).as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| Failure::Status(404, None).into_error("get_site"))
    }

    async fn login(&self, body: &Value) -> Result<ExternalRecord, ApiError> {
        self.record("login", QueryParams::new(), Some(body.clone()))?;
        Ok(json!({ "message": "Logged in" }))
    }

    async fn register(&self, body: &Value) -> Result<ExternalRecord, ApiError> {
        self.record("register", QueryParams::new(), Some(body.clone()))?;
        Ok(json!({ "success": true }))
    }

    async fn dashboard_greeting(&self, callsign: &str) -> Result<ExternalRecord, ApiError> {
        self.record(
            "dashboard_greeting",
            QueryParams::new().with("callsign", callsign),
            None,
        )?;
        Ok(self.greeting.clone())
    }

    async fn motd(&self) -> Result<ExternalRecord, ApiError> {
        self.record("motd", QueryParams::new(), None)?;
        Ok(self.motd.clone())
    }

    async fn location_categories(&self) -> Result<Vec<ExternalRecord>, ApiError> {
        self.record("location_categories", QueryParams::new(), None)?;
        Ok(self.categories.clone())
    }

    async fn submit_location_proposal(&self, body: &Value) -> Result<ExternalRecord, ApiError> {
        self.record("submit_location_proposal", QueryParams::new(), Some(body.clone()))?;
        Ok(json!({ "id": 1 }))
    }
}
