use chrono::{DateTime, Utc};
use fota_common::temporal::format_iso;
use fota_common::{NormalizedActivation, NormalizedPost, SessionContext, StatusView};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::normalize_activations;
use crate::backend::{FotaApi, QueryParams};
use crate::error::{ApiError, FailureKind};

pub const SUBMIT_FAILED: &str = "Failed to submit spot.";
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Activations a spot can be posted to.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpotHelperView {
    pub callsign: Option<String>,
    pub activations: Vec<NormalizedActivation>,
}

/// Form input of the spot page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotDraft {
    pub activation_id: String,
    pub content: String,
    /// Stamp the post with the submit time instead of leaving it to the
    /// backend.
    #[serde(default = "default_created_at_now")]
    pub created_at_now: bool,
}

fn default_created_at_now() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotOutcome {
    pub success: bool,
    pub message: String,
    pub post: Option<NormalizedPost>,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl SpotOutcome {
    fn failed(error: &ApiError, fallback: &str) -> Self {
        Self {
            success: false,
            message: error.server_message().unwrap_or(fallback).to_string(),
            post: None,
            failure: Some(error.kind()),
        }
    }
}

/// Not-ended activations for the picker. Failures leave the list empty.
pub async fn load_spot_helper(
    api: &dyn FotaApi,
    session: &SessionContext,
    now: DateTime<Utc>,
) -> SpotHelperView {
    let activations = match api.list_activations(&QueryParams::new()).await {
        Ok(records) => normalize_activations(&records, now)
            .into_iter()
            .filter_map(|mut activation| {
                activation.status = StatusView::SpotHelper.admit_activation(&activation, now)?;
                Some(activation)
            })
            .collect(),
        Err(e) => {
            tracing::debug!("Spot helper list unavailable: {}", e);
            Vec::new()
        }
    };

    SpotHelperView {
        callsign: session.current_callsign.clone(),
        activations,
    }
}

pub fn validate_spot(draft: &SpotDraft) -> Result<(), ApiError> {
    if draft.activation_id.trim().is_empty() {
        return Err(ApiError::Validation("Choose an activation.".to_string()));
    }
    let content = draft.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Write something to post.".to_string()));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "Spots are limited to {} characters.",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

/// Request body for a new post. The session's callsign becomes the author.
pub fn spot_payload(draft: &SpotDraft, session: &SessionContext, now: DateTime<Utc>) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "activationId".to_string(),
        Value::from(draft.activation_id.trim()),
    );
    payload.insert("content".to_string(), Value::from(draft.content.trim()));
    if let Some(callsign) = session.current_callsign.as_deref() {
        payload.insert("author".to_string(), Value::from(callsign));
    }
    if draft.created_at_now {
        payload.insert("createdAt".to_string(), Value::from(format_iso(now)));
    }
    Value::Object(payload)
}

pub async fn submit_spot(
    api: &dyn FotaApi,
    draft: &SpotDraft,
    session: &SessionContext,
    now: DateTime<Utc>,
) -> SpotOutcome {
    if let Err(e) = validate_spot(draft) {
        return SpotOutcome::failed(&e, SUBMIT_FAILED);
    }

    let payload = spot_payload(draft, session, now);
    match api.create_activation_post(&payload).await {
        Ok(created) => {
            let post = NormalizedPost::from_record(&created);
            let activation_id = post
                .activation_id
                .clone()
                .unwrap_or_else(|| draft.activation_id.trim().to_string());
            tracing::info!("Spot posted to activation {}", activation_id);
            SpotOutcome {
                success: true,
                message: format!("Posted update to activation #{}", activation_id),
                post: Some(post),
                failure: None,
            }
        }
        Err(e) => {
            tracing::warn!("Spot submission failed: {}", e);
            SpotOutcome::failed(&e, SUBMIT_FAILED)
        }
    }
}
