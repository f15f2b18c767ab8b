//! Starting and ending activations.

use chrono::{DateTime, Utc};
use fota_common::temporal::{format_iso, parse_datetime};
use fota_common::{NormalizedActivation, SessionContext};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::non_blank;
use crate::backend::FotaApi;
use crate::error::ApiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivation {
    #[serde(default)]
    pub site_id: String,
    /// Falls back to the session's callsign when blank.
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Start time; now when absent.
    #[serde(default)]
    pub started_at: Option<String>,
}

fn activation_payload(
    draft: &NewActivation,
    session: &SessionContext,
    now: DateTime<Utc>,
) -> Result<Value, ApiError> {
    let site_id = non_blank(Some(draft.site_id.as_str()))
        .ok_or_else(|| ApiError::Validation("A site is required.".to_string()))?;
    let callsign = non_blank(draft.callsign.as_deref())
        .map(str::to_uppercase)
        .or_else(|| session.current_callsign.clone())
        .ok_or_else(|| ApiError::Validation("A callsign is required.".to_string()))?;

    let started_at = match non_blank(draft.started_at.as_deref()) {
        Some(raw) => {
            let parsed = parse_datetime(raw).ok_or_else(|| {
                ApiError::Validation(format!("Invalid start time: {}", raw))
            })?;
            format_iso(parsed)
        }
        None => format_iso(now),
    };

    let mut payload = Map::new();
    payload.insert("siteId".to_string(), Value::from(site_id));
    payload.insert("callsign".to_string(), Value::from(callsign));
    payload.insert("startedAt".to_string(), Value::from(started_at));
    for (key, value) in [("title", &draft.title), ("description", &draft.description)] {
        if let Some(value) = non_blank(value.as_deref()) {
            payload.insert(key.to_string(), Value::from(value));
        }
    }
    Ok(Value::Object(payload))
}

pub async fn create_activation(
    api: &dyn FotaApi,
    draft: &NewActivation,
    session: &SessionContext,
    now: DateTime<Utc>,
) -> Result<NormalizedActivation, ApiError> {
    let payload = activation_payload(draft, session, now)?;
    let created = api.create_activation(&payload).await?;
    let activation = NormalizedActivation::from_record(&created, now);
    tracing::info!(
        "Activation {:?} started at site {}",
        activation.id,
        draft.site_id.trim()
    );
    Ok(activation)
}

/// Mark an activation as ended now.
pub async fn end_activation(
    api: &dyn FotaApi,
    activation_id: &str,
    now: DateTime<Utc>,
) -> Result<NormalizedActivation, ApiError> {
    let id = non_blank(Some(activation_id))
        .ok_or_else(|| ApiError::Validation("No activation id provided.".to_string()))?;
    let patch = json!({ "endedAt": format_iso(now) });
    let updated = api.update_activation(id, &patch).await?;
    tracing::info!("Activation {} ended", id);
    Ok(NormalizedActivation::from_record(&updated, now))
}
