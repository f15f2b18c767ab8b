use chrono::{DateTime, Utc};
use fota_common::{NormalizedActivation, NormalizedContact, NormalizedPost, TimelineItem, merge};
use futures::future::join;
use serde::Serialize;

use super::non_blank;
use crate::backend::{FotaApi, QueryParams};
use crate::join::gather;

pub const MISSING_ID: &str = "No activation id provided.";
pub const PARTIAL_FAILURE: &str = "Some data failed to load.";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationDetailsView {
    pub activation_id: Option<String>,
    pub activation: Option<NormalizedActivation>,
    pub timeline: Vec<TimelineItem>,
    pub error: Option<String>,
}

/// Activation header plus its contacts and posts merged into one timeline.
///
/// The header is best effort. Contacts and posts are fetched concurrently;
/// if either side fails the other side still renders and `error` is set.
pub async fn load_activation_details(
    api: &dyn FotaApi,
    activation_id: Option<&str>,
    now: DateTime<Utc>,
) -> ActivationDetailsView {
    let Some(id) = non_blank(activation_id) else {
        return ActivationDetailsView {
            error: Some(MISSING_ID.to_string()),
            ..Default::default()
        };
    };

    let header_query = QueryParams::new().with("id", id);
    let timeline_query = QueryParams::new().with("activation_id", id);

    let (header, gathered) = join(
        api.list_activations(&header_query),
        gather(
            api.list_contacts(&timeline_query),
            api.list_activation_posts(&timeline_query),
        ),
    )
    .await;

    let activation = match header {
        Ok(records) => records
            .first()
            .map(|record| NormalizedActivation::from_record(record, now)),
        Err(e) => {
            tracing::debug!("Activation {} header unavailable: {}", id, e);
            None
        }
    };

    let error = gathered.any_failed().then(|| PARTIAL_FAILURE.to_string());
    let (contacts, posts) = gathered.split();

    let contacts = contacts
        .inspect_err(|e| tracing::warn!("Failed to load contacts for {}: {}", id, e))
        .unwrap_or_default()
        .iter()
        .map(NormalizedContact::from_record)
        .collect();
    let posts = posts
        .inspect_err(|e| tracing::warn!("Failed to load posts for {}: {}", id, e))
        .unwrap_or_default()
        .iter()
        .map(NormalizedPost::from_record)
        .collect();

    ActivationDetailsView {
        activation_id: Some(id.to_string()),
        activation,
        timeline: merge(contacts, posts),
        error,
    }
}
