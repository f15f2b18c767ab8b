use chrono::{DateTime, Utc};
use fota_common::{NormalizedActivation, NormalizedPost, StatusView};
use serde::Serialize;

use super::normalize_activations;
use crate::backend::{FotaApi, QueryParams};
use crate::join::gather_all;

pub const LOAD_FAILED: &str = "Failed to load activations.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationCard {
    /// Status is the one shown by the list, `scheduled` for future starts.
    pub activation: NormalizedActivation,
    pub status_icon: String,
    pub latest_post: Option<NormalizedPost>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivationsListView {
    pub items: Vec<ActivationCard>,
    pub error: Option<String>,
}

/// Running and upcoming activations, each with its newest post.
pub async fn load_activations_list(api: &dyn FotaApi, now: DateTime<Utc>) -> ActivationsListView {
    let records = match api.list_activations(&QueryParams::new()).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load activations: {}", e);
            return ActivationsListView {
                items: Vec::new(),
                error: Some(LOAD_FAILED.to_string()),
            };
        }
    };

    let admitted: Vec<NormalizedActivation> = normalize_activations(&records, now)
        .into_iter()
        .filter_map(|mut activation| {
            activation.status = StatusView::List.admit_activation(&activation, now)?;
            Some(activation)
        })
        .collect();

    let latest = gather_all(admitted.iter().map(|activation| async move {
        match activation.id.as_deref() {
            Some(id) => api.latest_post(id).await,
            None => Ok(None),
        }
    }))
    .await;

    let items = admitted
        .into_iter()
        .zip(latest)
        .map(|(activation, latest)| {
            let latest_post = latest
                .inspect_err(|e| {
                    tracing::debug!("No latest post for {:?}: {}", activation.id, e)
                })
                .ok()
                .flatten()
                .map(|record| NormalizedPost::from_record(&record));
            ActivationCard {
                status_icon: activation.status.icon_path(),
                activation,
                latest_post,
            }
        })
        .collect();

    ActivationsListView { items, error: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{Failure, FakeApi};
    use crate::views::test_support::now;
    use fota_common::ActivationStatus;
    use serde_json::json;

    fn api() -> FakeApi {
        let mut api = FakeApi::new();
        api.activations = vec![
            json!({ "id": 1, "startedAt": "2024-06-01T08:00:00Z" }),
            json!({ "id": 2, "startedAt": "2024-06-01T08:00:00Z", "endedAt": "2024-06-01T10:00:00Z" }),
            json!({ "id": 3, "startedAt": "2024-06-03T08:00:00Z" }),
            json!({ "title": "no id" }),
        ];
        api.posts = vec![
            json!({ "id": 20, "activation_id": 1, "content": "QRV 40m CW", "createdAt": "2024-06-01T11:00:00Z" }),
            json!({ "id": 21, "activation_id": 1, "content": "older", "createdAt": "2024-06-01T09:00:00Z" }),
        ];
        api
    }

    #[tokio::test]
    async fn test_list_filters_and_enriches() {
        let api = api();
        let view = load_activations_list(&api, now()).await;
        assert!(view.error.is_none());

        let summary: Vec<_> = view
            .items
            .iter()
            .map(|card| (card.activation.id.clone(), card.activation.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("1".to_string()), ActivationStatus::OnAir),
                (Some("3".to_string()), ActivationStatus::Scheduled),
                (None, ActivationStatus::OnAir),
            ]
        );

        let latest = view.items[0].latest_post.as_ref().unwrap();
        assert_eq!(latest.content.as_deref(), Some("QRV 40m CW"));
        assert!(view.items[1].latest_post.is_none());
        assert_eq!(view.items[1].status_icon, "/status_icons/status_scheduled.svg");

        let lookups = api.calls_to("list_activation_posts");
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups[0].query.get("limit"), Some("1"));
        assert_eq!(lookups[0].query.get("sort"), Some("desc"));
    }

    #[tokio::test]
    async fn test_enrichment_failure_is_silent() {
        let api = api().failing("list_activation_posts", Failure::Status(500, None));
        let view = load_activations_list(&api, now()).await;
        assert!(view.error.is_none());
        assert_eq!(view.items.len(), 3);
        assert!(view.items.iter().all(|card| card.latest_post.is_none()));
    }

    #[tokio::test]
    async fn test_activations_failure() {
        let api = api().failing("list_activations", Failure::Shape);
        let view = load_activations_list(&api, now()).await;
        assert_eq!(view.error.as_deref(), Some(LOAD_FAILED));
        assert!(view.items.is_empty());
    }
}
