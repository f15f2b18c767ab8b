use chrono::{DateTime, Utc};
use fota_common::temporal::sort_newest_first;
use fota_common::{ActivationStats, NormalizedActivation, SessionContext, StatusView, compute_stats};
use serde::Serialize;

use super::normalize_activations;
use crate::backend::{FotaApi, QueryParams};

pub const LOAD_FAILED: &str = "Failed to load past activations.";

/// Parameter names the backend may use to filter by operator.
const CALLSIGN_PARAMS: &[&str] = &[
    "callsign",
    "operator_callsign",
    "author_callsign",
    "user_callsign",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct PastActivationsView {
    pub callsign: Option<String>,
    pub activations: Vec<NormalizedActivation>,
    pub stats: ActivationStats,
    pub error: Option<String>,
}

pub fn past_query(session: &SessionContext) -> QueryParams {
    let query = QueryParams::new().with("status", "completed");
    match session.current_callsign.as_deref() {
        Some(callsign) => CALLSIGN_PARAMS
            .iter()
            .fold(query, |query, key| query.with(key, callsign)),
        None => query,
    }
}

/// Completed activations, newest end first, restricted to the session's
/// callsign when there is one.
pub async fn load_past_activations(
    api: &dyn FotaApi,
    session: &SessionContext,
    now: DateTime<Utc>,
) -> PastActivationsView {
    let callsign = session.current_callsign.clone();

    let records = match api.list_activations(&past_query(session)).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load past activations: {}", e);
            return PastActivationsView {
                callsign,
                error: Some(LOAD_FAILED.to_string()),
                ..Default::default()
            };
        }
    };

    let mut activations: Vec<NormalizedActivation> = normalize_activations(&records, now)
        .into_iter()
        .filter(|activation| StatusView::Past.admit_activation(activation, now).is_some())
        // The backend may ignore the callsign filter.
        .filter(|activation| match callsign.as_deref() {
            Some(wanted) => activation
                .callsign
                .as_deref()
                .is_some_and(|own| own.to_uppercase() == wanted),
            None => true,
        })
        .collect();

    sort_newest_first(&mut activations, |activation| activation.ended_at.as_deref());
    let stats = compute_stats(&activations);

    PastActivationsView {
        callsign,
        activations,
        stats,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{Failure, FakeApi};
    use crate::views::test_support::now;
    use serde_json::json;

    fn api() -> FakeApi {
        let mut api = FakeApi::new();
        api.activations = vec![
            json!({ "id": 1, "callsign": "w1aw", "startedAt": "2024-05-01T10:00:00Z", "endedAt": "2024-05-01T12:00:00Z" }),
            json!({ "id": 2, "operator_callsign": "W1AW", "start_time": "2024-05-03T10:00:00Z", "end_time": "2024-05-03T10:30:00Z" }),
            json!({ "id": 3, "callsign": "K1ABC", "startedAt": "2024-05-02T10:00:00Z", "endedAt": "2024-05-02T11:00:00Z" }),
            json!({ "id": 4, "callsign": "W1AW", "startedAt": "2024-05-04T10:00:00Z", "endedAt": "later" }),
            json!({ "id": 5, "callsign": "W1AW", "startedAt": "2024-06-01T10:00:00Z" }),
        ];
        api
    }

    fn ids(view: &PastActivationsView) -> Vec<&str> {
        view.activations
            .iter()
            .map(|a| a.id.as_deref().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_session_filters_and_sorts() {
        let api = api();
        let session = SessionContext::for_callsign("w1aw");
        let view = load_past_activations(&api, &session, now()).await;

        assert_eq!(view.callsign.as_deref(), Some("W1AW"));
        assert_eq!(ids(&view), vec!["2", "1"]);
        assert_eq!(view.stats.total_count, 2);
        assert_eq!(view.stats.longest_minutes, 120.0);
        assert_eq!(view.stats.avg_minutes, 75.0);

        let query = &api.calls_to("list_activations")[0].query;
        assert_eq!(query.get("status"), Some("completed"));
        assert_eq!(query.get("operator_callsign"), Some("W1AW"));
        assert_eq!(query.get("user_callsign"), Some("W1AW"));
    }

    #[tokio::test]
    async fn test_anonymous_sees_all_completed() {
        let api = api();
        let view = load_past_activations(&api, &SessionContext::anonymous(), now()).await;
        assert_eq!(ids(&view), vec!["2", "3", "1"]);
        assert_eq!(
            api.calls_to("list_activations")[0].query.iter().count(),
            1
        );
    }

    #[tokio::test]
    async fn test_failure() {
        let api = api().failing("list_activations", Failure::Status(503, None));
        let view = load_past_activations(&api, &SessionContext::anonymous(), now()).await;
        assert_eq!(view.error.as_deref(), Some(LOAD_FAILED));
        assert_eq!(view.stats, ActivationStats::default());
    }
}
