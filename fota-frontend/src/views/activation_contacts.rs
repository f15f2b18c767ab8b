use fota_common::NormalizedContact;
use fota_common::temporal::sort_newest_first;
use serde::Serialize;

use super::activation_details::MISSING_ID;
use super::non_blank;
use crate::backend::{FotaApi, QueryParams};

pub const LOAD_FAILED: &str = "Failed to load contacts for this activation.";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationContactsView {
    pub activation_id: Option<String>,
    pub contacts: Vec<NormalizedContact>,
    pub error: Option<String>,
}

/// Contact log of one activation, newest first. Unlike the timeline, rows
/// with an unusable time are kept and sort as the oldest.
pub async fn load_activation_contacts(
    api: &dyn FotaApi,
    activation_id: Option<&str>,
) -> ActivationContactsView {
    let Some(id) = non_blank(activation_id) else {
        return ActivationContactsView {
            error: Some(MISSING_ID.to_string()),
            ..Default::default()
        };
    };

    let query = QueryParams::new().with("activation_id", id);
    match api.list_contacts(&query).await {
        Ok(records) => {
            let mut contacts: Vec<NormalizedContact> =
                records.iter().map(NormalizedContact::from_record).collect();
            sort_newest_first(&mut contacts, |contact| contact.time.as_deref());
            ActivationContactsView {
                activation_id: Some(id.to_string()),
                contacts,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("Failed to load contacts for activation {}: {}", id, e);
            ActivationContactsView {
                activation_id: Some(id.to_string()),
                contacts: Vec::new(),
                error: Some(LOAD_FAILED.to_string()),
            }
        }
    }
}
