use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::FotaApi;
use crate::error::ApiError;

pub const NOT_REACHABLE: &str = "API not reachable. Check the API base URL.";
pub const SUBMIT_FAILED: &str = "Submission failed. Please try again.";

const FALLBACK_CATEGORIES: &[(&str, &str)] = &[
    ("ARMY_BASE", "Army Base"),
    ("NAVY_BASE", "Navy Base"),
    ("AIR_FORCE_BASE", "Air Force Base"),
    ("MARINE_BASE", "Marine Base"),
    ("SPACE_BASE", "Space Base"),
    ("HISTORY_FORT", "Historical Fort"),
    ("HISTORY_BATTLE", "Historical Battlefield"),
    ("HISTORY_MEMORIAL", "Historical Memorial"),
    ("CASTLE_FORT", "Castle"),
    ("POST_INSTALLATION", "On-Post Historic Site"),
    ("MUSEUM", "Museum"),
    ("OTHER", "Other"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCategory {
    pub value: String,
    pub label: String,
}

impl LocationCategory {
    fn from_record(record: &Value) -> Option<Self> {
        let value = record.get("value")?.as_str()?.to_string();
        let label = record
            .get("label")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.clone());
        Some(Self { value, label })
    }
}

pub fn fallback_categories() -> Vec<LocationCategory> {
    FALLBACK_CATEGORIES
        .iter()
        .map(|(value, label)| LocationCategory {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect()
}

/// Categories offered by the backend, or the built-in list when the
/// request fails.
pub async fn load_location_categories(api: &dyn FotaApi) -> Vec<LocationCategory> {
    match api.location_categories().await {
        Ok(records) => records
            .iter()
            .filter_map(LocationCategory::from_record)
            .collect(),
        Err(e) => {
            tracing::warn!("Using built-in location categories: {}", e);
            fallback_categories()
        }
    }
}

/// A new site suggested by a user. Field names are the backend's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationProposal {
    pub proposed_by: String,
    pub site_name: String,
    pub category: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalOutcome {
    pub success: bool,
    pub error: Option<String>,
}

fn required(value: &str, field: &str, max_chars: usize) -> Result<(), ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} is required.", field)));
    }
    if value.chars().count() > max_chars {
        return Err(ApiError::Validation(format!(
            "{} must be at most {} characters.",
            field, max_chars
        )));
    }
    Ok(())
}

pub fn validate_proposal(proposal: &LocationProposal) -> Result<(), ApiError> {
    required(&proposal.proposed_by, "Proposer", 120)?;
    required(&proposal.site_name, "Site name", 160)?;
    required(&proposal.category, "Category", usize::MAX)?;
    required(&proposal.location, "Location", 200)?;
    if !(proposal.latitude.is_finite() && (-90.0..=90.0).contains(&proposal.latitude)) {
        return Err(ApiError::Validation(
            "Latitude must be between -90 and 90.".to_string(),
        ));
    }
    if !(proposal.longitude.is_finite() && (-180.0..=180.0).contains(&proposal.longitude)) {
        return Err(ApiError::Validation(
            "Longitude must be between -180 and 180.".to_string(),
        ));
    }
    Ok(())
}

pub async fn submit_location_proposal(
    api: &dyn FotaApi,
    proposal: &LocationProposal,
) -> ProposalOutcome {
    if let Err(e) = validate_proposal(proposal) {
        return ProposalOutcome {
            success: false,
            error: Some(e.to_string()),
        };
    }

    let body = match serde_json::to_value(proposal) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to encode location proposal: {}", e);
            return ProposalOutcome {
                success: false,
                error: Some(SUBMIT_FAILED.to_string()),
            };
        }
    };

    match api.submit_location_proposal(&body).await {
        Ok(_) => {
            tracing::info!("Location proposal for {} submitted", proposal.site_name.trim());
            ProposalOutcome {
                success: true,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!("Location proposal failed: {}", e);
            let message = if e.status() == Some(404) {
                NOT_REACHABLE
            } else {
                e.server_message().unwrap_or(SUBMIT_FAILED)
            };
            ProposalOutcome {
                success: false,
                error: Some(message.to_string()),
            }
        }
    }
}
