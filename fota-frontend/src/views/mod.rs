//! One loader per page of the site.
//!
//! Loaders take the endpoint trait, the caller's session and the current
//! time explicitly. Fetch and shape failures never escape: they end up in
//! the view's `error` field as a fixed message while whatever did load is
//! still returned.

pub mod activation_contacts;
pub mod activation_details;
pub mod activations_list;
pub mod dashboard;
pub mod location_proposal;
pub mod manage;
pub mod on_air_map;
pub mod past_activations;
pub mod sites;
pub mod spot;

pub use activation_contacts::{ActivationContactsView, load_activation_contacts};
pub use activation_details::{ActivationDetailsView, load_activation_details};
pub use activations_list::{ActivationCard, ActivationsListView, load_activations_list};
pub use dashboard::{DashboardView, load_dashboard};
pub use location_proposal::{
    LocationCategory, LocationProposal, ProposalOutcome, load_location_categories,
    submit_location_proposal,
};
pub use manage::{NewActivation, create_activation, end_activation};
pub use on_air_map::{OnAirMapView, OnAirMarker, load_on_air_map};
pub use past_activations::{PastActivationsView, load_past_activations};
pub use sites::{SiteBrowserView, SiteMapView, SiteMarker, load_site_browser, load_site_map};
pub use spot::{SpotDraft, SpotHelperView, SpotOutcome, load_spot_helper, submit_spot};

use chrono::{DateTime, Utc};
use fota_common::{ExternalRecord, NormalizedActivation};

pub(crate) fn normalize_activations(
    records: &[ExternalRecord],
    now: DateTime<Utc>,
) -> Vec<NormalizedActivation> {
    records
        .iter()
        .map(|record| NormalizedActivation::from_record(record, now))
        .collect()
}

/// Trimmed id, or `None` when blank.
pub(crate) fn non_blank(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};
    use fota_common::temporal::parse_datetime;

    pub const NOW: &str = "2024-06-01T12:00:00Z";

    pub fn now() -> DateTime<Utc> {
        parse_datetime(NOW).unwrap()
    }
}
