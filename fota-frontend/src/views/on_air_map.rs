use chrono::{DateTime, Utc};
use fota_common::{MapPosition, NormalizedActivation, NormalizedSite, StatusView};
use futures::future::join_all;
use serde::Serialize;

use super::normalize_activations;
use crate::backend::{FotaApi, QueryParams};

pub const LOAD_FAILED: &str = "Failed to load activations.";

#[derive(Debug, Clone, Serialize)]
pub struct OnAirMarker {
    pub title: String,
    pub activation: NormalizedActivation,
    pub site: NormalizedSite,
    pub position: MapPosition,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OnAirMapView {
    pub markers: Vec<OnAirMarker>,
    pub error: Option<String>,
}

fn marker_title(site: &NormalizedSite) -> String {
    site.location
        .clone()
        .or_else(|| site.qth.clone())
        .unwrap_or_else(|| format!("Site #{}", site.id.as_deref().unwrap_or("?")))
}

/// Site of an activation: the embedded object, else a lookup by site id.
/// A failed lookup drops the activation from the map.
async fn resolve_site(
    api: &dyn FotaApi,
    activation: &NormalizedActivation,
) -> Option<NormalizedSite> {
    if let Some(site) = &activation.site {
        return Some(site.clone());
    }
    let site_id = activation
        .site_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())?;
    match api.get_site(site_id).await {
        Ok(record) => Some(NormalizedSite::from_record(&record)),
        Err(e) => {
            tracing::warn!("Site {} lookup failed: {}", site_id, e);
            None
        }
    }
}

/// Activations on the air right now, placed on the map by their site.
pub async fn load_on_air_map(api: &dyn FotaApi, now: DateTime<Utc>) -> OnAirMapView {
    let records = match api.list_activations(&QueryParams::new()).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load activations for the map: {}", e);
            return OnAirMapView {
                markers: Vec::new(),
                error: Some(LOAD_FAILED.to_string()),
            };
        }
    };

    let on_air: Vec<NormalizedActivation> = normalize_activations(&records, now)
        .into_iter()
        .filter_map(|mut activation| {
            activation.status = StatusView::OnAirMap.admit_activation(&activation, now)?;
            Some(activation)
        })
        .collect();

    let sites = join_all(on_air.iter().map(|activation| resolve_site(api, activation))).await;

    let markers: Vec<OnAirMarker> = on_air
        .into_iter()
        .zip(sites)
        .filter_map(|(activation, site)| {
            let site = site?;
            let position = site.geo_point()?.to_percent();
            Some(OnAirMarker {
                title: marker_title(&site),
                activation,
                site,
                position,
            })
        })
        .collect();

    tracing::debug!("{} on-air markers", markers.len());
    OnAirMapView {
        markers,
        error: None,
    }
}
