use fota_common::{MapPosition, NormalizedSite};
use serde::Serialize;

use crate::backend::FotaApi;

pub const LOAD_FAILED: &str = "Failed to load sites.";

#[derive(Debug, Clone, Serialize)]
pub struct SiteMarker {
    pub site: NormalizedSite,
    pub position: MapPosition,
    /// CSS `left` / `top` offsets for the map image.
    pub left: String,
    pub top: String,
}

impl SiteMarker {
    fn new(site: NormalizedSite) -> Option<Self> {
        let position = site.geo_point()?.to_percent();
        let (left, top) = position.css();
        Some(Self {
            site,
            position,
            left,
            top,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteMapView {
    pub sites: Vec<SiteMarker>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteBrowserView {
    pub sites: Vec<NormalizedSite>,
    pub error: Option<String>,
}

async fn fetch_sites(api: &dyn FotaApi) -> Result<Vec<NormalizedSite>, String> {
    match api.list_sites().await {
        Ok(records) => Ok(records.iter().map(NormalizedSite::from_record).collect()),
        Err(e) => {
            tracing::error!("Failed to load sites: {}", e);
            Err(LOAD_FAILED.to_string())
        }
    }
}

/// Every site with both coordinates, projected onto the world map.
pub async fn load_site_map(api: &dyn FotaApi) -> SiteMapView {
    match fetch_sites(api).await {
        Ok(sites) => SiteMapView {
            sites: sites.into_iter().filter_map(SiteMarker::new).collect(),
            error: None,
        },
        Err(error) => SiteMapView {
            sites: Vec::new(),
            error: Some(error),
        },
    }
}

/// Sites flagged active; a missing flag counts as inactive.
pub async fn load_site_browser(api: &dyn FotaApi) -> SiteBrowserView {
    match fetch_sites(api).await {
        Ok(sites) => SiteBrowserView {
            sites: sites
                .into_iter()
                .filter(|site| site.active == Some(true))
                .collect(),
            error: None,
        },
        Err(error) => SiteBrowserView {
            sites: Vec::new(),
            error: Some(error),
        },
    }
}
