use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{
    ACTIVATION_FIELDS, CONTACT_FIELDS, POST_FIELDS, SITE_FIELDS, lookup, normalize,
};
use crate::geo::GeoPoint;
use crate::status::{ActivationStatus, classify};

/// A record as returned by the API. No shape is guaranteed.
pub type ExternalRecord = Value;

/// One logged QSO.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContact {
    pub id: Option<String>,
    pub activation_id: Option<String>,
    /// ISO-8601 string as sent by the backend. May still be unparseable.
    pub time: Option<String>,
    pub callsign: Option<String>,
    pub band: Option<String>,
    pub mode: Option<String>,
    pub rst_sent: Option<String>,
    pub rst_rcvd: Option<String>,
    pub notes: Option<String>,
}

impl NormalizedContact {
    pub fn from_record(record: &ExternalRecord) -> Self {
        let fields = normalize(record, &CONTACT_FIELDS);
        Self {
            id: fields.text("id"),
            activation_id: fields.text("activationId"),
            time: fields.text("time"),
            callsign: fields.text("callsign"),
            band: fields.text("band"),
            mode: fields.text("mode"),
            rst_sent: fields.text("rstSent"),
            rst_rcvd: fields.text("rstRcvd"),
            notes: fields.text("notes"),
        }
    }
}

/// A status update ("spot") posted during an activation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPost {
    pub id: Option<String>,
    pub activation_id: Option<String>,
    pub content: Option<String>,
    pub created_at: Option<String>,
    pub author: Option<String>,
}

impl NormalizedPost {
    pub fn from_record(record: &ExternalRecord) -> Self {
        let fields = normalize(record, &POST_FIELDS);
        Self {
            id: fields.text("id"),
            activation_id: fields.text("activationId"),
            content: fields.text("content"),
            created_at: fields.text("createdAt"),
            author: fields.text("author"),
        }
    }
}

/// A fort, base or historic site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSite {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub qth: Option<String>,
    pub active: Option<bool>,
    pub created_by: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NormalizedSite {
    pub fn from_record(record: &ExternalRecord) -> Self {
        let fields = normalize(record, &SITE_FIELDS);
        Self {
            id: fields.text("id"),
            name: fields.text("name"),
            category: fields.text("category"),
            location: fields.text("location"),
            qth: fields.text("qth"),
            active: fields.flag("active"),
            created_by: fields.text("createdBy"),
            latitude: fields.number("latitude"),
            longitude: fields.number("longitude"),
        }
    }

    /// Both coordinates, when the site carries them.
    pub fn geo_point(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// A radio operating session at a site.
///
/// `status` is derived from the two timestamps at normalization time; the
/// value the backend reported is kept separately in `reported_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedActivation {
    pub id: Option<String>,
    pub site_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: ActivationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_status: Option<String>,
    pub callsign: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    /// Site object embedded in the activation payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<NormalizedSite>,
}

impl NormalizedActivation {
    pub fn from_record(record: &ExternalRecord, now: DateTime<Utc>) -> Self {
        let fields = normalize(record, &ACTIVATION_FIELDS);
        let started_at = fields.text("startedAt");
        let ended_at = fields.text("endedAt");
        let status = classify(started_at.as_deref(), ended_at.as_deref(), now);
        let site = lookup(record, "site")
            .filter(|site| site.is_object())
            .map(NormalizedSite::from_record);

        Self {
            id: fields.text("id"),
            site_id: fields.text("siteId"),
            title: fields.text("title"),
            description: fields.text("description"),
            status,
            reported_status: fields.text("status"),
            callsign: fields.text("callsign"),
            started_at,
            ended_at,
            site,
        }
    }
}
