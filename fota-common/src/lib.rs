//! Shared data layer for the Forts-on-the-Air front end.
//!
//! Everything in this crate is a pure transform over loosely-shaped API
//! records: field normalization, timestamp parsing, status classification,
//! timeline merging and map projection. No I/O happens here.

pub mod fields;
pub mod geo;
pub mod session;
pub mod stats;
pub mod status;
pub mod temporal;
pub mod timeline;
pub mod types;

pub use fields::{CanonicalRecord, FieldSpec, normalize};
pub use geo::{GeoPoint, MapPosition, to_percent};
pub use session::SessionContext;
pub use stats::{ActivationStats, compute_stats, duration_minutes};
pub use status::{ActivationStatus, StatusView, classify, status_icon_path};
pub use temporal::{ParsedTimestamp, parse_timestamp};
pub use timeline::{TimelineItem, merge};
pub use types::{
    ExternalRecord, NormalizedActivation, NormalizedContact, NormalizedPost, NormalizedSite,
};
