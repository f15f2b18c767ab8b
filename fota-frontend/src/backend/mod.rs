pub mod api;
pub mod client;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{FotaApi, QueryParams};
pub use client::{ApiClient, join_url};
