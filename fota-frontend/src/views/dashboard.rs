use fota_common::SessionContext;
use serde::Serialize;
use serde_json::Value;

use crate::backend::FotaApi;

pub const DEFAULT_MOTD: &str = "Have a great day on the air!";

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub callsign: Option<String>,
    pub greeting: Option<String>,
    pub motd: String,
}

fn non_blank_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Message of the day. Never fails; falls back to a fixed line.
pub async fn load_motd(api: &dyn FotaApi) -> String {
    match api.motd().await {
        Ok(response) => ["message", "motd", "text"]
            .iter()
            .find_map(|key| non_blank_text(response.get(key)))
            .unwrap_or_else(|| DEFAULT_MOTD.to_string()),
        Err(e) => {
            tracing::debug!("MOTD unavailable: {}", e);
            DEFAULT_MOTD.to_string()
        }
    }
}

/// Greeting for the logged-in operator plus the message of the day. The
/// greeting may carry its own MOTD, which wins over the global one.
pub async fn load_dashboard(api: &dyn FotaApi, session: &SessionContext) -> DashboardView {
    let Some(callsign) = session.current_callsign.clone() else {
        return DashboardView {
            motd: load_motd(api).await,
            ..Default::default()
        };
    };

    match api.dashboard_greeting(&callsign).await {
        Ok(dto) => {
            let callsign = non_blank_text(dto.get("callsign"))
                .map(|own| own.to_uppercase())
                .unwrap_or(callsign);
            let motd = match non_blank_text(dto.get("motd")) {
                Some(motd) => motd,
                None => load_motd(api).await,
            };
            DashboardView {
                callsign: Some(callsign),
                greeting: non_blank_text(dto.get("greeting")),
                motd,
            }
        }
        Err(e) => {
            tracing::warn!("Dashboard greeting for {} failed: {}", callsign, e);
            DashboardView {
                callsign: Some(callsign),
                greeting: None,
                motd: load_motd(api).await,
            }
        }
    }
}
