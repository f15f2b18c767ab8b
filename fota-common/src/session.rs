//! Who is logged in, derived once per navigation and passed explicitly.

use serde::{Deserialize, Serialize};

const CALLSIGN_COOKIE: &str = "callsign";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub current_callsign: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for a known callsign. Blank input yields an anonymous session.
    pub fn for_callsign(callsign: &str) -> Self {
        let callsign = callsign.trim();
        Self {
            current_callsign: (!callsign.is_empty()).then(|| callsign.to_uppercase()),
        }
    }

    /// Read the `callsign` cookie from a `Cookie` request header. The cookie
    /// name is matched case-insensitively and the value is percent-decoded.
    pub fn from_cookie_header(header: &str) -> Self {
        header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(CALLSIGN_COOKIE))
            .map(|(_, value)| {
                let value = value.trim();
                let decoded = urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string());
                Self::for_callsign(&decoded)
            })
            .unwrap_or_default()
    }

    /// `Set-Cookie` value persisting this session for seven days.
    pub fn to_set_cookie(&self) -> Option<String> {
        let callsign = self.current_callsign.as_deref()?;
        Some(format!(
            "{}={}; Path=/; SameSite=Lax; Max-Age={}",
            CALLSIGN_COOKIE,
            urlencoding::encode(callsign),
            7 * 24 * 60 * 60
        ))
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_callsign.is_some()
    }
}
