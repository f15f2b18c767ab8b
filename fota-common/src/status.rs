//! Activation status derivation.
//!
//! Ground truth is the presence and value of `startedAt` / `endedAt`. The
//! raw classification depends on the end time alone; each list view then
//! applies its own admission predicate through [`StatusView`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::temporal::parse_datetime;
use crate::types::NormalizedActivation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    Scheduled,
    OnAir,
    Completed,
}

impl ActivationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationStatus::Scheduled => "scheduled",
            ActivationStatus::OnAir => "on_air",
            ActivationStatus::Completed => "completed",
        }
    }

    /// Human-readable form, underscores shown as spaces.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn icon_path(&self) -> String {
        format!("/status_icons/status_{}.svg", self.as_str())
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(ActivationStatus::Scheduled),
            "on_air" | "on air" | "onair" => Ok(ActivationStatus::OnAir),
            "completed" => Ok(ActivationStatus::Completed),
            _ => Err(format!("Unknown activation status: {}", s)),
        }
    }
}

/// An end time counts only when it is present and not blank.
pub fn is_ended(ended_at: Option<&str>) -> bool {
    ended_at.is_some_and(|value| !value.trim().is_empty())
}

/// Facts about an activation's timestamps relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// `endedAt` present and non-blank.
    pub ended: bool,
    /// `endedAt` present and parseable.
    pub end_valid: bool,
    /// `startedAt` parses and lies after `now`.
    pub starts_in_future: bool,
    /// `startedAt` blank, or parses to a time at or before `now`.
    pub started: bool,
}

impl Classification {
    pub fn new(started_at: Option<&str>, ended_at: Option<&str>, now: DateTime<Utc>) -> Self {
        let start_blank = started_at.is_none_or(|value| value.trim().is_empty());
        let start = started_at.and_then(parse_datetime);

        Self {
            ended: is_ended(ended_at),
            end_valid: ended_at.and_then(parse_datetime).is_some(),
            starts_in_future: start.is_some_and(|start| start > now),
            started: start_blank || start.is_some_and(|start| start <= now),
        }
    }

    /// Raw status: anything without an end time is on the air, including a
    /// record with neither timestamp.
    pub fn raw(&self) -> ActivationStatus {
        if self.ended {
            ActivationStatus::Completed
        } else {
            ActivationStatus::OnAir
        }
    }
}

/// Raw classification of an activation.
pub fn classify(
    started_at: Option<&str>,
    ended_at: Option<&str>,
    now: DateTime<Utc>,
) -> ActivationStatus {
    Classification::new(started_at, ended_at, now).raw()
}

/// Admission predicates of the individual activation lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusView {
    /// Home / activations list: on the air, or starting in the future.
    List,
    /// Past activations: strictly ended with a parseable end time.
    Past,
    /// On-air map: running now, or reported on-air by the backend.
    OnAirMap,
    /// Activation picker on the spot form: not ended.
    SpotHelper,
}

impl StatusView {
    /// Status to display in this view, or `None` when the view hides the
    /// activation.
    pub fn admit(
        self,
        started_at: Option<&str>,
        ended_at: Option<&str>,
        reported_status: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<ActivationStatus> {
        let facts = Classification::new(started_at, ended_at, now);

        match self {
            StatusView::List => {
                if facts.starts_in_future {
                    Some(ActivationStatus::Scheduled)
                } else if !facts.ended {
                    Some(ActivationStatus::OnAir)
                } else {
                    None
                }
            }
            StatusView::Past => {
                (facts.ended && facts.end_valid).then_some(ActivationStatus::Completed)
            }
            StatusView::OnAirMap => {
                let reported_on_air = reported_status.is_some_and(|s| s == "on_air");
                ((!facts.ended && facts.started) || reported_on_air)
                    .then_some(ActivationStatus::OnAir)
            }
            StatusView::SpotHelper => (!facts.ended).then_some(ActivationStatus::OnAir),
        }
    }

    pub fn admit_activation(
        self,
        activation: &NormalizedActivation,
        now: DateTime<Utc>,
    ) -> Option<ActivationStatus> {
        self.admit(
            activation.started_at.as_deref(),
            activation.ended_at.as_deref(),
            activation.reported_status.as_deref(),
            now,
        )
    }
}

/// Icon for a free-form status string. Unknown or absent statuses use the
/// scheduled icon.
pub fn status_icon_path(raw: Option<&str>) -> String {
    let key = raw
        .map(|status| {
            status
                .trim()
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
                .collect::<String>()
        })
        .and_then(|key| key.parse::<ActivationStatus>().ok())
        .unwrap_or(ActivationStatus::Scheduled);

    key.icon_path()
}
