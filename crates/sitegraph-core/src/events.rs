//! Scheduled events and the consumed weather-feed shape.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::trades::ActivityType;

/// One planned occurrence of an activity on the project timeline.
///
/// Events are immutable inputs to the detector; the resolver produces new
/// proposed start/end values rather than mutating them. Timestamps are not
/// sanity-checked: an inverted range is processed as-is by the rule
/// predicates (callers own well-formedness; see [`ScheduledEvent::validated`]
/// for an opt-in check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: String,
    pub event_type: ActivityType,
    pub start_time: DateTime<Utc>,
    /// Defaults to `start_time` for point-in-time work such as an inspection
    pub end_time: DateTime<Utc>,
    /// Assigned crew/resource identifier, if any
    #[serde(default)]
    pub team_member_id: Option<String>,
    /// Observed or forecast condition attached to this event
    #[serde(default)]
    pub weather_condition: Option<WeatherCondition>,
    #[serde(default)]
    pub inspection_completed: bool,
}

impl ScheduledEvent {
    /// Create an event spanning `[start, end)`.
    pub fn new(
        id: impl Into<String>,
        event_type: ActivityType,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            event_type,
            start_time,
            end_time,
            team_member_id: None,
            weather_condition: None,
            inspection_completed: false,
        }
    }

    /// Create a point-in-time event (`end == start`), e.g. an inspection.
    pub fn at(id: impl Into<String>, event_type: ActivityType, time: DateTime<Utc>) -> Self {
        Self::new(id, event_type, time, time)
    }

    /// Like [`new`](Self::new), but rejects an end before the start.
    pub fn validated(
        id: impl Into<String>,
        event_type: ActivityType,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if end_time < start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self::new(id, event_type, start_time, end_time))
    }

    pub fn with_team_member(mut self, id: impl Into<String>) -> Self {
        self.team_member_id = Some(id.into());
        self
    }

    pub fn with_weather(mut self, condition: WeatherCondition) -> Self {
        self.weather_condition = Some(condition);
        self
    }

    pub fn with_inspection_completed(mut self, completed: bool) -> Self {
        self.inspection_completed = completed;
        self
    }

    /// Half-open interval overlap test: `start1 < end2 && end1 > start2`.
    pub fn overlaps(&self, other: &ScheduledEvent) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }

    /// Does `time` fall inside this event's `[start, end)` interval?
    /// A point event only contains its own instant.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        if self.is_point() {
            time == self.start_time
        } else {
            time >= self.start_time && time < self.end_time
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn is_point(&self) -> bool {
        self.start_time == self.end_time
    }
}

/// Weather condition attached to an event or feed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    HighWind,
    Freezing,
    ExtremeHeat,
}

impl WeatherCondition {
    /// Whether this condition should halt weather-sensitive work.
    pub fn is_adverse(&self) -> bool {
        !matches!(self, Self::Clear | Self::Cloudy)
    }
}

/// One record of the consumed weather feed: `{time, condition}`.
///
/// The detector turns each adverse snapshot into a synthetic
/// [`ActivityType::WeatherAlert`] event before pairing; an absent feed simply
/// disables weather-conflict detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub time: DateTime<Utc>,
    pub condition: WeatherCondition,
}
