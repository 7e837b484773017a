//! Family events.
//!
//! - [`FamilyEvent`]: a calendar entry, either user-created or derived from a holiday
//! - [`EventDraft`]: unvalidated user input for a new event
//! - [`EventPatch`]: a partial update for an existing event
//! - [`EventFilter`]: the calendar view filters

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::holiday::HolidayRecord;
use crate::time::EventTime;

/// Prefix of synthetic ids given to holiday-derived events.
pub const HOLIDAY_ID_PREFIX: &str = "holiday_";

/// Prefix of ids given to user-created events.
pub const EVENT_ID_PREFIX: &str = "evt_";

/// Title used when an update clears the title.
pub const UNTITLED: &str = "Untitled";

/// Reasons an event is rejected before it reaches any service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title is missing or blank.
    #[error("event title is required")]
    MissingTitle,

    /// Start time is missing.
    #[error("event start date is required")]
    MissingStart,

    /// A time field could not be parsed.
    #[error("invalid {field}: {value:?}")]
    InvalidTime { field: &'static str, value: String },

    /// End is before start.
    #[error("end date cannot be before start date")]
    EndBeforeStart,
}

/// Event priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Returns the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown priority {:?} (expected high, medium or low)", other)),
        }
    }
}

/// A calendar entry assignable to family members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEvent {
    /// Event id; `evt_<millis>` for user events, `holiday_<date>` for holidays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Event title, never blank.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start of the event.
    pub start: EventTime,
    /// End of the event, never before `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    /// Ids of the assigned family members.
    #[serde(default)]
    pub assignees: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_holiday: bool,
    /// Date of the source holiday, set only when `is_holiday`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FamilyEvent {
    /// Creates a medium-priority event with no assignees.
    pub fn new(title: impl Into<String>, start: EventTime) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            start,
            end: None,
            assignees: BTreeSet::new(),
            created_by: None,
            priority: Priority::Medium,
            is_holiday: false,
            holiday_ref: None,
            created_at: None,
        }
    }

    /// Synthesizes the calendar entry shown for a holiday.
    pub fn from_holiday(holiday: &HolidayRecord) -> Self {
        let date = holiday.iso_date();
        let description = if holiday.description.is_empty() {
            format!("{} holiday in {}", holiday.kind, holiday.country)
        } else {
            holiday.description.clone()
        };

        Self {
            id: Some(format!("{}{}", HOLIDAY_ID_PREFIX, date)),
            description: Some(description),
            is_holiday: true,
            holiday_ref: Some(date),
            ..Self::new(holiday.name.clone(), EventTime::AllDay(holiday.date))
        }
    }

    /// Builder method to set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to assign a member.
    pub fn with_assignee(mut self, member_id: impl Into<String>) -> Self {
        self.assignees.insert(member_id.into());
        self
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: EventTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Returns true if the member is assigned to this event.
    pub fn is_assigned_to(&self, member_id: &str) -> bool {
        self.assignees.contains(member_id)
    }

    /// Checks the event invariants: non-blank title and `end >= start`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if let Some(end) = self.end {
            if end.is_before(&self.start) {
                return Err(ValidationError::EndBeforeStart);
            }
        }
        Ok(())
    }
}

/// Unvalidated input for a new event, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub assignees: Vec<String>,
    pub created_by: Option<String>,
    pub priority: Priority,
}

impl EventDraft {
    /// Creates a draft with a title and start.
    pub fn new(title: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: Some(start.into()),
            ..Self::default()
        }
    }

    /// Validates the draft and converts it into an event without an id.
    ///
    /// Blank end values are treated as absent.
    pub fn into_event(self) -> Result<FamilyEvent, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let start = match self.start.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingStart),
            Some(raw) => parse_field("start", raw)?,
        };

        let end = match self.end.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_field("end", raw)?),
        };

        let event = FamilyEvent {
            description: self.description.filter(|d| !d.trim().is_empty()),
            end,
            assignees: self.assignees.into_iter().collect(),
            created_by: self.created_by,
            priority: self.priority,
            ..FamilyEvent::new(title, start)
        };
        event.validate()?;
        Ok(event)
    }
}

/// A partial update to an existing user event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// New title; `Some("")` resets to [`UNTITLED`].
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Replaces the assignee set when present.
    pub assignees: Option<Vec<String>>,
    pub priority: Option<Priority>,
}

impl EventPatch {
    /// Applies the patch to an event, returning the updated copy.
    pub fn apply(self, event: &FamilyEvent) -> Result<FamilyEvent, ValidationError> {
        let mut updated = event.clone();

        if let Some(title) = self.title {
            let title = title.trim();
            updated.title = if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            };
        }
        if let Some(description) = self.description {
            updated.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(start) = self.start {
            updated.start = parse_field("start", start.trim())?;
        }
        if let Some(end) = self.end {
            let end = end.trim();
            updated.end = if end.is_empty() {
                None
            } else {
                Some(parse_field("end", end)?)
            };
        }
        if let Some(assignees) = self.assignees {
            updated.assignees = assignees.into_iter().collect();
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }

        updated.validate()?;
        Ok(updated)
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<EventTime, ValidationError> {
    EventTime::parse(raw).map_err(|_| ValidationError::InvalidTime {
        field,
        value: raw.to_string(),
    })
}

/// Calendar view filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFilter {
    /// Every event.
    #[default]
    All,
    /// Holiday-derived events only.
    Holidays,
    /// User events only.
    Family,
}

impl EventFilter {
    /// Returns true if the event passes this filter.
    pub fn matches(&self, event: &FamilyEvent) -> bool {
        match self {
            Self::All => true,
            Self::Holidays => event.is_holiday,
            Self::Family => !event.is_holiday,
        }
    }
}

impl FromStr for EventFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "holidays" => Ok(Self::Holidays),
            "family" => Ok(Self::Family),
            other => Err(format!("unknown filter {:?} (expected all, holidays or family)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::HolidayKind;
    use chrono::NaiveDate;

    fn labor_day() -> HolidayRecord {
        HolidayRecord::from_parts(
            "Labor Day",
            "",
            "ES",
            "All",
            HolidayKind::National,
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        )
    }

    #[test]
    fn draft_with_empty_title_is_rejected() {
        let draft = EventDraft::new("", "2025-04-20");
        assert_eq!(draft.into_event(), Err(ValidationError::MissingTitle));

        let draft = EventDraft::new("   ", "2025-04-20");
        assert_eq!(draft.into_event(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn draft_without_start_is_rejected() {
        let draft = EventDraft {
            title: "Dinner".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.into_event(), Err(ValidationError::MissingStart));
    }

    #[test]
    fn draft_with_bad_time_is_rejected() {
        let draft = EventDraft::new("Dinner", "soon");
        assert!(matches!(
            draft.into_event(),
            Err(ValidationError::InvalidTime { field: "start", .. })
        ));
    }

    #[test]
    fn draft_end_before_start_is_rejected() {
        let draft = EventDraft {
            end: Some("2025-04-19".to_string()),
            ..EventDraft::new("Trip", "2025-04-20")
        };
        assert_eq!(draft.into_event(), Err(ValidationError::EndBeforeStart));
    }

    #[test]
    fn draft_converts_to_event() {
        let draft = EventDraft {
            description: Some("  ".to_string()),
            end: Some(String::new()),
            assignees: vec!["2".to_string(), "1".to_string(), "2".to_string()],
            priority: Priority::High,
            ..EventDraft::new(" School Meeting ", "2025-04-22T17:00:00Z")
        };

        let event = draft.into_event().unwrap();
        assert_eq!(event.title, "School Meeting");
        assert!(event.id.is_none());
        assert!(event.description.is_none());
        assert!(event.end.is_none());
        assert_eq!(event.assignees.len(), 2);
        assert!(event.is_assigned_to("1"));
        assert_eq!(event.priority, Priority::High);
        assert!(!event.is_holiday);
    }

    #[test]
    fn holiday_event_shape() {
        let event = FamilyEvent::from_holiday(&labor_day());

        assert_eq!(event.id.as_deref(), Some("holiday_2025-05-01"));
        assert_eq!(event.title, "Labor Day");
        assert_eq!(
            event.description.as_deref(),
            Some("National holiday in ES")
        );
        assert!(event.is_holiday);
        assert_eq!(event.holiday_ref.as_deref(), Some("2025-05-01"));
        assert_eq!(event.priority, Priority::Medium);
        assert!(event.start.is_all_day());
    }

    #[test]
    fn patch_empty_title_becomes_untitled() {
        let event = FamilyEvent::new("Dinner", EventTime::parse("2025-04-20").unwrap());
        let patch = EventPatch {
            title: Some(String::new()),
            priority: Some(Priority::Low),
            ..Default::default()
        };

        let updated = patch.apply(&event).unwrap();
        assert_eq!(updated.title, UNTITLED);
        assert_eq!(updated.priority, Priority::Low);
    }

    #[test]
    fn patch_rejects_end_before_start() {
        let event = FamilyEvent::new("Dinner", EventTime::parse("2025-04-20").unwrap());
        let patch = EventPatch {
            end: Some("2025-04-01".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.apply(&event), Err(ValidationError::EndBeforeStart));
    }

    #[test]
    fn filters() {
        let holiday = FamilyEvent::from_holiday(&labor_day());
        let family = FamilyEvent::new("Movie Night", EventTime::parse("2025-04-25").unwrap());

        assert!(EventFilter::All.matches(&holiday));
        assert!(EventFilter::All.matches(&family));
        assert!(EventFilter::Holidays.matches(&holiday));
        assert!(!EventFilter::Holidays.matches(&family));
        assert!(EventFilter::Family.matches(&family));
        assert!(!EventFilter::Family.matches(&holiday));
    }

    #[test]
    fn parse_filter_and_priority() {
        assert_eq!("Holidays".parse::<EventFilter>(), Ok(EventFilter::Holidays));
        assert_eq!("".parse::<EventFilter>(), Ok(EventFilter::All));
        assert!("work".parse::<EventFilter>().is_err());
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn event_json_uses_lowercase_priority() {
        let json = r#"{
            "id": "evt_1",
            "title": "Family Dinner",
            "start": "2025-04-20T19:00:00Z",
            "assignees": ["1", "2"],
            "priority": "high"
        }"#;

        let event: FamilyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.priority, Priority::High);
        assert!(!event.is_holiday);
        assert_eq!(event.assignees.len(), 2);
    }
}
