//! Text rendering for the terminal.
//!
//! Every function returns the text without a trailing newline; JSON output
//! is produced by the commands directly with `serde_json`.

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use famcal_core::{FamilyEvent, FamilyMember, HolidayRecord};
use famcal_service::{DataOrigin, LogEntry};

/// Notice printed to stderr when a batch did not come from the API.
pub fn origin_notice(origin: DataOrigin, country: &str) -> Option<String> {
    match origin {
        DataOrigin::Fallback => Some(format!(
            "note: holidays for {} are unavailable, showing the built-in fallback list",
            country
        )),
        DataOrigin::Cache | DataOrigin::Live => None,
    }
}

/// One holiday per line: date, weekday, name, kind and location.
pub fn holidays(records: &[HolidayRecord]) -> String {
    if records.is_empty() {
        return "No holidays".to_string();
    }
    records
        .iter()
        .map(holiday_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn holiday_line(holiday: &HolidayRecord) -> String {
    format!(
        "{}  {:<9}  {} ({}, {})",
        holiday.display_date(),
        holiday.weekday.as_str(),
        holiday.name,
        holiday.kind,
        holiday.location
    )
}

/// One event per line, with assignee names resolved from `members`.
pub fn events(events: &[FamilyEvent], members: &[FamilyMember]) -> String {
    if events.is_empty() {
        return "No events".to_string();
    }
    let names: BTreeMap<&str, &str> = members
        .iter()
        .filter_map(|m| Some((m.id.as_deref()?, m.name.as_str())))
        .collect();

    events
        .iter()
        .map(|event| event_line(event, &names))
        .collect::<Vec<_>>()
        .join("\n")
}

fn event_line(event: &FamilyEvent, names: &BTreeMap<&str, &str>) -> String {
    let mut line = format!(
        "{:<20}  {:<6}  {}",
        event.start.to_string(),
        event.priority.as_str(),
        event.title
    );
    if event.is_holiday {
        line.push_str(" [holiday]");
    }
    if !event.assignees.is_empty() {
        let assigned: Vec<&str> = event
            .assignees
            .iter()
            .map(|id| names.get(id.as_str()).copied().unwrap_or(id.as_str()))
            .collect();
        line.push_str(" @ ");
        line.push_str(&assigned.join(", "));
    }
    if let Some(id) = event.id.as_deref() {
        line.push_str(&format!(" ({})", id));
    }
    line
}

/// One member per line.
pub fn members(members: &[FamilyMember]) -> String {
    if members.is_empty() {
        return "No family members".to_string();
    }
    members
        .iter()
        .map(|m| {
            let mut line = format!("{:<3} {} ({})", m.id.as_deref().unwrap_or("-"), m.name, m.role);
            if let Some(email) = m.email.as_deref() {
                line.push_str(&format!(" <{}>", email));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Journal entries, oldest first.
pub fn logs(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "No log entries".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{} {:<5} {}",
                e.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                e.level.to_uppercase(),
                e.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use famcal_core::{EventTime, HolidayKind, Priority};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn family() -> Vec<FamilyMember> {
        vec![
            FamilyMember::new("Juan García", "Father").with_id("1"),
            FamilyMember::new("Luis García", "Son").with_id("3"),
        ]
    }

    #[test]
    fn holiday_list() {
        let records = vec![
            HolidayRecord::from_parts("Labor Day", "", "ES", "All", HolidayKind::Public, date(2025, 5, 1)),
            HolidayRecord::from_parts(
                "Constitution Day",
                "",
                "ES",
                "All",
                HolidayKind::National,
                date(2025, 12, 6),
            ),
        ];
        insta::assert_snapshot!(holidays(&records), @r"
        01/05/2025  Thursday   Labor Day (Public, All)
        06/12/2025  Saturday   Constitution Day (National, All)
        ");
    }

    #[test]
    fn empty_lists() {
        assert_eq!(holidays(&[]), "No holidays");
        assert_eq!(events(&[], &[]), "No events");
        assert_eq!(members(&[]), "No family members");
        assert_eq!(logs(&[]), "No log entries");
    }

    #[test]
    fn event_list_resolves_assignees() {
        let start = Utc.with_ymd_and_hms(2025, 4, 20, 18, 0, 0).unwrap();
        let dinner = FamilyEvent::new("Family Dinner", EventTime::from_utc(start))
            .with_id("evt_1")
            .with_assignee("1")
            .with_assignee("3")
            .with_assignee("9")
            .with_priority(Priority::High);
        let holiday = FamilyEvent::from_holiday(&HolidayRecord::from_parts(
            "Labor Day",
            "",
            "ES",
            "All",
            HolidayKind::Public,
            date(2025, 5, 1),
        ));

        insta::assert_snapshot!(events(&[dinner, holiday], &family()), @r"
        2025-04-20T18:00:00Z  high    Family Dinner @ Juan García, Luis García, 9 (evt_1)
        2025-05-01            medium  Labor Day [holiday] (holiday_2025-05-01)
        ");
    }

    #[test]
    fn member_list() {
        let mut members_list = family();
        members_list[0].email = Some("juan@example.com".to_string());
        members_list.push(FamilyMember::new("Guest", "Friend"));

        insta::assert_snapshot!(members(&members_list), @r"
        1   Juan García (Father) <juan@example.com>
        3   Luis García (Son)
        -   Guest (Friend)
        ");
    }

    #[test]
    fn log_lines() {
        let entry = LogEntry {
            level: "warn".to_string(),
            message: "fetch failed, serving fallback holidays".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 4, 20, 9, 30, 0).unwrap(),
        };
        assert_eq!(
            logs(&[entry]),
            "2025-04-20T09:30:00Z WARN  fetch failed, serving fallback holidays"
        );
    }

    #[test]
    fn notice_only_for_fallback() {
        assert!(origin_notice(DataOrigin::Live, "ES").is_none());
        assert!(origin_notice(DataOrigin::Cache, "ES").is_none());
        let notice = origin_notice(DataOrigin::Fallback, "FR").unwrap();
        assert!(notice.contains("FR"));
    }
}
