use chrono::NaiveDate;
use std::convert::TryFrom;

use crate::datetime::MonthIndex;
use crate::event::{CalendarEvent, EventSpec};

/// Events of `events` that fall on `day`, in their original order.
pub fn events_of_day<'a>(
    day: &'a NaiveDate,
    events: &'a [CalendarEvent],
) -> impl Iterator<Item = &'a CalendarEvent> + 'a {
    events.iter().filter(move |event| event.occurs_on(day))
}

/// Report about an event that could not be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub event_id: String,
    pub input: String,
    pub message: String,
}

/// Owns the events shown by the calendar.
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    events: Vec<CalendarEvent>,
    diagnostics: Vec<Diagnostic>,
}

impl Agenda {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Agenda {
            events,
            diagnostics: Vec::new(),
        }
    }

    pub fn from_specs<I: IntoIterator<Item = EventSpec>>(specs: I) -> Self {
        let mut agenda = Agenda::default();

        for spec in specs {
            let event_id = spec.id.clone();
            let input = spec.date.clone();

            match CalendarEvent::try_from(spec) {
                Ok(event) => agenda.events.push(event),
                Err(e) => {
                    log::warn!("Skipping event: {}", e);
                    agenda.diagnostics.push(Diagnostic {
                        event_id,
                        input,
                        message: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Loaded {} events ({} skipped)",
            agenda.events.len(),
            agenda.diagnostics.len()
        );

        agenda
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_of_day<'a>(
        &'a self,
        day: &'a NaiveDate,
    ) -> impl Iterator<Item = &'a CalendarEvent> + 'a {
        events_of_day(day, &self.events)
    }

    /// Every day of `month` together with the events on it.
    pub fn events_of_month(&self, month: MonthIndex) -> Vec<(NaiveDate, Vec<&CalendarEvent>)> {
        month
            .days()
            .into_iter()
            .map(|day| {
                let matched = self.events.iter().filter(|e| e.occurs_on(&day)).collect();
                (day, matched)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Month};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spec(id: &str, title: &str, date: &str, category: &str, company: &str) -> EventSpec {
        EventSpec {
            id: id.to_owned(),
            title: title.to_owned(),
            date: date.to_owned(),
            category: category.to_owned(),
            company_name: company.to_owned(),
            note: None,
        }
    }

    fn december_agenda() -> Agenda {
        Agenda::from_specs(vec![
            spec("1", "Email - TechCorp", "2024-12-25", "Email", "TechCorp"),
            spec("2", "Call - InnoSys", "2024-12-28", "Phone", "InnoSys"),
        ])
    }

    #[test]
    fn december_scenario() {
        let agenda = december_agenda();
        let month = agenda.events_of_month(MonthIndex::new(Month::December, 2024));

        assert_eq!(month.len(), 31);
        for (day, matched) in month {
            let titles: Vec<&str> = matched.iter().map(|e| e.title()).collect();
            match day.day() {
                25 => assert_eq!(titles, vec!["Email - TechCorp"]),
                28 => assert_eq!(titles, vec!["Call - InnoSys"]),
                _ => assert!(titles.is_empty(), "{} should be empty", day),
            }
        }
    }

    #[test]
    fn matches_iff_same_day() {
        let agenda = december_agenda();
        for day in MonthIndex::new(Month::December, 2024).days() {
            for event in agenda.events() {
                let matched = agenda.events_of_day(&day).any(|e| e.id() == event.id());
                let same = event.date().year() == day.year()
                    && event.date().month() == day.month()
                    && event.date().day() == day.day();
                assert_eq!(matched, same);
            }
        }
    }

    #[test]
    fn no_events_no_matches() {
        let agenda = Agenda::default();
        assert!(agenda.is_empty());
        assert!(agenda
            .events_of_month(MonthIndex::new(Month::February, 2024))
            .iter()
            .all(|(_, matched)| matched.is_empty()));
    }

    #[test]
    fn same_day_events_keep_order() {
        let agenda = Agenda::from_specs(vec![
            spec("a", "First", "2024-12-25", "Email", "TechCorp"),
            spec("b", "Elsewhere", "2024-12-26", "Email", "TechCorp"),
            spec("c", "Second", "2024-12-25T18:00:00Z", "Phone", "InnoSys"),
        ]);
        let day = ymd(2024, 12, 25);
        let ids: Vec<&str> = agenda.events_of_day(&day).map(|e| e.id()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn other_months_do_not_match() {
        let agenda = december_agenda();
        assert_eq!(agenda.events_of_day(&ymd(2025, 12, 25)).count(), 0);
        assert_eq!(agenda.events_of_day(&ymd(2024, 11, 25)).count(), 0);
    }

    #[test]
    fn unparseable_dates_are_reported_and_never_match() {
        let agenda = Agenda::from_specs(vec![
            spec("ok", "Fine", "2024-12-25", "Email", "TechCorp"),
            spec("bad", "Broken", "12/25/2024", "Email", "TechCorp"),
        ]);

        assert_eq!(agenda.events().len(), 1);
        assert_eq!(agenda.diagnostics().len(), 1);
        assert_eq!(agenda.diagnostics()[0].event_id, "bad");
        assert_eq!(agenda.diagnostics()[0].input, "12/25/2024");
        assert!(agenda
            .events_of_month(MonthIndex::new(Month::December, 2024))
            .iter()
            .flat_map(|(_, matched)| matched.iter())
            .all(|e| e.id() == "ok"));
    }

    #[test]
    fn free_matcher_works_on_slices() {
        let events = vec![CalendarEvent::new(
            "x",
            "Email - TechCorp",
            ymd(2024, 12, 25),
            "Email",
            "TechCorp",
        )];
        let day = ymd(2024, 12, 25);
        assert_eq!(events_of_day(&day, &events).count(), 1);
        let other = ymd(2024, 12, 24);
        assert_eq!(events_of_day(&other, &events).count(), 0);
    }
}
