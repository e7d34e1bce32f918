use chrono::NaiveDate;
use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;

use crate::datetime::parse_calendar_date;
use crate::error::{Error, Result};

/// Category label whose events are drawn with the email style.
pub const EMAIL_CATEGORY: &str = "Email";

/// An event as written in a config file, before its date has been checked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventSpec {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    #[serde(rename = "company")]
    pub company_name: String,
    #[serde(default, alias = "notes")]
    pub note: Option<String>,
}

/// A scheduled communication on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    id: String,
    title: String,
    date: NaiveDate,
    category: String,
    company_name: String,
    note: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        id: &str,
        title: &str,
        date: NaiveDate,
        category: &str,
        company_name: &str,
    ) -> Self {
        CalendarEvent {
            id: id.to_owned(),
            title: title.to_owned(),
            date,
            category: category.to_owned(),
            company_name: company_name.to_owned(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> &NaiveDate {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }

    pub fn is_email(&self) -> bool {
        self.category == EMAIL_CATEGORY
    }

    pub fn occurs_on(&self, day: &NaiveDate) -> bool {
        &self.date == day
    }
}

impl TryFrom<EventSpec> for CalendarEvent {
    type Error = Error;

    fn try_from(spec: EventSpec) -> Result<Self> {
        let date = parse_calendar_date(&spec.date)
            .map_err(|e| e.with_msg(&format!("event '{}' has unusable date '{}'", spec.id, spec.date)))?;

        Ok(CalendarEvent {
            id: spec.id,
            title: spec.title,
            date,
            category: spec.category,
            company_name: spec.company_name,
            note: spec.note,
        })
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.title)
    }
}
