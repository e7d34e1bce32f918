use chrono::{Datelike, Local, Month, NaiveDate, Weekday};
use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map_res, opt, value},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use num_traits::FromPrimitive;
use serde_with::DeserializeFromStr;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Days of `month0` (zero based) in `year`, first to last.
///
/// Month indices outside `0..12` are normalized the usual calendar way, so
/// `month_days(2024, 12)` yields January 2025 and `month_days(2025, -1)`
/// December 2024.
pub fn month_days(year: i32, month0: i32) -> Vec<NaiveDate> {
    MonthIndex::from_raw(year, month0).days()
}

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    MonthIndex::new(*month, year).days().len() as u32
}

/// "December 25, 2024"
pub fn long_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn two_digits(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })(input)
}

fn ymd(input: &str) -> IResult<&str, (i32, u32, u32)> {
    tuple((
        map_res(take_while_m_n(4, 4, |c: char| c.is_ascii_digit()), |s: &str| {
            s.parse::<i32>()
        }),
        preceded(char('-'), two_digits),
        preceded(char('-'), two_digits),
    ))(input)
}

// Time of day and offset are accepted but thrown away.
fn time_suffix(input: &str) -> IResult<&str, ()> {
    value(
        (),
        tuple((
            one_of("Tt "),
            two_digits,
            preceded(char(':'), two_digits),
            opt(preceded(char(':'), two_digits)),
            opt(preceded(char('.'), digit1)),
            opt(alt((
                value((), one_of("Zz")),
                value(
                    (),
                    tuple((one_of("+-"), two_digits, opt(char(':')), two_digits)),
                ),
            ))),
        )),
    )(input)
}

/// Parses the calendar day written in `input`.
///
/// Accepts `YYYY-MM-DD` optionally followed by a time of day and a UTC
/// offset. The date is taken as written; no timezone conversion happens.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let (_, (year, month, day)) = all_consuming(terminated(ymd, opt(time_suffix)))(trimmed)
        .map_err(|_| {
            Error::new(
                ErrorKind::DateParse,
                &format!("'{}' is not a calendar date", input),
            )
        })?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::new(
            ErrorKind::DateParse,
            &format!("'{}' is not a valid day", input),
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl WeekStart {
    const SUNDAY_HEADER: &'static [&'static str] =
        &["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    const MONDAY_HEADER: &'static [&'static str] =
        &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            WeekStart::Sunday => Self::SUNDAY_HEADER,
            WeekStart::Monday => Self::MONDAY_HEADER,
        }
    }

    pub fn column_of(&self, weekday: Weekday) -> u8 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday() as u8,
            WeekStart::Monday => weekday.num_days_from_monday() as u8,
        }
    }
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Sunday
    }
}

impl FromStr for WeekStart {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("'{}' is not a valid start of week", s),
            )),
        }
    }
}

/// A displayed month: year plus month, with calendar arithmetic that rolls
/// over year boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    month: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(month: Month, year: i32) -> Self {
        MonthIndex { month, year }
    }

    pub fn from_raw(year: i32, month0: i32) -> Self {
        Self::from_total(year as i64 * 12 + month0 as i64)
    }

    /// Month containing today's local date.
    pub fn current() -> Self {
        MonthIndex::from(Local::now().date_naive())
    }

    fn total(&self) -> i64 {
        self.year as i64 * 12 + self.month.number_from_month() as i64 - 1
    }

    fn from_total(total: i64) -> Self {
        let year = i32::try_from(total.div_euclid(12)).unwrap_or(if total < 0 {
            i32::MIN
        } else {
            i32::MAX
        });
        let month = Month::from_i64(total.rem_euclid(12) + 1).unwrap_or(Month::January);

        MonthIndex { month, year }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), 1)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month.number_from_month()
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        match self.first_day() {
            Some(first) => first
                .iter_days()
                .take_while(|day| self.contains(day))
                .collect(),
            None => {
                log::debug!("{} is outside the representable date range", self);
                Vec::new()
            }
        }
    }

    /// Grid column of the 1st of the month.
    pub fn first_weekday_offset(&self, week_start: WeekStart) -> u8 {
        self.first_day()
            .map(|first| week_start.column_of(first.weekday()))
            .unwrap_or(0)
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex::current()
    }
}

impl From<NaiveDate> for MonthIndex {
    fn from(date: NaiveDate) -> Self {
        MonthIndex::from_raw(date.year(), date.month0() as i32)
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        MonthIndex::from_total(self.total() + rhs as i64)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthIndex::from_total(self.total() - rhs as i64)
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total().cmp(&other.total())
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

/// Owns the displayed month and moves it around.
#[derive(Debug, Clone)]
pub struct Navigator {
    displayed: MonthIndex,
}

impl Navigator {
    pub fn new(displayed: MonthIndex) -> Self {
        Navigator { displayed }
    }

    pub fn displayed(&self) -> MonthIndex {
        self.displayed
    }

    pub fn forward(&mut self) {
        self.forward_by(1);
    }

    pub fn backward(&mut self) {
        self.backward_by(1);
    }

    pub fn forward_by(&mut self, months: u32) {
        self.displayed = self.displayed + months;
    }

    pub fn backward_by(&mut self, months: u32) {
        self.displayed = self.displayed - months;
    }

    pub fn reset_to_today(&mut self) {
        self.displayed = MonthIndex::current();
    }

    pub fn goto(&mut self, month: MonthIndex) {
        self.displayed = month;
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Navigator::new(MonthIndex::current())
    }
}
