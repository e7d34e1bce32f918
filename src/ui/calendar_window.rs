use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use std::fmt::{Display, Write};
use unsegen::base::*;
use unsegen::widget::*;

use super::{Context, Theme};
use crate::agenda::Agenda;
use crate::datetime::{MonthIndex, WeekStart};
use crate::event::CalendarEvent;

const COLUMNS: usize = 7;

/// Grid slots of `month`, padded with `None` to whole weeks.
pub fn grid_slots(month: MonthIndex, week_start: WeekStart) -> Vec<Option<NaiveDate>> {
    let offset = month.first_weekday_offset(week_start) as usize;
    let mut slots: Vec<Option<NaiveDate>> = std::iter::repeat(None)
        .take(offset)
        .chain(month.days().into_iter().map(Some))
        .collect();

    while slots.len() % COLUMNS != 0 {
        slots.push(None);
    }
    slots
}

/// Plain text rendering of `month`, used for non-interactive output.
///
/// Days carrying events are marked with `+`, `today` with `*`. The events
/// of the month follow the grid, one per line.
pub fn month_sheet(
    agenda: &Agenda,
    month: MonthIndex,
    week_start: WeekStart,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let width = COLUMNS * 5;

    let _ = writeln!(out, "{:^width$}", month.to_string(), width = width);
    let _ = writeln!(
        out,
        "{}",
        week_start.header().iter().map(|h| format!("{:>5}", h)).join("")
    );

    for week in grid_slots(month, week_start).chunks(COLUMNS) {
        let line = week
            .iter()
            .map(|slot| match slot {
                Some(day) => {
                    let today_marker = if *day == today { '*' } else { ' ' };
                    let event_marker = if agenda.events_of_day(day).next().is_some() {
                        '+'
                    } else {
                        ' '
                    };
                    format!(" {}{}{:>2}", today_marker, event_marker, day.day())
                }
                None => "     ".to_owned(),
            })
            .join("");
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let days = agenda.events_of_month(month);
    let events = days
        .iter()
        .flat_map(|(day, events)| events.iter().map(move |e| (day, e)));
    for (day, event) in events {
        let _ = writeln!(
            out,
            "{}  {} ({}, {})",
            day.format("%b %e"),
            event.title(),
            event.category(),
            event.company_name()
        );
    }

    out
}

struct DayCell<'a> {
    day_num: u32,
    is_today: bool,
    theme: &'a Theme,
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arg_today = if self.is_today {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        write!(f, "{}{:>2}", arg_today, self.day_num)
    }
}

pub struct MonthPane<'a> {
    month: MonthIndex,
    slots: Vec<Option<NaiveDate>>,
    context: &'a Context,
}

impl<'a> MonthPane<'a> {
    const CELL_WIDTH: usize = 14;
    const EVENT_LINES: usize = 2;
    const CELL_HEIGHT: usize = 1 + Self::EVENT_LINES;
    const HEADER_ROWS: usize = 2;

    pub fn new(context: &'a Context) -> Self {
        let month = context.displayed_month();
        MonthPane {
            month,
            slots: grid_slots(month, context.week_start),
            context,
        }
    }

    fn event_style(&self, event: &CalendarEvent) -> StyleModifier {
        if event.is_email() {
            self.context.theme.email_event_style
        } else {
            self.context.theme.other_event_style
        }
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        let weeks = self.slots.len() / COLUMNS;
        Demand2D {
            width: ColDemand::exact(COLUMNS * Self::CELL_WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + weeks * Self::CELL_HEIGHT),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let title_width = COLUMNS * Self::CELL_WIDTH;

        let mut cursor = Cursor::new(&mut window).style_modifier(theme.month_header_style);
        let _ = write!(
            &mut cursor,
            "{:^width$}",
            self.month.to_string(),
            width = title_width
        );

        cursor.move_to(ColIndex::new(0), RowIndex::new(1));
        cursor.set_style_modifier(theme.weekday_header_style);
        for &head in self.context.week_start.header() {
            let _ = write!(&mut cursor, "{:<width$}", head, width = Self::CELL_WIDTH);
        }

        for (slot, day) in self.slots.iter().enumerate() {
            let day = match day {
                Some(day) => day,
                None => continue,
            };
            let x = (slot % COLUMNS * Self::CELL_WIDTH) as i32;
            let y = (Self::HEADER_ROWS + slot / COLUMNS * Self::CELL_HEIGHT) as i32;

            let style = if day == self.context.cursor() {
                theme.focus_day_style
            } else if *day == self.context.today() {
                theme.today_day_style
            } else {
                theme.day_style
            };

            cursor.move_to(ColIndex::new(x), RowIndex::new(y));
            cursor.set_style_modifier(style);
            let cell = DayCell {
                day_num: day.day(),
                is_today: *day == self.context.today(),
                theme,
            };
            let _ = write!(&mut cursor, "{}", cell);

            let events: Vec<&CalendarEvent> = self.context.agenda().events_of_day(day).collect();
            let shown = if events.len() > Self::EVENT_LINES {
                Self::EVENT_LINES - 1
            } else {
                events.len()
            };

            for (line, event) in events.iter().take(shown).enumerate() {
                cursor.move_to(ColIndex::new(x + 1), RowIndex::new(y + 1 + line as i32));
                cursor.set_style_modifier(self.event_style(event));
                let _ = write!(
                    &mut cursor,
                    "{:.width$}",
                    event,
                    width = Self::CELL_WIDTH - 2
                );
            }

            if shown < events.len() {
                cursor.move_to(ColIndex::new(x + 1), RowIndex::new(y + 1 + shown as i32));
                cursor.set_style_modifier(theme.day_style);
                let _ = write!(&mut cursor, "+{} more", events.len() - shown);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::Month;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn slots_are_whole_weeks() {
        // 2024-12-01 is a Sunday
        let december = MonthIndex::new(Month::December, 2024);

        let sunday_first = grid_slots(december, WeekStart::Sunday);
        assert_eq!(sunday_first.len(), 35);
        assert_eq!(sunday_first[0], Some(ymd(2024, 12, 1)));

        let monday_first = grid_slots(december, WeekStart::Monday);
        assert_eq!(monday_first.len(), 42);
        assert_eq!(monday_first[5], None);
        assert_eq!(monday_first[6], Some(ymd(2024, 12, 1)));
        assert_eq!(monday_first.iter().flatten().count(), 31);
    }

    #[test]
    fn february_fits_four_weeks() {
        // 2026-02-01 is a Sunday
        let slots = grid_slots(MonthIndex::new(Month::February, 2026), WeekStart::Sunday);
        assert_eq!(slots.len(), 28);
        assert!(slots.iter().all(Option::is_some));
    }

    #[test]
    fn sheet_lists_events() {
        let agenda = Config::builtin().agenda();
        let sheet = month_sheet(
            &agenda,
            MonthIndex::new(Month::December, 2024),
            WeekStart::Sunday,
            ymd(2024, 12, 2),
        );

        let lines: Vec<&str> = sheet.lines().collect();
        assert_eq!(lines[0].trim(), "December 2024");
        assert!(lines[1].trim_start().starts_with("Sun"));
        assert!(lines[2].contains("*  2"));
        assert!(sheet.contains("+25"));
        assert!(sheet.contains("+28"));
        assert!(sheet.contains("Dec 25  Email - TechCorp (Email, TechCorp)"));
        assert!(sheet.contains("Dec 28  Call - InnoSys (Phone, InnoSys)"));
    }

    #[test]
    fn sheet_marks_today_and_events_separately() {
        let agenda = Config::builtin().agenda();
        let sheet = month_sheet(
            &agenda,
            MonthIndex::new(Month::December, 2024),
            WeekStart::Sunday,
            ymd(2024, 12, 25),
        );

        assert!(sheet.contains(" *+25"));
        assert!(sheet.contains("  +28"));
        assert!(!sheet.contains("*  2"));
    }

    #[test]
    fn sheet_without_events() {
        let sheet = month_sheet(
            &Agenda::default(),
            MonthIndex::new(Month::January, 2025),
            WeekStart::Monday,
            ymd(2000, 1, 1),
        );
        assert!(!sheet.contains('+'));
        assert_eq!(sheet.lines().count(), 2 + 5);
    }
}
