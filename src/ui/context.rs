use chrono::prelude::*;
use chrono::Duration;

use crate::agenda::Agenda;
use crate::datetime::{MonthIndex, Navigator, WeekStart};
use crate::directory::{Company, CompanyForm, Directory};
use crate::error::{Error, ErrorKind, Result};
use crate::selection::Selection;

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Calendar,
    Admin,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub focus_day_style: StyleModifier,
    pub today_day_style: StyleModifier,
    pub today_day_char: Option<char>,
    pub month_header_style: StyleModifier,
    pub weekday_header_style: StyleModifier,
    pub email_event_style: StyleModifier,
    pub other_event_style: StyleModifier,
    pub title_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            focus_day_style: StyleModifier::default().bg_color(Color::Blue),
            today_day_style: StyleModifier::default()
                .invert(true)
                .format(TextFormatModifier::default().italic(true)),
            today_day_char: Some('*'),
            month_header_style: StyleModifier::default().fg_color(Color::Yellow),
            weekday_header_style: StyleModifier::default()
                .format(TextFormatModifier::default().bold(true)),
            email_event_style: StyleModifier::default().fg_color(Color::Green),
            other_event_style: StyleModifier::default().fg_color(Color::Blue),
            title_style: StyleModifier::default()
                .format(TextFormatModifier::default().bold(true)),
            error_style: StyleModifier::default().fg_color(Color::Red),
        }
    }
}

pub struct Context {
    pub quit: bool,
    pub mode: Mode,
    pub tab: Tab,
    pub theme: Theme,
    pub week_start: WeekStart,
    pub selection: Selection,
    pub company_index: usize,
    pub last_error_message: Option<String>,
    navigator: Navigator,
    cursor: NaiveDate,
    agenda: Agenda,
    directory: Directory,
    command_line: PromptLine,
    now: DateTime<Local>,
}

impl Context {
    pub fn new(agenda: Agenda, directory: Directory, week_start: WeekStart) -> Self {
        let now = Local::now();
        let last_error_message = match agenda.diagnostics() {
            [] => None,
            [only] => Some(only.message.clone()),
            many => Some(format!(
                "{} events skipped because of unusable dates (see log)",
                many.len()
            )),
        };

        Context {
            quit: false,
            mode: Mode::Normal,
            tab: Tab::Calendar,
            theme: Theme::default(),
            week_start,
            selection: Selection::default(),
            company_index: 0,
            last_error_message,
            navigator: Navigator::new(MonthIndex::from(now.date_naive())),
            cursor: now.date_naive(),
            agenda,
            directory,
            command_line: PromptLine::with_prompt(":".to_owned()),
            now,
        }
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn now(&self) -> &DateTime<Local> {
        &self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn update(&mut self) {
        self.now = Local::now();
    }

    pub fn displayed_month(&self) -> MonthIndex {
        self.navigator.displayed()
    }

    pub fn cursor(&self) -> &NaiveDate {
        &self.cursor
    }

    pub fn input_sink(&self) -> &PromptLine {
        &self.command_line
    }

    pub fn input_sink_mut(&mut self) -> &mut PromptLine {
        &mut self.command_line
    }

    // The cursor always lies in the displayed month.
    fn sync_cursor(&mut self) {
        let displayed = self.navigator.displayed();
        if !displayed.contains(&self.cursor) {
            let day = self.cursor.day();
            let days = displayed.days();
            if let Some(last) = days.last() {
                self.cursor = days
                    .get(day as usize - 1)
                    .copied()
                    .unwrap_or(*last);
            }
        }
    }

    pub fn move_cursor(&mut self, days: i64) {
        if let Some(cursor) = self.cursor.checked_add_signed(Duration::days(days)) {
            self.cursor = cursor;
            self.navigator.goto(MonthIndex::from(cursor));
        }
    }

    pub fn next_month(&mut self, months: u32) {
        self.navigator.forward_by(months);
        self.sync_cursor();
    }

    pub fn prev_month(&mut self, months: u32) {
        self.navigator.backward_by(months);
        self.sync_cursor();
    }

    pub fn goto_month(&mut self, month: MonthIndex) {
        self.navigator.goto(month);
        self.sync_cursor();
    }

    pub fn goto_today(&mut self) {
        self.update();
        self.navigator.reset_to_today();
        self.cursor = self.today();
        self.sync_cursor();
    }

    /// Opens the detail view for the first event under the cursor.
    pub fn select_cursor_day(&mut self) {
        self.selection.select_day(self.agenda.events_of_day(&self.cursor));
    }

    pub fn close_detail(&mut self) {
        self.selection.close();
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Calendar => Tab::Admin,
            Tab::Admin => Tab::Calendar,
        };
    }

    pub fn move_company_selection(&mut self, delta: isize) {
        let count = self.directory.companies().len();
        if count == 0 {
            self.company_index = 0;
        } else {
            let idx = self.company_index as isize + delta;
            self.company_index = idx.max(0).min(count as isize - 1) as usize;
        }
    }

    fn company_at(&self, number: usize) -> Result<&Company> {
        number
            .checked_sub(1)
            .and_then(|idx| self.directory.companies().get(idx))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::UnknownCompany,
                    &format!("there is no company number {}", number),
                )
            })
    }

    pub fn add_company(&mut self, assignments: &[(String, String)]) -> Result<()> {
        let mut form = CompanyForm::default();
        for (key, value) in assignments {
            form.set(key, value)?;
        }
        self.directory.add(&form)?;
        self.company_index = self.directory.companies().len() - 1;
        Ok(())
    }

    /// Replaces the fields named in `assignments` of company `number`
    /// (1-based); all other fields keep their values.
    pub fn edit_company(&mut self, number: usize, assignments: &[(String, String)]) -> Result<()> {
        let id = self.company_at(number)?.id;
        let mut form = self.directory.begin_edit(&id)?;

        let applied = assignments
            .iter()
            .try_for_each(|(key, value)| form.set(key, value))
            .and_then(|_| self.directory.commit_edit(&form).map(|_| ()));

        if applied.is_err() {
            self.directory.cancel_edit();
        }
        applied
    }

    pub fn delete_company(&mut self, number: usize) -> Result<()> {
        let id = self.company_at(number)?.id;
        self.directory.remove(&id)?;
        self.move_company_selection(0);
        Ok(())
    }

    pub fn delete_selected_company(&mut self) -> Result<()> {
        self.delete_company(self.company_index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::Month;

    fn context() -> Context {
        let config = Config::builtin();
        Context::new(config.agenda(), config.directory(), WeekStart::Sunday)
    }

    fn assignments(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn month_navigation_keeps_cursor_inside() {
        let mut ctx = context();
        ctx.goto_month(MonthIndex::new(Month::January, 2024));
        ctx.move_cursor(-(ctx.cursor().day0() as i64));
        assert_eq!(ctx.cursor(), &NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        ctx.move_cursor(30);
        assert_eq!(ctx.cursor(), &NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        ctx.next_month(1);
        assert_eq!(ctx.displayed_month(), MonthIndex::new(Month::February, 2024));
        assert_eq!(ctx.cursor(), &NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        ctx.move_cursor(1);
        assert_eq!(ctx.displayed_month(), MonthIndex::new(Month::March, 2024));
    }

    #[test]
    fn selecting_cursor_day() {
        let mut ctx = context();
        ctx.goto_month(MonthIndex::new(Month::December, 2024));
        ctx.move_cursor(24 - ctx.cursor().day0() as i64);
        assert_eq!(ctx.cursor().day(), 25);

        ctx.select_cursor_day();
        assert_eq!(
            ctx.selection.selected().map(|e| e.title()),
            Some("Email - TechCorp")
        );

        ctx.move_cursor(1);
        ctx.select_cursor_day();
        assert!(ctx.selection.is_open());

        ctx.close_detail();
        assert!(!ctx.selection.is_open());
    }

    #[test]
    fn goto_today() {
        let mut ctx = context();
        ctx.prev_month(30);
        ctx.goto_today();
        assert_eq!(ctx.cursor(), &ctx.today());
        assert!(ctx.displayed_month().contains(&ctx.today()));
    }

    #[test]
    fn company_commands() {
        let mut ctx = context();
        let fields = assignments(&[
            ("name", "TechCorp"),
            ("location", "Berlin"),
            ("email", "a@techcorp.example"),
            ("phone", "1"),
            ("periodicity", "7"),
        ]);
        ctx.add_company(&fields).unwrap();
        ctx.add_company(&fields).unwrap();
        assert_eq!(ctx.company_index, 1);

        ctx.edit_company(1, &assignments(&[("location", "Paris")]))
            .unwrap();
        assert_eq!(ctx.directory().companies()[0].location, "Paris");

        assert!(ctx
            .edit_company(1, &assignments(&[("periodicity", "never")]))
            .is_err());
        assert_eq!(ctx.directory().editing(), None);
        assert_eq!(ctx.directory().companies()[0].periodicity_days, 7);

        ctx.delete_selected_company().unwrap();
        assert_eq!(ctx.directory().companies().len(), 1);
        assert_eq!(ctx.company_index, 0);
        assert!(ctx.delete_company(5).is_err());
        assert!(ctx.delete_company(0).is_err());
    }
}
