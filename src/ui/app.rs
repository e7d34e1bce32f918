use crate::config::Config;
use crate::events::{Dispatcher, Event};

use super::command::CommandParser;
use super::{AdminWindow, Context, DetailWindow, Mode, MonthPane, Tab};

use std::fmt::Write;
use unsegen::base::{Cursor, Terminal, Window};
use unsegen::input::{
    EditBehavior, Input, Key, Navigatable, NavigateBehavior, OperationResult, ScrollBehavior,
};
use unsegen::widget::*;

/// One line at the bottom: command prompt, last error or key hints.
struct StatusLine<'a> {
    context: &'a Context,
}

impl StatusLine<'_> {
    fn hint(&self) -> &'static str {
        match self.context.tab {
            Tab::Calendar => {
                "h/j/k/l move  n/p month  t today  enter details  esc close  tab admin  : command  q quit"
            }
            Tab::Admin => "j/k move  d delete  :add / :edit N / :delete N  tab calendar  q quit",
        }
    }
}

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let mut cursor = Cursor::new(&mut window);

        if let Some(msg) = &self.context.last_error_message {
            cursor.set_style_modifier(theme.error_style);
            let _ = write!(&mut cursor, "{}", msg);
        } else {
            cursor.set_style_modifier(theme.day_style);
            let _ = write!(&mut cursor, "{}", self.hint());
        }
    }
}

pub struct App {
    context: Context,
}

impl App {
    pub fn new(config: &Config) -> App {
        let context = Context::new(config.agenda(), config.directory(), config.week_start);
        App { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        let main = match self.context.tab {
            Tab::Calendar => HLayout::new()
                .widget(MonthPane::new(&self.context))
                .widget(DetailWindow::new(&self.context)),
            Tab::Admin => HLayout::new().widget(AdminWindow::new(&self.context)),
        };

        let bottom = match self.context.mode {
            Mode::Command => HLayout::new().widget(self.context.input_sink().as_widget()),
            Mode::Normal => HLayout::new().widget(StatusLine {
                context: &self.context,
            }),
        };

        VLayout::new().widget(main).widget(bottom)
    }

    fn handle_key(&mut self, key: Key) {
        let ctx = &mut self.context;

        match key {
            Key::Char('q') => ctx.quit = true,
            Key::Char(':') => ctx.mode = Mode::Command,
            Key::Char('\t') => ctx.toggle_tab(),
            Key::Esc => {
                ctx.close_detail();
                ctx.last_error_message = None;
            }
            _ => match ctx.tab {
                Tab::Calendar => match key {
                    Key::Char('n') => ctx.next_month(1),
                    Key::Char('p') => ctx.prev_month(1),
                    Key::Char('t') => ctx.goto_today(),
                    Key::Char('\n') => ctx.select_cursor_day(),
                    _ => {}
                },
                Tab::Admin => match key {
                    Key::Char('k') | Key::Up => ctx.move_company_selection(-1),
                    Key::Char('j') | Key::Down => ctx.move_company_selection(1),
                    Key::Char('d') => {
                        if let Err(e) = ctx.delete_selected_company() {
                            ctx.last_error_message = Some(e.to_string());
                        }
                    }
                    _ => {}
                },
            },
        }
    }

    pub fn handle_input(&mut self, input: Input) {
        match self.context.mode {
            Mode::Normal => {
                let leftover = match self.context.tab {
                    Tab::Calendar => input
                        .chain(
                            NavigateBehavior::new(&mut CursorBehaviour(&mut self.context))
                                .left_on(Key::Char('h'))
                                .left_on(Key::Left)
                                .right_on(Key::Char('l'))
                                .right_on(Key::Right)
                                .up_on(Key::Char('k'))
                                .up_on(Key::Up)
                                .down_on(Key::Char('j'))
                                .down_on(Key::Down),
                        )
                        .finish(),
                    Tab::Admin => Some(input),
                };

                if let Some(Input {
                    event: unsegen::input::Event::Key(key),
                    ..
                }) = leftover
                {
                    self.handle_key(key);
                }
            }
            Mode::Command => {
                if input.matches(Key::Esc) {
                    self.context.mode = Mode::Normal;
                    return;
                }

                let _leftover = input
                    .chain(CommandParser::new(&mut self.context))
                    .chain(
                        EditBehavior::new(self.context.input_sink_mut())
                            .delete_forwards_on(Key::Delete)
                            .delete_backwards_on(Key::Backspace)
                            .left_on(Key::Left)
                            .right_on(Key::Right),
                    )
                    .chain(
                        ScrollBehavior::new(self.context.input_sink_mut())
                            .backwards_on(Key::Up)
                            .forwards_on(Key::Down),
                    )
                    .finish();
            }
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.context.quit {
            // Draw
            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();

            // Handle events
            match dispatcher.next() {
                Ok(Event::Update) => self.context.update(),
                Ok(Event::Input(input)) => self.handle_input(input),
                Ok(Event::Resize) => log::debug!("Terminal resized"),
                Err(e) => {
                    log::error!("Event channel closed: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }
}

struct CursorBehaviour<'a>(&'a mut Context);

impl Navigatable for CursorBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.0.move_cursor(7);
        Ok(())
    }

    fn move_left(&mut self) -> OperationResult {
        self.0.move_cursor(-1);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        self.0.move_cursor(1);
        Ok(())
    }

    fn move_up(&mut self) -> OperationResult {
        self.0.move_cursor(-7);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::MonthIndex;
    use chrono::Month;

    fn key(k: Key) -> Input {
        Input {
            event: unsegen::input::Event::Key(k),
            raw: Vec::new(),
        }
    }

    fn app() -> App {
        let mut app = App::new(&Config::builtin());
        app.context.goto_month(MonthIndex::new(Month::December, 2024));
        app
    }

    fn type_command(app: &mut App, cmd: &str) {
        app.handle_input(key(Key::Char(':')));
        for c in cmd.chars() {
            app.handle_input(key(Key::Char(c)));
        }
        app.handle_input(key(Key::Char('\n')));
    }

    #[test]
    fn keys_navigate_months() {
        let mut app = app();
        app.handle_input(key(Key::Char('n')));
        assert_eq!(
            app.context().displayed_month(),
            MonthIndex::new(Month::January, 2025)
        );
        app.handle_input(key(Key::Char('p')));
        app.handle_input(key(Key::Char('p')));
        assert_eq!(
            app.context().displayed_month(),
            MonthIndex::new(Month::November, 2024)
        );
    }

    #[test]
    fn enter_opens_and_esc_closes_detail() {
        let mut app = app();
        type_command(&mut app, "goto 2024-12");
        let to_25th = 25 - chrono::Datelike::day(app.context().cursor()) as i64;
        app.context.move_cursor(to_25th);

        app.handle_input(key(Key::Char('\n')));
        assert_eq!(
            app.context().selection.selected().map(|e| e.id()),
            Some("1")
        );

        app.handle_input(key(Key::Esc));
        assert!(!app.context().selection.is_open());
    }

    #[test]
    fn command_line_runs_commands() {
        let mut app = app();
        type_command(&mut app, "next 2");
        assert_eq!(app.context().mode, Mode::Normal);
        assert_eq!(
            app.context().displayed_month(),
            MonthIndex::new(Month::February, 2025)
        );

        type_command(&mut app, "bogus");
        assert!(app.context().last_error_message.is_some());

        type_command(&mut app, "q");
        assert!(app.context().quit);
    }

    #[test]
    fn cursor_keys_move_day() {
        let mut app = app();
        let start = *app.context().cursor();

        app.handle_input(key(Key::Char('l')));
        app.handle_input(key(Key::Char('j')));
        assert_eq!(
            *app.context().cursor(),
            start + chrono::Duration::days(8)
        );

        app.handle_input(key(Key::Up));
        app.handle_input(key(Key::Char('h')));
        assert_eq!(*app.context().cursor(), start);
    }

    #[test]
    fn tab_switches_screens() {
        let mut app = app();
        app.handle_input(key(Key::Char('\t')));
        assert_eq!(app.context().tab, Tab::Admin);
        app.handle_input(key(Key::Char('d')));
        assert!(app.context().last_error_message.is_some());
    }
}
