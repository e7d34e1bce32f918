use unsegen::input::*;

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, rest},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};

use super::context::{Context, Mode, Tab};
use crate::datetime::{parse_calendar_date, MonthIndex};
use crate::error::{Error, ErrorKind, Result};

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

const COMMANDS: &[(&str, Action)] = &[
    ("next", Action::Repeatable(next_month)),
    ("n", Action::Repeatable(next_month)),
    ("prev", Action::Repeatable(prev_month)),
    ("p", Action::Repeatable(prev_month)),
    ("today", Action::NoArg(today)),
    ("goto", Action::Arg(goto)),
    ("close", Action::NoArg(close)),
    ("calendar", Action::NoArg(show_calendar)),
    ("admin", Action::NoArg(show_admin)),
    ("add", Action::Arg(add_company)),
    ("edit", Action::Arg(edit_company)),
    ("delete", Action::Arg(delete_company)),
    ("del", Action::Arg(delete_company)),
    ("q", Action::NoArg(quit)),
    ("quit", Action::NoArg(quit)),
];

fn next_month(c: &mut Context, n: u32) -> ActionResult {
    c.next_month(n);
    Ok(())
}

fn prev_month(c: &mut Context, n: u32) -> ActionResult {
    c.prev_month(n);
    Ok(())
}

fn today(c: &mut Context) -> ActionResult {
    c.goto_today();
    Ok(())
}

fn goto(c: &mut Context, arg: &str) -> ActionResult {
    let first = parse_calendar_date(&format!("{}-01", arg.trim()))
        .map_err(|_| Error::new(ErrorKind::CommandParse, "expected a month as YYYY-MM"))?;
    c.goto_month(MonthIndex::from(first));
    Ok(())
}

fn close(c: &mut Context) -> ActionResult {
    c.close_detail();
    Ok(())
}

fn show_calendar(c: &mut Context) -> ActionResult {
    c.tab = Tab::Calendar;
    Ok(())
}

fn show_admin(c: &mut Context) -> ActionResult {
    c.tab = Tab::Admin;
    Ok(())
}

fn add_company(c: &mut Context, arg: &str) -> ActionResult {
    let assignments = parse_assignments(arg)?;
    c.add_company(&assignments)?;
    c.tab = Tab::Admin;
    Ok(())
}

fn edit_company(c: &mut Context, arg: &str) -> ActionResult {
    let (_, (number, assignments)) = all_consuming(separated_pair(
        map_res(digit1, |s: &str| s.parse::<usize>()),
        space1,
        rest,
    ))(arg.trim())
    .map_err(|_: nom::Err<nom::error::Error<&str>>| {
        Error::new(ErrorKind::CommandParse, "usage: edit N key=value; ...")
    })?;

    let assignments = parse_assignments(assignments)?;
    c.edit_company(number, &assignments)
}

fn delete_company(c: &mut Context, arg: &str) -> ActionResult {
    let number = arg
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::new(ErrorKind::CommandParse, "usage: delete N"))?;
    c.delete_company(number)
}

fn quit(c: &mut Context) -> ActionResult {
    c.quit = true;
    Ok(())
}

fn assignment(input: &str) -> IResult<&str, (String, String)> {
    map(
        separated_pair(
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            delimited(space0, char('='), space0),
            take_while(|c: char| c != ';'),
        ),
        |(key, value): (&str, &str)| (key.to_owned(), value.trim().to_owned()),
    )(input)
}

/// Parses `key=value; key=value` lists. A trailing `;` is allowed.
pub fn parse_assignments(input: &str) -> Result<Vec<(String, String)>> {
    let (_, assignments) = all_consuming(delimited(
        space0,
        separated_list1(tuple((space0, char(';'), space0)), assignment),
        tuple((space0, opt(char(';')), space0)),
    ))(input)
    .map_err(|_| {
        Error::new(
            ErrorKind::CommandParse,
            &format!("expected 'key=value; ...' but got '{}'", input),
        )
    })?;

    Ok(assignments)
}

fn command_line(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    all_consuming(delimited(
        space0,
        pair(
            take_while1(|c: char| c.is_ascii_alphabetic()),
            opt(preceded(space1, rest)),
        ),
        space0,
    ))(input)
}

pub fn run_command(context: &mut Context, cmd: &str) -> ActionResult {
    let (_, (name, arg)) = command_line(cmd)?;
    let arg = arg.map(str::trim).filter(|a| !a.is_empty());

    let (_, act) = COMMANDS
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| Error::new(ErrorKind::CommandParse, &format!("unknown command '{}'", name)))?;

    log::debug!("Running command '{}'", cmd);

    match (act, arg) {
        (Action::NoArg(a), None) => a(context),
        (Action::Repeatable(a), None) => a(context, 1),
        (Action::Repeatable(a), Some(count)) => {
            let count = count.parse::<u32>().map_err(|_| {
                Error::new(ErrorKind::CommandParse, &format!("'{}' is not a count", count))
            })?;
            a(context, count)
        }
        (Action::Arg(a), Some(arg)) => a(context, arg),
        (Action::Arg(_), None) => Err(Error::new(
            ErrorKind::CommandParse,
            &format!("'{}' needs an argument", name),
        )),
        (Action::NoArg(_), Some(_)) => Err(Error::new(
            ErrorKind::CommandParse,
            &format!("'{}' takes no argument", name),
        )),
    }
}

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    fn report_error(&mut self, error: Error) {
        log::info!("Command failed: {}", error);
        self.context.last_error_message = Some(format!("{}", error));
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(Key::Char('\n')) = input.event {
            let cmd = self.context.input_sink_mut().finish_line().to_owned();
            self.context.mode = Mode::Normal;
            match run_command(self.context, &cmd) {
                Ok(()) => self.context.last_error_message = None,
                Err(e) => self.report_error(e),
            }
            None
        } else {
            Some(input)
        }
    }
}
