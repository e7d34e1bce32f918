use std::fmt::Write;
use unsegen::base::*;
use unsegen::widget::*;

use crate::directory::communication_methods;
use crate::ui::Context;

pub struct AdminWindow<'a> {
    context: &'a Context,
}

impl<'a> AdminWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        AdminWindow { context }
    }
}

impl Widget for AdminWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(40),
            height: RowDemand::at_least(12),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let directory = self.context.directory();
        let mut cursor = Cursor::new(&mut window);

        cursor.set_style_modifier(theme.month_header_style);
        let _ = writeln!(&mut cursor, "Company Management\n");

        if directory.companies().is_empty() {
            cursor.set_style_modifier(theme.day_style);
            let _ = writeln!(
                &mut cursor,
                "No companies yet. Add one with :add name=...; location=...; email=...; phone=...; periodicity=..."
            );
        }

        for (idx, company) in directory.companies().iter().enumerate() {
            let style = if idx == self.context.company_index {
                theme.focus_day_style
            } else {
                theme.day_style
            };

            cursor.set_style_modifier(style);
            let _ = writeln!(
                &mut cursor,
                "{:>4}  {:<24} {:<20} every {} days",
                idx + 1,
                company.name,
                company.location,
                company.periodicity_days
            );
            cursor.set_style_modifier(theme.day_style);
            let _ = writeln!(
                &mut cursor,
                "       {}  {}  {}",
                company.emails.join(", "),
                company.phone_numbers.join(", "),
                company.linkedin_profile.as_deref().unwrap_or("")
            );
            if !company.comments.is_empty() {
                let _ = writeln!(&mut cursor, "       {}", company.comments);
            }
        }

        cursor.set_style_modifier(theme.month_header_style);
        let _ = writeln!(&mut cursor, "\nCommunication Methods\n");

        cursor.set_style_modifier(theme.day_style);
        for method in communication_methods() {
            let _ = writeln!(
                &mut cursor,
                "  {:<20} Sequence: {}{}",
                method.name,
                method.sequence,
                if method.mandatory { "  (mandatory)" } else { "" }
            );
        }
    }
}
