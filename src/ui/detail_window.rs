use std::fmt::Write;
use unsegen::base::*;
use unsegen::widget::*;

use crate::datetime::long_date;
use crate::ui::Context;

/// Detail of the selected event, or the events under the cursor when
/// nothing is selected.
pub struct DetailWindow<'a> {
    context: &'a Context,
}

impl<'a> DetailWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        DetailWindow { context }
    }
}

impl Widget for DetailWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(24),
            height: RowDemand::at_least(10),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let mut cursor = Cursor::new(&mut window).wrapping_mode(WrappingMode::Wrap);

        if let Some(event) = self.context.selection.selected() {
            cursor.set_style_modifier(theme.title_style);
            let _ = writeln!(&mut cursor, "Communication Details\n");

            let mut field = |label: &str, value: &str| {
                cursor.set_style_modifier(theme.title_style);
                let _ = writeln!(&mut cursor, "{}", label);
                cursor.set_style_modifier(theme.day_style);
                let _ = writeln!(&mut cursor, "{}\n", value);
            };

            field("Company", event.company_name());
            field("Type", event.category());
            field("Date", &long_date(event.date()));
            if let Some(note) = event.note() {
                field("Notes", note);
            }
            return;
        }

        cursor.set_style_modifier(theme.title_style);
        let _ = writeln!(&mut cursor, "{}\n", long_date(self.context.cursor()));
        cursor.set_style_modifier(theme.day_style);

        let mut any = false;
        for event in self.context.agenda().events_of_day(self.context.cursor()) {
            any = true;
            let style = if event.is_email() {
                theme.email_event_style
            } else {
                theme.other_event_style
            };
            cursor.set_style_modifier(style);
            let _ = writeln!(&mut cursor, "{}", event);
        }

        if !any {
            let _ = writeln!(&mut cursor, "No communications");
        }
    }
}
