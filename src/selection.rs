use crate::event::CalendarEvent;

/// Which event, if any, is shown in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    NoSelection,
    EventSelected(CalendarEvent),
}

impl Selection {
    /// A day cell was activated. Only the first of its events is selected;
    /// a day without events leaves the selection untouched.
    pub fn select_day<'a, I>(&mut self, matched: I)
    where
        I: IntoIterator<Item = &'a CalendarEvent>,
    {
        if let Some(first) = matched.into_iter().next() {
            *self = Selection::EventSelected(first.clone());
        }
    }

    pub fn close(&mut self) {
        *self = Selection::NoSelection;
    }

    pub fn selected(&self) -> Option<&CalendarEvent> {
        match self {
            Selection::NoSelection => None,
            Selection::EventSelected(event) => Some(event),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Selection::EventSelected(_))
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::NoSelection
    }
}
