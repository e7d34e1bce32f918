mod admin_window;
pub mod app;
mod calendar_window;
mod command;
mod context;
mod detail_window;

pub use admin_window::AdminWindow;
pub use app::App;
pub use calendar_window::{grid_slots, month_sheet, MonthPane};
pub use command::{parse_assignments, run_command};
pub use context::{Context, Mode, Tab, Theme};
pub use detail_window::DetailWindow;
