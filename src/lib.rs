pub mod agenda;
pub mod config;
pub mod datetime;
pub mod directory;
pub mod error;
pub mod event;
pub mod events;
pub mod selection;
pub mod ui;
