pub mod add;
pub mod args;
pub mod clock;
pub mod config;
pub mod delete;
pub mod edit;
pub mod holidays;
pub mod list;
pub mod navigate;
pub mod reschedule;
pub mod show;
pub mod theme;
