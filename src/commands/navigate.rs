//! Commands that only move the view around.

use almanac_core::date::{parse_iso_key, parse_month};
use almanac_core::state::{Action, View};
use anyhow::{Result, anyhow};

use crate::app::App;
use crate::commands::show::print_state;

fn dispatch_and_show(app: &App, action: Action) -> Result<()> {
    let state = app.dispatch(action)?;
    print_state(app, &state);
    Ok(())
}

pub fn view(app: &App, view: &str) -> Result<()> {
    let view: View = view.parse().map_err(|e: String| anyhow!(e))?;
    dispatch_and_show(app, Action::SetView(view))
}

pub fn prev(app: &App) -> Result<()> {
    dispatch_and_show(app, Action::Prev)
}

pub fn next(app: &App) -> Result<()> {
    dispatch_and_show(app, Action::Next)
}

pub fn today(app: &App) -> Result<()> {
    dispatch_and_show(app, Action::Today(app.today))
}

pub fn jump(app: &App, month: &str) -> Result<()> {
    dispatch_and_show(app, Action::JumpToMonth(parse_month(month)?))
}

pub fn goto(app: &App, date: &str) -> Result<()> {
    dispatch_and_show(app, Action::GoTo(parse_iso_key(date)?))
}

/// Select a day. From the year view this opens the day, like clicking it.
pub fn select(app: &App, date: &str) -> Result<()> {
    let date = parse_iso_key(date)?;
    let action = if app.state().view == View::Year {
        Action::PickYearDay(date)
    } else {
        Action::SelectDate(date)
    };
    dispatch_and_show(app, action)
}
