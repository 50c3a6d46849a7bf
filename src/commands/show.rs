use almanac_core::state::{AppState, View};
use almanac_core::view::{self, day_timeline, month_grid, week_timeline, year_overview};
use anyhow::Result;
use chrono::Datelike;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::{Render, Style};

pub fn run(app: &App) -> Result<()> {
    print_state(app, &app.state());
    Ok(())
}

/// Print the header and body of whatever view `state` is on.
pub fn print_state(app: &App, state: &AppState) {
    let all = app.store().load_all();
    let style = Style {
        theme: app.settings().theme(),
        today: app.today,
    };

    println!("{}  {}", view::title(state).bold(), format!("[{}]", state.view).dimmed());
    println!();

    let body = match state.view {
        View::Month => month_grid(&all, state.visible_month, state.selected_date, app.today).render(&style),
        View::Week => week_timeline(&all, state.selected_date).render(&style),
        View::Day => day_timeline(&all, state.selected_date).render(&style),
        View::Year => year_overview(&all, state.visible_month.year()).render(&style),
    };
    println!("{}", body);
}
