use almanac_core::holidays::{NagerClient, finalize_holidays, sync_holidays};
use anyhow::Result;
use chrono::Datelike;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::utils::tui;

pub async fn sync(app: &App, year: Option<i32>, force: bool) -> Result<()> {
    let year = year.unwrap_or_else(|| app.state().visible_month.year());
    let holidays = &app.config.holidays;

    let client = NagerClient::new(&holidays.base_url, &holidays.country)?;
    let mut store = app.store();
    let mut settings = app.settings();

    let spinner = tui::create_spinner(format!("Fetching {} holidays for {}", holidays.country, year));
    let result = sync_holidays(&mut store, &mut settings, &client, year, force).await;
    spinner.finish_and_clear();

    let report = result?;

    if report.already_synced {
        println!(
            "{}",
            format!("  Holidays for {} are already synced. Use --force to import again.", year).dimmed()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("  Synced holidays for {}: {} added, {} already present", year, report.added, report.skipped)
            .green()
    );
    Ok(())
}

pub fn cleanup(app: &App) -> Result<()> {
    let mut store = app.store();
    let report = finalize_holidays(&mut store)?;

    if !report.changed() {
        println!("{}", "  Holidays are already clean".dimmed());
        return Ok(());
    }

    println!("{}", "  Cleanup complete".green());
    println!("  Removed: {} duplicate holiday(s)", report.duplicates_removed);
    println!("  Recolored: {} holiday(s)", report.recolored);
    Ok(())
}
