use almanac_core::config::AlmanacConfig;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;

pub fn run(app: &App) -> Result<()> {
    let config_path = AlmanacConfig::config_path()?;
    let settings = app.settings();

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", app.storage.dir().display());

    println!();
    println!("{}", "Settings".bold());
    print!("{}", indent(&app.config.to_toml()?));

    println!();
    println!("{}", "Preferences".bold());
    println!("  Theme:         {}", settings.theme().label());
    let years: Vec<String> = settings.synced_years().iter().map(|y| y.to_string()).collect();
    if years.is_empty() {
        println!("  Synced years:  {}", "none".dimmed());
    } else {
        println!("  Synced years:  {}", years.join(", "));
    }

    Ok(())
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("  {}\n", l)).collect()
}
