use almanac_core::settings::Theme;
use anyhow::{Result, anyhow};
use owo_colors::OwoColorize;

use crate::app::App;

pub fn run(app: &App, mode: Option<&str>) -> Result<()> {
    let mut settings = app.settings();

    let theme = match mode {
        None => {
            println!("  {}", settings.theme().label());
            return Ok(());
        }
        Some("toggle") => settings.toggle_theme()?,
        Some(name) => {
            let theme: Theme = name.parse().map_err(|e: String| anyhow!(e))?;
            settings.set_theme(theme)?;
            theme
        }
    };

    println!("{}", format!("  Switched to {}", theme.label()).green());
    Ok(())
}
