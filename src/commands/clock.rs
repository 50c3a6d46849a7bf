use almanac_core::clock::{clock_string, parse_timezone};
use anyhow::{Context, Result, bail};
use chrono::Utc;

use crate::app::App;

pub async fn run(app: &App, ticks: Option<u64>, every: &str) -> Result<()> {
    let tz = parse_timezone(&app.config.clock_timezone)?;
    let label = &app.config.clock_label;

    let period = humantime::parse_duration(every)
        .with_context(|| format!("Could not parse duration: \"{}\"", every))?;
    if period.is_zero() {
        bail!("Tick interval must be longer than zero");
    }

    let mut interval = tokio::time::interval(period);
    let mut printed = 0;

    loop {
        interval.tick().await;
        println!("{}", clock_string(Utc::now(), tz, label));

        printed += 1;
        if ticks.is_some_and(|limit| printed >= limit) {
            return Ok(());
        }
    }
}
