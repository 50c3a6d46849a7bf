use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::app::App;

pub fn run(app: &App, id: &str, yes: bool) -> Result<()> {
    let mut store = app.store();
    let (origin, event) = store.find_by_prefix(id)?;

    if event.is_recurring() {
        println!(
            "{}",
            format!("  This deletes every {} repeat of \"{}\"", event.repeat, event.text).yellow()
        );
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("  Delete \"{}\" on {}?", event.text, origin))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "  Cancelled".dimmed());
            return Ok(());
        }
    }

    match store.remove_checked(&origin, &event.id)? {
        Some(removed) => println!("{}", format!("  Deleted: {}", removed.text).red()),
        None => println!("{}", "  Event was already gone".dimmed()),
    }

    Ok(())
}
