use almanac_core::date::{day_title, parse_iso_key};
use almanac_core::event::{EventColor, TimeOfDay};
use almanac_core::state::{Action, FormInput, FormOutcome, submit_form};
use anyhow::Result;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::commands::args::{end_after, parse_color, parse_repeat, parse_time};

pub struct AddArgs {
    pub text: Option<String>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub all_day: bool,
    pub color: Option<String>,
    pub repeat: Option<String>,
}

pub fn run(app: &App, args: AddArgs) -> Result<()> {
    let interactive = args.text.is_none();

    let mut state = app.state();
    if let Some(date) = &args.date {
        state = state.apply(Action::SelectDate(parse_iso_key(date)?));
    }

    let start_time = args.start.as_deref().map(parse_time).transpose()?;
    state = state.apply(Action::OpenAdd { preset: start_time });

    if interactive {
        println!("{}", format!("  New event on {}", day_title(state.selected_date)).dimmed());
    }

    let text = match args.text {
        Some(t) => t,
        None => Input::<String>::new().with_prompt("  Text").interact_text()?,
    };

    let start_time = match start_time {
        Some(t) => Some(t),
        None if interactive && !args.all_day => prompt_optional_time("  Start (HH:MM, skip)")?,
        None => None,
    };

    let end_time = match (args.end, args.duration, start_time) {
        (Some(end), _, _) => Some(parse_time(&end)?),
        (None, Some(duration), Some(start)) => Some(end_after(start, &duration)?),
        (None, Some(_), None) => anyhow::bail!("--for needs a start time"),
        (None, None, Some(_)) if interactive => prompt_optional_time("  End (HH:MM, skip)")?,
        _ => None,
    };

    let color = match args.color {
        Some(c) => parse_color(&c)?,
        None if interactive => prompt_color()?,
        None => EventColor::Default,
    };

    let repeat = match args.repeat {
        Some(r) => parse_repeat(&r)?,
        None => Default::default(),
    };

    let input = FormInput {
        text,
        is_all_day: args.all_day,
        start_time,
        end_time,
        color,
        repeat,
    };

    let mut store = app.store();
    let (state, outcome) = submit_form(&mut store, state, input)?;
    app.save_state(&state)?;

    match outcome {
        FormOutcome::Added(event) => {
            if interactive {
                println!();
            }
            println!(
                "{}",
                format!("  Added: {} on {}", event.text, day_title(state.selected_date)).green()
            );
        }
        FormOutcome::Ignored => println!("{}", "  Nothing added: text is empty".yellow()),
        FormOutcome::Updated(_) => {}
    }

    Ok(())
}

/// Prompt for an HH:MM time, retrying on parse errors. Empty input skips.
fn prompt_optional_time(prompt: &str) -> Result<Option<TimeOfDay>> {
    loop {
        let input: String = Input::new()
            .with_prompt(prompt)
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.trim().is_empty() {
            return Ok(None);
        }
        match parse_time(&input) {
            Ok(time) => return Ok(Some(time)),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

fn prompt_color() -> Result<EventColor> {
    let items: Vec<&str> = EventColor::ALL.iter().map(|c| c.as_str()).collect();
    let selection = Select::new()
        .with_prompt("  Color")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(EventColor::ALL[selection])
}
