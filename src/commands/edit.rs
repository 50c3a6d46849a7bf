use almanac_core::state::{Action, FormInput, FormOutcome, submit_form};
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::commands::args::{parse_color, parse_repeat, parse_time};

pub struct EditArgs {
    pub text: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub untimed: bool,
    pub all_day: Option<bool>,
    pub color: Option<String>,
    pub repeat: Option<String>,
}

pub fn run(app: &App, id: &str, args: EditArgs) -> Result<()> {
    let mut store = app.store();
    let (origin, event) = store.find_by_prefix(id)?;

    let state = app.state().apply(Action::OpenEdit {
        id: event.id.clone(),
        origin,
    });

    let (start_time, end_time) = if args.untimed {
        (None, None)
    } else {
        (
            args.start.as_deref().map(parse_time).transpose()?.or(event.start_time),
            args.end.as_deref().map(parse_time).transpose()?.or(event.end_time),
        )
    };

    let input = FormInput {
        text: args.text.unwrap_or_else(|| event.text.clone()),
        is_all_day: args.all_day.unwrap_or(event.is_all_day),
        start_time,
        end_time,
        color: args.color.as_deref().map(parse_color).transpose()?.unwrap_or(event.color),
        repeat: args.repeat.as_deref().map(parse_repeat).transpose()?.unwrap_or(event.repeat),
    };

    let (state, outcome) = submit_form(&mut store, state, input)?;
    app.save_state(&state)?;

    match outcome {
        FormOutcome::Updated(updated) => {
            println!("{}", format!("  Updated: {}", updated.text).green());
            let time = updated.time_label();
            if !time.is_empty() {
                println!("  {}", time.dimmed());
            }
        }
        FormOutcome::Ignored => println!("{}", "  Nothing changed: text is empty".yellow()),
        FormOutcome::Added(_) => {}
    }

    Ok(())
}
