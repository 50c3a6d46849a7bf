mod app;
mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::App;

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "A calendar for your terminal with recurring events and Hijri dates")]
struct Cli {
    /// Store events and preferences here instead of the configured data_dir
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the current view
    Show,
    /// Switch to the month, week, day or year view
    View { view: String },
    /// Go back one month, week, day or year
    Prev,
    /// Go forward one month, week, day or year
    Next,
    /// Jump back to today
    Today,
    /// Show a month without changing the selected day (YYYY-MM)
    Jump { month: String },
    /// Go to a date and select it (YYYY-MM-DD)
    Goto { date: String },
    /// Select a date in the visible month (YYYY-MM-DD)
    Select { date: String },
    /// List the events of a day (defaults to the selected day)
    List { date: Option<String> },
    /// Add an event to the selected day
    Add {
        text: Option<String>,

        /// Date to add to (YYYY-MM-DD), selected day if omitted
        #[arg(short, long)]
        date: Option<String>,

        /// Start time (HH:MM)
        #[arg(short, long)]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Length instead of an end time (e.g. "45m", "1h 30m")
        #[arg(long = "for", value_name = "DURATION")]
        duration: Option<String>,

        #[arg(long)]
        all_day: bool,

        /// default, red, orange, yellow, green, blue, purple or gray
        #[arg(short, long)]
        color: Option<String>,

        /// none, daily, weekly, monthly or yearly
        #[arg(short, long)]
        repeat: Option<String>,
    },
    /// Edit an event by id (a unique prefix is enough)
    Edit {
        id: String,

        #[arg(short, long)]
        text: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        /// Remove the start and end times
        #[arg(long, conflicts_with_all = ["start", "end"])]
        untimed: bool,

        #[arg(long, conflicts_with = "timed")]
        all_day: bool,

        /// Turn an all-day event back into a timed one
        #[arg(long)]
        timed: bool,

        #[arg(short, long)]
        color: Option<String>,

        #[arg(short, long)]
        repeat: Option<String>,
    },
    /// Delete an event by id
    Delete {
        id: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move an event to another day or half-hour slot
    Move {
        id: String,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Target slot (HH:MM), snapped to the half hour
        #[arg(long, conflicts_with = "at_fraction")]
        at: Option<String>,

        /// Target slot as a position down the day column (0.0 midnight, 1.0 end of day)
        #[arg(long)]
        at_fraction: Option<f32>,
    },
    /// Import public holidays for a year (defaults to the visible year)
    SyncHolidays {
        year: Option<i32>,

        /// Import again even if the year was synced before
        #[arg(short, long)]
        force: bool,
    },
    /// Remove duplicate holidays and color them red
    CleanupHolidays,
    /// Show or change the theme (light, dark or toggle)
    Theme { mode: Option<String> },
    /// Print a ticking clock
    Clock {
        /// Stop after this many ticks
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Time between ticks
        #[arg(long, default_value = "1s")]
        every: String,
    },
    /// Show configuration paths and values
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let app = App::load(cli.data_dir)?;

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => commands::show::run(&app),
        Commands::View { view } => commands::navigate::view(&app, &view),
        Commands::Prev => commands::navigate::prev(&app),
        Commands::Next => commands::navigate::next(&app),
        Commands::Today => commands::navigate::today(&app),
        Commands::Jump { month } => commands::navigate::jump(&app, &month),
        Commands::Goto { date } => commands::navigate::goto(&app, &date),
        Commands::Select { date } => commands::navigate::select(&app, &date),
        Commands::List { date } => commands::list::run(&app, date.as_deref()),
        Commands::Add {
            text,
            date,
            start,
            end,
            duration,
            all_day,
            color,
            repeat,
        } => commands::add::run(
            &app,
            commands::add::AddArgs {
                text,
                date,
                start,
                end,
                duration,
                all_day,
                color,
                repeat,
            },
        ),
        Commands::Edit {
            id,
            text,
            start,
            end,
            untimed,
            all_day,
            timed,
            color,
            repeat,
        } => commands::edit::run(
            &app,
            &id,
            commands::edit::EditArgs {
                text,
                start,
                end,
                untimed,
                all_day: if all_day {
                    Some(true)
                } else if timed {
                    Some(false)
                } else {
                    None
                },
                color,
                repeat,
            },
        ),
        Commands::Delete { id, yes } => commands::delete::run(&app, &id, yes),
        Commands::Move { id, to, at, at_fraction } => {
            let slot = commands::reschedule::Slot::from_args(at.as_deref(), at_fraction);
            commands::reschedule::run(&app, &id, &to, slot)
        }
        Commands::SyncHolidays { year, force } => commands::holidays::sync(&app, year, force).await,
        Commands::CleanupHolidays => commands::holidays::cleanup(&app),
        Commands::Theme { mode } => commands::theme::run(&app, mode.as_deref()),
        Commands::Clock { ticks, every } => commands::clock::run(&app, ticks, &every).await,
        Commands::Config => commands::config::run(&app),
    }
}
