use anyhow::Context;
use clap::Parser;
use tracing::info;

use coursecal::{filter, timetable, utils, TimetableError, WeeklyIndex};

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Meeting times, i.e.: "CPSC 210 L1A lab tue,thu 12h00-13h00"
    #[clap(value_parser, required = true, value_name = "MEETING")]
    meetings: Vec<String>,

    /// Keep every course and section, without asking
    #[clap(short, long)]
    all: bool,

    /// Show debug logs
    #[clap(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[clap(short, long)]
    quiet: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("coursecal error: {error:#}");

        // Bad meetings are the user's to fix, exit like clap does on bad arguments
        let input = error
            .downcast_ref::<TimetableError>()
            .is_some_and(TimetableError::is_input_error);
        if input {
            eprintln!("meetings are written `DEPT NUMBER SECTION KIND DAYS START-END`");
            std::process::exit(2);
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.quiet, args.verbose)?;

    let meetings = args
        .meetings
        .iter()
        .map(|line| utils::parse_meeting(line))
        .collect::<coursecal::Result<Vec<_>>>()
        .context("can't read the meetings")?;

    let mut courses =
        utils::courses_from_meetings(meetings).context("can't group the meetings")?;
    info!(courses = courses.len(), "Meetings read");

    if !args.all {
        courses = filter::timetable(courses).context("selection cancelled")?;
    }

    let mut index = WeeklyIndex::new();
    for course in &courses {
        index.register(course);
    }
    info!(entries = index.len(), "Timetable built");

    timetable::display(&index);

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("COURSECAL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
