use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use grind::session::Session;
use grind::store::JsonStore;
use grind::traits::{Confidence, GrindError, Problem, Status, Store};

/// Spaced repetition for practice problems.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Problem collection file.
    #[arg(long, default_value = "problems.json")]
    file: PathBuf,

    /// Problems to rate before the session offers to stop.
    #[arg(long, default_value_t = 2)]
    minimum: usize,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an interactive practice session (the default).
    Run,

    /// Create the collection file from a list of problem titles.
    Seed {
        /// Text file with one problem title per line.
        titles: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), GrindError> {
    let mut store = JsonStore::new(&cli.file);
    match cli.command {
        Some(Command::Seed { titles }) => seed(&mut store, &titles),
        Some(Command::Run) | None => practice(&mut store, cli.minimum),
    }
}

fn seed(store: &mut JsonStore, titles: &Path) -> Result<(), GrindError> {
    let text = std::fs::read_to_string(titles).map_err(|source| GrindError::File {
        path: titles.to_owned(),
        source,
    })?;
    let problems: Vec<Problem> = text
        .lines()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(Problem::new)
        .collect();
    store.save(&problems)?;
    println!(
        "Created {} with {} problems",
        store.path().display(),
        problems.len()
    );
    Ok(())
}

fn practice(store: &mut JsonStore, minimum: usize) -> Result<(), GrindError> {
    let problems = store.load()?;
    let today = Local::now().date_naive();

    println!("Today: {today}");
    println!("Starting session (minimum {minimum} problems)");

    let mut session = Session::new(problems, today);
    loop {
        let Some(selection) = session.select() else {
            println!("\nNo more problems available today.");
            break;
        };

        let problem = session.problem(selection);
        println!("\nProblem: {} [{}]", problem.name, attempt_label(problem));
        if !problem.notes.is_empty() {
            println!("Notes: {}", problem.notes);
        }

        // Re-prompt until a valid rating lands; notes can be taken meanwhile.
        loop {
            let input = prompt("Rate your attempt ([r]ed, [y]ellow, [g]reen, [n]ote): ")?;
            if input == "n" {
                let note = prompt("Note: ")?;
                session.append_note(selection, &note);
                continue;
            }
            match input.parse::<Confidence>() {
                Ok(rating) => {
                    session.rate(selection, rating);
                    break;
                }
                Err(e) => println!("{e}"),
            }
        }

        if session.rated_count() < minimum {
            continue;
        }
        if prompt("Another problem? (y/n): ")? != "y" {
            break;
        }
    }

    store.save(&session.into_problems())?;
    println!("\nSession saved.");
    Ok(())
}

fn attempt_label(problem: &Problem) -> String {
    match (problem.status, problem.confidence) {
        (Status::New, _) => "new".to_owned(),
        (_, Some(confidence)) => format!("review ({})", confidence.label()),
        (_, None) => "review".to_owned(),
    }
}

fn prompt(message: &str) -> Result<String, GrindError> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        // Stdin closed under us; bail instead of re-prompting forever.
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    Ok(line.trim().to_lowercase())
}
