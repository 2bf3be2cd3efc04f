use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use gpa_bro::records::Term;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TermArg {
    /// Finished course, grade locked in
    Past,
    /// In-progress course, candidate for pass/fail
    Current,
}

impl From<TermArg> for Term {
    fn from(arg: TermArg) -> Self {
        match arg {
            TermArg::Past => Term::Past,
            TermArg::Current => Term::Current,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List courses with grades and lift
    List {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Add a course
    Add {
        /// Which term the course belongs to
        #[arg(value_enum)]
        term: TermArg,
        /// Course name
        name: String,
        /// Grade, 0-100
        grade: f64,
        /// Credit weight, non-negative
        credits: f64,
    },
    /// Remove a course by its index number
    Rm {
        /// Index number of the course to remove (1-based, as shown in list)
        index: usize,
    },
    /// Show the overall, past and current weighted averages
    Avg,
    /// Find the pass/fail conversions that maximize the average
    Plan {
        /// Max conversions allowed (defaults to the configured pass_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Interactive wizard to create a config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "gpa-bro")]
#[command(about = "Weighted grade tracker with a pass/fail optimizer", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gpa-bro/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Launch the TUI when no subcommand is given
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Init runs before any data is loaded
    if let Some(Commands::Init) = cli.command {
        if let Err(e) = gpa_bro::config::run_init_wizard(cli.config.map(PathBuf::from)) {
            eprintln!("Init error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match gpa_bro::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let ledger_path = config
        .courses_path
        .clone()
        .unwrap_or_else(gpa_bro::records::get_ledger_path);

    if cli.verbose {
        eprintln!("Course file: {}", ledger_path.display());
        eprintln!("Pass/fail limit: {}", config.pass_limit);
    }

    // Load the course ledger
    let mut ledger = match gpa_bro::records::load_ledger(&ledger_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Course file error: {}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} courses in {:?}",
            ledger.len(),
            start_time.elapsed()
        );
    }

    match cli.command {
        None => {
            let app = gpa_bro::tui::App::new(ledger, ledger_path, config);
            if let Err(e) = gpa_bro::tui::run_tui(app).await {
                eprintln!("TUI error: {}", e);
                std::process::exit(EXIT_DATA);
            }
        }
        Some(Commands::List { tsv }) => {
            let rows = gpa_bro::output::score_courses(&ledger.courses);
            if tsv {
                let output = gpa_bro::output::format_tsv(&rows);
                if !output.is_empty() {
                    println!("{}", output);
                }
            } else {
                let use_colors = gpa_bro::output::should_use_colors();
                println!(
                    "{}",
                    gpa_bro::output::format_course_table(&rows, use_colors)
                );
            }
        }
        Some(Commands::Add {
            term,
            name,
            grade,
            credits,
        }) => {
            if credits < 0.0 {
                eprintln!("Invalid credits {}: must be non-negative.", credits);
                std::process::exit(EXIT_CONFIG);
            }
            ledger.add_course(name.clone(), grade, credits, term.into());
            if let Err(e) = gpa_bro::records::save_ledger(&ledger_path, &ledger) {
                eprintln!("Failed to save courses: {}", e);
                std::process::exit(EXIT_DATA);
            }
            println!(
                "Added: {} (grade {}, {} credits, {})",
                name,
                gpa_bro::output::format_grade(grade),
                gpa_bro::output::format_grade(credits),
                Term::from(term).label()
            );
        }
        Some(Commands::Rm { index }) => {
            // Validate index bounds (1-based, matches `list` numbering)
            if index < 1 || index > ledger.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    ledger.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let id = ledger.courses[index - 1].id;
            let removed = match ledger.remove_course(id) {
                Some((course, _)) => course,
                None => {
                    eprintln!("Course at index {} disappeared.", index);
                    std::process::exit(EXIT_DATA);
                }
            };
            if let Err(e) = gpa_bro::records::save_ledger(&ledger_path, &ledger) {
                eprintln!("Failed to save courses: {}", e);
                std::process::exit(EXIT_DATA);
            }
            println!("Removed: {}", removed.name);
        }
        Some(Commands::Avg) => {
            let use_colors = gpa_bro::output::should_use_colors();
            println!(
                "{}",
                gpa_bro::output::format_average_summary(&ledger.courses, use_colors)
            );
        }
        Some(Commands::Plan { limit }) => {
            let limit = limit.unwrap_or(config.pass_limit);
            let past = ledger.term_courses(Term::Past);
            let current = ledger.term_courses(Term::Current);

            if cli.verbose {
                let eligible = current
                    .iter()
                    .filter(|c| c.grade >= gpa_bro::scoring::PASS_ELIGIBLE_MIN)
                    .count();
                eprintln!(
                    "{} past, {} current ({} eligible), limit {}",
                    past.len(),
                    current.len(),
                    eligible,
                    limit
                );
            }

            let plan = gpa_bro::scoring::best_pass_plan(&past, &current, limit);

            if cli.verbose {
                eprintln!("Search finished in {:?}", start_time.elapsed());
            }

            let use_colors = gpa_bro::output::should_use_colors();
            println!("{}", gpa_bro::output::format_plan(&plan, use_colors));
        }
        Some(Commands::Init) => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}
