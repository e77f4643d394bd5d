use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod courses;
mod error;
mod gpa;
mod grading;
mod history;
mod models;
mod report;

use crate::error::CalcError;
use crate::history::HistoryStore;
use crate::models::{Course, CourseUpdate, GradingSystem, TargetInput};

#[derive(Parser)]
#[command(name = "gpa-calc")]
#[command(about = "Weighted GPA calculator with history and target planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Grading scale used to read grade symbols
    #[arg(
        long,
        global = true,
        value_enum,
        env = "GPA_GRADING_SYSTEM",
        default_value_t = GradingSystem::Turkish
    )]
    system: GradingSystem,

    /// Directory holding the calculation history file
    #[arg(long, global = true, env = "GPA_HISTORY_DIR", default_value = ".")]
    history_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the grade symbols of a scale
    Grades {
        /// Show every scale
        #[arg(long)]
        all: bool,
    },
    /// Print a blank course sheet to fill in
    Template {
        #[arg(long, default_value_t = grading::DEFAULT_COURSE_COUNT)]
        count: usize,
    },
    /// Average one term of courses
    #[command(group(
        ArgGroup::new("input")
            .args(["courses", "csv"])
            .required(true)
    ))]
    Semester {
        /// Course as GRADE:CREDIT[:NAME], repeatable
        #[arg(long = "course")]
        courses: Vec<String>,
        /// Course sheet with a name,credit,grade header
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        no_save: bool,
    },
    /// Fold a new term into a previous standing
    #[command(group(
        ArgGroup::new("input")
            .args(["courses", "csv"])
            .required(true)
    ))]
    Cumulative {
        #[arg(long)]
        prev_gpa: f64,
        #[arg(long)]
        prev_credits: f64,
        #[arg(long = "course")]
        courses: Vec<String>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        no_save: bool,
    },
    /// Average needed on new credits to reach a target GPA
    Target {
        #[arg(long)]
        current_gpa: f64,
        #[arg(long)]
        current_credits: f64,
        #[arg(long)]
        target_gpa: f64,
        #[arg(long)]
        new_credits: f64,
    },
    /// Convert a 4.0-scale GPA to the 100-point scale
    Convert { gpa: f64 },
    /// Inspect and manage saved calculations
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// One line per saved calculation, newest first
    List,
    /// Full breakdown of one calculation
    Show { index: usize },
    /// Change one course of a saved calculation and recompute it
    #[command(group(
        ArgGroup::new("change")
            .args(["grade", "credit", "name"])
            .required(true)
            .multiple(true)
    ))]
    Edit {
        index: usize,
        #[arg(long)]
        course: usize,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        credit: Option<f64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        no_save: bool,
    },
    /// Delete one calculation
    Remove { index: usize },
    /// Delete every calculation
    Clear,
    /// Write the history to a dated JSON file
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Merge an exported JSON file into the history
    Import { file: PathBuf },
    /// Generate a markdown summary
    Report {
        #[arg(long, default_value = "history.md")]
        out: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_courses(
    entries: &[String],
    csv: Option<&PathBuf>,
    system: GradingSystem,
) -> anyhow::Result<Vec<Course>> {
    match csv {
        Some(path) => courses::read_csv(path, system),
        None => Ok(courses::parse_courses(entries, system)?),
    }
}

fn edit_updates(
    grade: Option<String>,
    credit: Option<f64>,
    name: Option<String>,
    system: GradingSystem,
) -> Result<Vec<CourseUpdate>, CalcError> {
    let mut updates = Vec::new();
    if let Some(grade) = grade {
        if grading::lookup_point(&grade, system).is_none() {
            return Err(CalcError::UnknownGrade {
                symbol: grade,
                system,
            });
        }
        updates.push(CourseUpdate::Grade(grade));
    }
    if let Some(credit) = credit {
        if !grading::is_allowed_credit(credit) {
            return Err(CalcError::InvalidCredit(credit));
        }
        updates.push(CourseUpdate::Credit(credit));
    }
    if let Some(name) = name {
        updates.push(CourseUpdate::Name(name));
    }
    Ok(updates)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let system = cli.system;
    let store = HistoryStore::in_dir(&cli.history_dir);
    tracing::debug!(path = %store.path().display(), %system, "starting");

    match cli.command {
        Commands::Grades { all } => {
            let systems: &[GradingSystem] = if all {
                &grading::GRADING_SYSTEMS
            } else {
                std::slice::from_ref(&system)
            };
            for system in systems {
                println!(
                    "{system} ({:.1} to {:.1}):",
                    grading::min_point(*system),
                    grading::max_point(*system)
                );
                for option in grading::grades_for(*system) {
                    println!("  {:<3} {:.2}", option.label, option.point);
                }
            }
            let credits: Vec<String> =
                grading::allowed_credits().map(|credit| credit.to_string()).collect();
            println!("Credits: {}", credits.join(", "));
        }
        Commands::Template { count } => {
            #[derive(serde::Serialize)]
            struct CsvRow<'a> {
                name: &'a str,
                credit: f64,
                grade: &'a str,
            }

            let mut rows = Vec::new();
            grading::resize_courses(&mut rows, count, system);
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for course in &rows {
                writer.serialize(CsvRow {
                    name: &course.name,
                    credit: course.credit,
                    grade: &course.grade,
                })?;
            }
            writer.flush()?;
        }
        Commands::Semester {
            courses,
            csv,
            no_save,
        } => {
            let courses = load_courses(&courses, csv.as_ref(), system)?;
            let result = gpa::semester_result(courses, system);
            print!("{}", report::render_result(&result, system));
            if !no_save {
                store.save(history::entry_for(result, system, chrono::Utc::now()))?;
            }
        }
        Commands::Cumulative {
            prev_gpa,
            prev_credits,
            courses,
            csv,
            no_save,
        } => {
            gpa::validate_previous(prev_gpa, prev_credits)?;
            let courses = load_courses(&courses, csv.as_ref(), system)?;
            let result = gpa::cumulative_result(prev_gpa, prev_credits, courses, system);
            print!("{}", report::render_result(&result, system));
            if !no_save {
                store.save(history::entry_for(result, system, chrono::Utc::now()))?;
            }
        }
        Commands::Target {
            current_gpa,
            current_credits,
            target_gpa,
            new_credits,
        } => {
            let input = TargetInput {
                current_gpa,
                current_credits,
                target_gpa,
                new_credits,
            };
            input.validate()?;
            let outcome = gpa::required_gpa(&input);
            print!("{}", report::render_target(&input, &outcome));
        }
        Commands::Convert { gpa: value } => {
            println!("{:.2}", gpa::to_100_scale(value));
        }
        Commands::History { action } => match action {
            HistoryCommand::List => {
                let entries = store.load();
                if entries.is_empty() {
                    println!("No calculations saved yet.");
                    return Ok(());
                }
                for (index, entry) in entries.iter().enumerate() {
                    println!("{}", report::history_line(index, entry));
                }
            }
            HistoryCommand::Show { index } => {
                let entry = store.get(index)?;
                print!("{}", report::render_result(&entry.result, entry.grading_system));
            }
            HistoryCommand::Edit {
                index,
                course,
                grade,
                credit,
                name,
                no_save,
            } => {
                let entry = store.get(index)?;
                let updates = edit_updates(grade, credit, name, entry.grading_system)?;
                let result = if no_save {
                    history::edited_result(&entry, index, course, updates)?
                } else {
                    store.edit(index, course, updates, chrono::Utc::now())?.result
                };
                print!("{}", report::render_result(&result, entry.grading_system));
            }
            HistoryCommand::Remove { index } => {
                store.remove(index)?;
                println!("Removed calculation #{index}.");
            }
            HistoryCommand::Clear => {
                store.clear()?;
                println!("History cleared.");
            }
            HistoryCommand::Export { dir } => {
                let out = store.export(&dir, chrono::Local::now().date_naive())?;
                println!("History written to {}.", out.display());
            }
            HistoryCommand::Import { file } => {
                let count = store.import(&file)?;
                println!("Imported {count} calculations from {}.", file.display());
            }
            HistoryCommand::Report { out } => {
                let report = report::build_history_report(&store.load());
                std::fs::write(&out, report)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Report written to {}.", out.display());
            }
        },
    }

    Ok(())
}
