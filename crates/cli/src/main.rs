use clap::{Parser, Subcommand};
use std::path::PathBuf;
use survey_core::config::csv_path_from_env_value;
use survey_core::questions::{SECTION_1, SECTION_2};
use survey_core::CsvStore;

#[derive(Parser)]
#[command(name = "survey")]
#[command(about = "Diabetes health survey store CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the survey questions in column order
    Fields,
    /// Count stored survey responses
    Count {
        /// Response store (defaults to SURVEY_CSV_PATH, then diabetes_survey_responses.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Report rows that do not match the store's header
    Check {
        /// Response store (defaults to SURVEY_CSV_PATH, then diabetes_survey_responses.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn open_store(csv: Option<PathBuf>) -> CsvStore {
    let path = csv.unwrap_or_else(|| csv_path_from_env_value(std::env::var("SURVEY_CSV_PATH").ok()));
    CsvStore::new(path)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Fields) => {
            for (section, fields) in [("section1", SECTION_1), ("section2", SECTION_2)] {
                for field in fields {
                    println!("{}\t{}\t{}", section, field.key, field.label);
                }
            }
        }
        Some(Commands::Count { csv }) => {
            let store = open_store(csv);
            let count = store.count()?;
            println!("{} response(s) in {}", count, store.path().display());
        }
        Some(Commands::Check { csv }) => {
            let store = open_store(csv);
            let report = store.check()?;
            println!(
                "{}: {} row(s), {} column(s)",
                store.path().display(),
                report.rows,
                report.columns
            );
            if !report.is_consistent() {
                for row in &report.misaligned {
                    eprintln!("row {} does not match the header", row);
                }
                std::process::exit(1);
            }
            println!("OK");
        }
        None => {
            println!("Use 'survey --help' for commands");
        }
    }

    Ok(())
}
