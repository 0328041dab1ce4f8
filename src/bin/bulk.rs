use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dass21_check::page::ResultsView;
use dass21_check::{logging, read_bulk, Config};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::warn;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(about = "Score DASS-21 answers for many respondents")]
struct Args {
    /// CSV with a header line, then `id,answer,answer,...` per row
    path: PathBuf,
    /// Question CSV (default: bundled DASS-21 items)
    #[arg(long)]
    questions: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let store = Config::from_env()
        .with_questions(args.questions)
        .load_store()
        .context("failed to load questions")?;
    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;

    let mut failed = 0;
    for (line, row) in read_bulk(BufReader::new(file), &store).enumerate() {
        match row {
            Ok(row) => match args.format {
                Format::Text => {
                    println!("id = {}, answered = {}", row.id, row.answered_count);
                    print!("{}", ResultsView(&row.assessment));
                    println!();
                }
                Format::Json => println!("{}", serde_json::to_string(&row)?),
            },
            Err(e) => {
                failed += 1;
                // 見出し行の分を足す
                warn!(row = line + 2, error = %e, "row skipped");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} row(s) could not be scored", failed);
    }
    Ok(())
}
