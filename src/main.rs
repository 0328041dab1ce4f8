use std::io::{stdin, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use dass21_check::page::{HomePage, ResultsView};
use dass21_check::{
    handle, logging, Answer, AnswerSheet, Config, Menu, Page, PredictionInput, QuestionStore, Request,
};

#[derive(Parser)]
#[command(about = "DASS-21 self-assessment")]
struct Args {
    /// Question CSV with qno, qtext and cat columns (default: bundled DASS-21 items)
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Image shown on the home page
    #[arg(long)]
    home_image: Option<PathBuf>,
    /// Page to open instead of asking
    #[arg(long, value_enum)]
    view: Option<Menu>,
    /// Number of questions to answer
    #[arg(long)]
    count: Option<usize>,
    /// Write the category distribution chart as SVG
    #[arg(long)]
    chart: Option<PathBuf>,
    /// Show results without asking for confirmation
    #[arg(long, short)]
    yes: bool,
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = Config::from_env()
        .with_questions(args.questions.clone())
        .with_home_image(args.home_image.clone());
    let store = config.load_store().context("failed to load questions")?;
    info!(questions = store.len(), "questions loaded");

    let mut input = stdin().lock();
    let menu = match args.view {
        Some(menu) => menu,
        None => choose_menu(&mut input)?,
    };

    match menu {
        Menu::Home => {
            print!("{}", handle(&store, &Request::Home)?);
            if let Some(image) = config.home_image() {
                println!("[{}: {}]", HomePage::default().image_caption, image.display());
            }
        }
        Menu::Dataset => print!("{}", handle(&store, &Request::Dataset)?),
        Menu::Prediction => predict(&store, &args, &mut input)?,
    }
    Ok(())
}

fn choose_menu(input: &mut impl BufRead) -> Result<Menu> {
    for (index, menu) in Menu::ALL.iter().enumerate() {
        println!("  {} => {}", index + 1, menu.title());
    }
    loop {
        let line = read_line(input)?;
        match line.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
            Some(index) if index < Menu::ALL.len() => return Ok(Menu::ALL[index]),
            _ => println!("Choose a page from 1 to {}.", Menu::ALL.len()),
        }
    }
}

fn predict(store: &QuestionStore, args: &Args, input: &mut impl BufRead) -> Result<()> {
    println!("Answer the following questions according to your condition:");

    let answered_count = match args.count {
        Some(count) => {
            store.prefix(count)?;
            count
        }
        None => ask_answered_count(store, input)?,
    };

    let mut sheet = AnswerSheet::new(store.prefix(answered_count)?);
    while let Some(question) = sheet.current() {
        println!();
        println!("{}", question.prompt());
        println!("  0 1 2 3");
        loop {
            let line = read_line(input)?;
            // 未入力は初期値 0
            let answer = if line.is_empty() {
                Ok(Answer::default())
            } else {
                line.parse::<Answer>()
            };
            match answer.and_then(|answer| sheet.push(answer.value())) {
                Ok(()) => break,
                Err(_) => println!("Answers must be a number from 0 to 3."),
            }
        }
    }

    let prediction = PredictionInput::new(store.len())
        .with_answered_count(answered_count)
        .with_answers(sheet.answers().to_vec());
    println!();
    let page = handle(store, &Request::Prediction(prediction.clone()))?;
    print!("{}", page);
    if let (Some(path), Page::Prediction(page)) = (&args.chart, &page) {
        std::fs::write(path, page.distribution.render_svg())
            .with_context(|| format!("failed to write chart to {}", path.display()))?;
        info!(path = %path.display(), "chart written");
    }

    println!();
    if !args.yes {
        println!("Show results? [y/N]");
        if !matches!(read_line(input)?.to_ascii_lowercase().as_str(), "y" | "yes") {
            return Ok(());
        }
    }

    if let Page::Prediction(page) = handle(store, &Request::Prediction(prediction.confirmed()))? {
        if let Some(results) = &page.results {
            print!("{}", ResultsView(results));
        }
    }
    Ok(())
}

fn ask_answered_count(store: &QuestionStore, input: &mut impl BufRead) -> Result<usize> {
    println!("Number of questions to answer (1-{}) [{}]:", store.len(), store.len());
    loop {
        let line = read_line(input)?;
        if line.is_empty() {
            return Ok(store.len());
        }
        match line.parse::<usize>() {
            Ok(count) if store.prefix(count).is_ok() => return Ok(count),
            _ => println!("Enter a number from 1 to {}.", store.len()),
        }
    }
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        bail!("input closed before the questionnaire was finished");
    }
    Ok(buffer.trim().to_string())
}
