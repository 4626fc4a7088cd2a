//! `gschool` - CLI for groundschool
//!
//! This binary provides the command-line interface for studying the
//! question bank and managing stored notes and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use clap::Parser;

use groundschool::cli::{
    CategoriesCommand, Cli, Command, ConfigCommand, NotesCommand, StudyCommand,
};
use groundschool::logging::LogDestination;
use groundschool::notes::worker::NotesWorker;
use groundschool::notes::NoteStore;
use groundschool::tui::{self, App};
use groundschool::{
    init_logging, Category, CategoryFilter, Config, Error, OrderingMode, QuestionBank,
    StudySession,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Bare `gschool` opens the study screen
    let command = cli
        .command
        .unwrap_or_else(|| Command::Study(StudyCommand::default()));

    // The study screen owns the terminal, so its logs go to a file
    let destination = match &command {
        Command::Study(_) => LogDestination::File(config.log_file_path()),
        _ => LogDestination::Stderr,
    };
    init_logging(verbosity, &destination)?;

    // Execute the command
    match command {
        Command::Study(study_cmd) => handle_study(&config, &study_cmd),
        Command::Categories(categories_cmd) => handle_categories(&categories_cmd),
        Command::Notes(notes_cmd) => handle_notes(&config, notes_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn load_bank(questions_dir: Option<&Path>) -> groundschool::Result<QuestionBank> {
    match questions_dir {
        Some(dir) => QuestionBank::load_dir(dir),
        None => QuestionBank::builtin(),
    }
}

fn handle_study(config: &Config, cmd: &StudyCommand) -> Result<(), Box<dyn std::error::Error>> {
    let bank = load_bank(cmd.questions_dir.as_deref())?;
    if bank.is_empty() {
        println!("No questions loaded.");
        return Ok(());
    }

    let mut session = match cmd.seed {
        Some(seed) => StudySession::with_seed(bank, seed),
        None => StudySession::new(bank),
    };
    session.set_ordering(
        cmd.order
            .map(OrderingMode::from)
            .unwrap_or(config.study.ordering),
    );
    session.set_reveal_gate(config.study.reveal_before_advance && !cmd.no_reveal_gate);
    if let Some(category) = cmd.category.map(Category::from).or(config.study.category) {
        session.set_filter(CategoryFilter::Only(category));
    }

    let store = NoteStore::open(&config.database_path(), &config.fallback_path());
    let runtime = tokio::runtime::Runtime::new()?;
    let NotesWorker {
        handle,
        events,
        task,
    } = NotesWorker::spawn(store, runtime.handle());
    let mut app = App::new(session, config.keys.clone(), handle, events);

    tui::run(&mut app)?;

    // Dropping the app releases the last command sender; the worker
    // drains queued saves and exits.
    drop(app);
    runtime.block_on(task)?;
    Ok(())
}

fn handle_categories(cmd: &CategoriesCommand) -> Result<(), Box<dyn std::error::Error>> {
    let bank = load_bank(cmd.questions_dir.as_deref())?;
    if cmd.json {
        let counts: Vec<_> = Category::ALL
            .iter()
            .map(|&category| {
                serde_json::json!({
                    "category": category.name(),
                    "questions": bank.count_in(category),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!("Question bank");
        println!("-------------");
        for &category in &Category::ALL {
            println!("{:<14} {:>4}", category.name(), bank.count_in(category));
        }
        println!("{:<14} {:>4}", "total", bank.len());
    }
    Ok(())
}

fn handle_notes(config: &Config, cmd: NotesCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = NoteStore::open(&config.database_path(), &config.fallback_path());
    match cmd {
        NotesCommand::List { json } => {
            let ids = store.question_ids();
            if json {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else if ids.is_empty() {
                println!("No notes stored.");
            } else {
                for id in ids {
                    println!("{id}");
                }
            }
        }
        NotesCommand::Show { question_id } => {
            let text = store.load(&question_id);
            if text.is_empty() {
                return Err(Error::note_not_found(question_id).into());
            }
            println!("{text}");
        }
        NotesCommand::Wipe { question_id, yes } => {
            if !yes {
                println!("This will delete stored notes.");
                println!("Use --yes to confirm.");
                return Ok(());
            }
            match question_id {
                Some(id) => {
                    if store.wipe(&id) {
                        println!("Deleted note for question {id}.");
                    } else {
                        println!("No note stored for question {id}.");
                    }
                }
                None => {
                    let ids = store.question_ids();
                    let mut deleted = 0usize;
                    for id in &ids {
                        if store.wipe(id) {
                            deleted += 1;
                        }
                    }
                    println!("Deleted {deleted} note(s).");
                }
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Fallback path:  {}", config.fallback_path().display());
                println!("  Log file:       {}", config.log_file_path().display());
                println!();
                println!("[Study]");
                println!("  Ordering:       {}", config.study.ordering);
                println!(
                    "  Reveal gate:    {}",
                    config.study.reveal_before_advance
                );
                match config.study.category {
                    Some(category) => println!("  Category:       {category}"),
                    None => println!("  Category:       all"),
                }
                println!();
                println!("[Keys]");
                for (keys, action) in config.keys.help_entries() {
                    println!("  {keys:<6} {action}");
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
