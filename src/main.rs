mod cli;

use std::{
    process,
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use cli::{
    Cli,
    ClockCommands,
    Commands,
    NotebookCommands,
    Outcome,
};
use goldlist::{
    core::{
        tasks::{
            TaskManager,
            TaskResult,
        },
        GoldlistError,
    },
    notifications::LogScheduler,
    persistence::{
        get_app_data_dir,
        settings::SETTINGS_FILE,
        store::STORE_FILE,
        JsonStore,
        Settings,
    },
    review::ReviewService,
    roadmap::PageState,
    streak::StreakStatus,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goldlist=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), GoldlistError> {
    let data_dir = cli.data_dir.unwrap_or_else(get_app_data_dir);
    let settings_path = data_dir.join(SETTINGS_FILE);
    let mut settings = Settings::load_or_default(&settings_path);
    let clock = settings.clock();
    let now = clock.now();

    if clock.is_shifted() {
        tracing::info!("Virtual clock is {} days off, now reads {}", clock.offset_days(), now);
    }

    if let Commands::Clock { action } = &cli.command {
        let mut clock = clock;
        match action {
            ClockCommands::Show => {}
            ClockCommands::Shift { days } => clock.shift(*days)?,
            ClockCommands::Reset => clock.reset(),
        }
        settings.set_clock(clock);
        settings.save_to(&settings_path)?;
        println!(
            "Clock offset: {} days ({})",
            clock.offset_days(),
            clock.now().format("%Y-%m-%d")
        );
        return Ok(());
    }

    let store = JsonStore::open(data_dir.join(STORE_FILE))?;
    let service = ReviewService::new(store, settings)
        .with_tasks(TaskManager::new(Arc::new(LogScheduler)));

    let wrote = matches!(cli.command, Commands::Add { .. } | Commands::Review { .. });

    match cli.command {
        Commands::Notebook { action: NotebookCommands::New { name, words_per_page } } => {
            let notebook = service.create_notebook(&name, words_per_page, now)?;
            println!(
                "{}  {} ({} words per page)",
                notebook.id, notebook.name, notebook.words_per_page
            );
        }
        Commands::Notebook { action: NotebookCommands::List } => {
            for notebook in service.notebooks()? {
                let page = notebook
                    .todays_page(now)
                    .map(|p| format!("page {}", p))
                    .unwrap_or_else(|| "no page today".to_string());
                println!(
                    "{}  {}  started {}, {}",
                    notebook.id,
                    notebook.name,
                    notebook.created_on(),
                    page
                );
            }
        }
        Commands::Add { notebook, term, translation, page } => {
            let entry = service.add_word(notebook, page, &term, &translation, now)?;
            println!(
                "{}  page {}  {} = {}  (review on {})",
                entry.id,
                entry.page_number,
                entry.term,
                entry.translation,
                entry.next_review_date.map(|d| d.to_string()).unwrap_or_default()
            );
        }
        Commands::Due { notebook } => {
            let mut queue = service.queue(now)?;
            if let Some(notebook) = notebook {
                queue = queue.for_notebook(notebook);
            }
            if queue.is_empty() {
                println!("Nothing to review today.");
            }
            for entry in queue.iter() {
                println!(
                    "{}  {:<6} round {}  {} = {}",
                    entry.id, entry.stage, entry.round, entry.term, entry.translation
                );
            }
        }
        Commands::Review { id, outcome } => {
            let outcome = service.review(id, outcome == Outcome::Remembered, now)?;
            println!("{}: {:?}", outcome.entry.term, outcome.transition);
        }
        Commands::Streak => {
            let display = service.streak(now)?;
            let label = match display.status {
                StreakStatus::Completed => "done for today",
                StreakStatus::Pending => "review or add a word today to keep it",
                StreakStatus::Broken => "broken",
            };
            println!("Streak: {} ({})", display.streak, label);
        }
        Commands::Roadmap { notebook, all } => {
            let (pages, summary) = service.roadmap(notebook, now)?;
            for page in pages.iter().filter(|p| all || p.state != PageState::Locked) {
                println!(
                    "page {:>3}  {:>3} words  {:?}",
                    page.page_number, page.word_count, page.state
                );
            }
            println!(
                "completed {}, partial {}, missed {}, locked {}, {} words written",
                summary.completed,
                summary.partial,
                summary.missed,
                summary.locked,
                summary.words_written
            );
        }
        Commands::Stats => {
            let stats = service.stats(now)?;
            println!(
                "{} words: {} waiting, {} ready, {} learned, {} leech",
                stats.total, stats.waiting, stats.ready, stats.learned, stats.leech
            );
            for (stage, count) in &stats.by_stage {
                println!("  {:<6} {}", stage, count);
            }
            println!("Retention: {:.0}%", stats.retention() * 100.0);
        }
        Commands::Clock { .. } => unreachable!("handled above"),
    }

    // Let the reminder task finish before the process exits.
    if wrote {
        match service.wait_task_result(Duration::from_millis(500)) {
            Some(TaskResult::RemindersScheduled(Err(e))) => {
                tracing::warn!("Reminder was not scheduled: {}", e)
            }
            Some(TaskResult::RemindersCancelled(Err(e))) => {
                tracing::warn!("Reminders were not cancelled: {}", e)
            }
            _ => {}
        }
    }

    Ok(())
}
