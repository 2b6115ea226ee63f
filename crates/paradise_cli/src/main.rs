//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `paradise_core` linkage and storage bootstrap outside any UI.
//! - Print the restored session's visible tasks for one tab.
//!
//! Usage: `paradise [all|today|upcoming|completed] [search query]`

use log::error;
use paradise_core::db::open_db;
use paradise_core::{
    init_logging_from_config, is_overdue, CoreConfig, Paradise, SqliteKeyValueStore, TabSelector,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env();
    init_logging_from_config(&config)?;

    println!("paradise_core ping={}", paradise_core::ping());
    println!("paradise_core version={}", paradise_core::core_version());

    let mut args = std::env::args().skip(1);
    let tab = match args.next() {
        Some(value) => value.parse::<TabSelector>()?,
        None => TabSelector::All,
    };
    let query = args.collect::<Vec<_>>().join(" ");

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let app = Paradise::open(SqliteKeyValueStore::new(&conn), config.storage_keys())
        .map_err(|err| err.to_string())?;

    let Some(session) = app.session() else {
        println!("session=none");
        return Ok(());
    };
    println!(
        "session={} display_name={}",
        session.username, session.display_name
    );

    let now = chrono::Utc::now();
    let counts = app.tab_counts(&query);
    println!("tab={} count={}", tab, counts.get(tab));
    for task in app.visible_tasks(&query, tab) {
        let category = app
            .get_category(&task.category_id)
            .map_or("?", |category| category.name.as_str());
        let due = task
            .due_date
            .map(|due| due.format("%b %d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if task.completed {
            "x"
        } else if is_overdue(task, now) {
            "!"
        } else {
            " "
        };
        println!("[{marker}] {due:>6} {category:<8} {}", task.title);
    }
    Ok(())
}
