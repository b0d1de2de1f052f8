use chrono::Local;
use habit_tracker::reminders::LogScheduler;
use habit_tracker::theme::theme_hex;
use habit_tracker::{Config, FileStorage, HabitStore, StoreOptions};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let storage = FileStorage::new(&config.data_path);
    info!("using habit data at {}", storage.path().display());

    let today = Local::now().date_naive();
    let store = HabitStore::open(
        Arc::new(storage),
        Arc::new(LogScheduler),
        StoreOptions::from(&config),
        today,
    )
    .await;

    for habit in store.habits() {
        info!(
            title = %habit.title,
            color = theme_hex(&habit.color),
            streak = habit.streak,
            longest = habit.longest_streak,
            done_today = habit.is_completed_on(today),
            "habit"
        );
    }

    let totals = store.aggregate_stats();
    info!(
        habits = totals.habit_count,
        completions = totals.total_completions,
        avg_streak = %format!("{:.1}", totals.avg_streak),
        "summary"
    );

    store.flush().await?;
    Ok(())
}
