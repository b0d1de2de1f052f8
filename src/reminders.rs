use crate::errors::HabitError;
use crate::models::Habit;
use async_trait::async_trait;
use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use tracing::{info, warn};

pub const DEADLINE_TITLE: &str = "HabitTracker Pro";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub time: NaiveTime,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn request_permission(&self) -> Permission;
    async fn request_daily_reminder(&self, reminder: &Reminder) -> Result<(), HabitError>;
    async fn cancel_all(&self) -> Result<(), HabitError>;
}

pub fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn default_deadline_time() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn plan(habits: &[Habit], deadline: NaiveTime) -> Vec<Reminder> {
    let mut reminders: Vec<Reminder> = habits
        .iter()
        .filter(|habit| habit.reminder)
        .map(|habit| Reminder {
            time: habit.reminder_time.unwrap_or_else(default_reminder_time),
            title: habit.title.clone(),
            body: habit
                .description
                .clone()
                .unwrap_or_else(|| format!("Time to {}!", habit.title)),
        })
        .collect();

    reminders.push(Reminder {
        time: deadline,
        title: DEADLINE_TITLE.to_string(),
        body: format!(
            "It's {}! Don't forget to complete your habits.",
            deadline.format(if deadline.minute() == 0 { "%-I %p" } else { "%-I:%M %p" })
        ),
    });
    reminders
}

pub async fn register(scheduler: &dyn NotificationScheduler, reminders: &[Reminder]) -> Result<(), HabitError> {
    if scheduler.request_permission().await == Permission::Denied {
        info!("notification permission denied, skipping {} reminders", reminders.len());
        return Ok(());
    }

    scheduler.cancel_all().await?;
    let mut failed = 0;
    for reminder in reminders {
        if let Err(err) = scheduler.request_daily_reminder(reminder).await {
            warn!("failed to schedule reminder '{}': {err}", reminder.title);
            failed += 1;
        }
    }
    if failed > 0 {
        return Err(HabitError::notification(format!(
            "{failed} of {} reminders not scheduled",
            reminders.len()
        )));
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogScheduler;

#[async_trait]
impl NotificationScheduler for LogScheduler {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_daily_reminder(&self, reminder: &Reminder) -> Result<(), HabitError> {
        info!(time = %reminder.time.format("%H:%M"), title = %reminder.title, "daily reminder registered");
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), HabitError> {
        info!("cleared registered reminders");
        Ok(())
    }
}
