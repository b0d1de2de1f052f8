use crate::config::Config;
use crate::errors::HabitError;
use crate::ids::IdGenerator;
use crate::models::{
    ActivityPoint, AggregateStats, CalendarMark, DailyTotal, Habit, HabitPatch, HabitSummary,
    NewHabit, DEFAULT_COLOR, DEFAULT_ICON,
};
use crate::queue::{SaveStatus, WriteQueue};
use crate::reminders::{self, default_deadline_time, NotificationScheduler};
use crate::stats;
use crate::storage::{encode_habits, load_habits, Persistence};
use crate::streak::{self, StreakMode};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub streak_mode: StreakMode,
    pub deadline_time: NaiveTime,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            streak_mode: StreakMode::default(),
            deadline_time: default_deadline_time(),
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            streak_mode: config.streak_mode,
            deadline_time: config.deadline_time,
        }
    }
}

/// Mutations update memory first; saves and reminder registration run on a
/// background queue and their failures never undo a mutation.
pub struct HabitStore {
    habits: Vec<Habit>,
    ids: IdGenerator,
    options: StoreOptions,
    queue: WriteQueue,
}

impl HabitStore {
    pub async fn open(
        storage: Arc<dyn Persistence>,
        scheduler: Arc<dyn NotificationScheduler>,
        options: StoreOptions,
        today: NaiveDate,
    ) -> Self {
        let habits = load_habits(storage.as_ref(), today).await;
        info!(count = habits.len(), mode = ?options.streak_mode, "habit store opened");

        let store = Self {
            ids: IdGenerator::after(habits.iter().map(|h| h.id.as_str())),
            habits,
            options,
            queue: WriteQueue::spawn(storage, scheduler),
        };
        store.reschedule();
        store
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn snapshot(&self) -> Vec<Habit> {
        self.habits.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn create(&mut self, fields: NewHabit, today: NaiveDate) -> Result<Habit, HabitError> {
        let title = fields.title.trim();
        if title.is_empty() {
            return Err(HabitError::validation("title is required"));
        }

        let habit = Habit {
            id: self.ids.next_id(),
            title: title.to_string(),
            description: non_blank(fields.description),
            icon: fields.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: fields.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            start_date: Some(fields.start_date.unwrap_or(today)),
            reminder: fields.reminder,
            reminder_time: fields.reminder_time,
            completed_dates: BTreeMap::new(),
            streak: 0,
            longest_streak: 0,
            total_completed: 0,
        };
        debug!(id = %habit.id, title = %habit.title, "habit created");

        self.habits.push(habit.clone());
        self.persist();
        if habit.reminder {
            self.reschedule();
        }
        Ok(habit)
    }

    /// Applies `patch` over the existing habit. A blank title keeps the
    /// current one; completion history and counters are never touched.
    pub fn update(&mut self, id: &str, patch: HabitPatch) -> Result<Habit, HabitError> {
        let habit = self.find_mut(id)?;
        let before = ReminderFields::of(habit);

        if let Some(title) = patch.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            habit.title = title.to_string();
        }
        if patch.description.is_some() {
            habit.description = non_blank(patch.description);
        }
        if let Some(icon) = patch.icon {
            habit.icon = icon;
        }
        if let Some(color) = patch.color {
            habit.color = color;
        }
        if let Some(start_date) = patch.start_date {
            habit.start_date = Some(start_date);
        }
        if let Some(reminder) = patch.reminder {
            habit.reminder = reminder;
        }
        if let Some(time) = patch.reminder_time {
            habit.reminder_time = time;
        }

        let after = ReminderFields::of(habit);
        let updated = habit.clone();
        debug!(id = %updated.id, "habit updated");

        self.persist();
        if before != after && (before.reminder || after.reminder) {
            self.reschedule();
        }
        Ok(updated)
    }

    /// Removes the habit. Reminders already registered for it stay in place
    /// until the next re-registration.
    pub fn delete(&mut self, id: &str) -> Result<Habit, HabitError> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| HabitError::not_found(id))?;
        let removed = self.habits.remove(index);
        debug!(id = %removed.id, "habit deleted");

        self.persist();
        Ok(removed)
    }

    pub fn toggle_completion(&mut self, id: &str, date: NaiveDate) -> Result<Habit, HabitError> {
        let mode = self.options.streak_mode;
        let habit = self.find_mut(id)?;
        let completed = streak::toggle(habit, date, mode);
        let updated = habit.clone();
        debug!(id = %updated.id, %date, completed, streak = updated.streak, "completion toggled");

        self.persist();
        Ok(updated)
    }

    pub fn weekly_activity(&self, id: &str, today: NaiveDate) -> Result<Vec<ActivityPoint>, HabitError> {
        Ok(stats::weekly_activity(self.find(id)?, today))
    }

    pub fn monthly_marks(&self, id: &str, today: NaiveDate) -> Result<Vec<CalendarMark>, HabitError> {
        Ok(stats::monthly_marks(self.find(id)?, today))
    }

    pub fn aggregate_stats(&self) -> AggregateStats {
        stats::aggregate_stats(&self.habits)
    }

    pub fn daily_totals(&self, today: NaiveDate) -> Vec<DailyTotal> {
        stats::daily_totals(&self.habits, today)
    }

    pub fn overview_marks(&self) -> BTreeMap<NaiveDate, u32> {
        stats::overview_marks(&self.habits)
    }

    pub fn summaries(&self, today: NaiveDate) -> Vec<HabitSummary> {
        self.habits.iter().map(|h| stats::habit_summary(h, today)).collect()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.queue.status()
    }

    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.queue.subscribe()
    }

    pub async fn flush(&self) -> Result<(), HabitError> {
        self.queue.flush().await
    }

    fn find(&self, id: &str) -> Result<&Habit, HabitError> {
        self.get(id).ok_or_else(|| HabitError::not_found(id))
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Habit, HabitError> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| HabitError::not_found(id))
    }

    fn persist(&self) {
        match encode_habits(&self.habits) {
            Ok(blob) => self.queue.save(blob),
            Err(err) => self.queue.fail(err.to_string()),
        }
    }

    fn reschedule(&self) {
        self.queue
            .remind(reminders::plan(&self.habits, self.options.deadline_time));
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReminderFields {
    reminder: bool,
    time: Option<NaiveTime>,
    title: String,
    description: Option<String>,
}

impl ReminderFields {
    fn of(habit: &Habit) -> Self {
        Self {
            reminder: habit.reminder,
            time: habit.reminder_time,
            title: habit.title.clone(),
            description: habit.description.clone(),
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
