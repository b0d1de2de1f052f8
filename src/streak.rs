use crate::errors::HabitError;
use crate::models::Habit;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakMode {
    /// +1 when a date is added, -1 (floored at 0) when one is removed,
    /// whatever the date. Compatible with existing data.
    #[default]
    Naive,
    /// Length of the run of consecutive days ending at the latest
    /// completed date.
    Consecutive,
}

impl FromStr for StreakMode {
    type Err = HabitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(Self::Naive),
            "consecutive" => Ok(Self::Consecutive),
            other => Err(HabitError::validation(format!(
                "streak mode must be 'naive' or 'consecutive', got '{other}'"
            ))),
        }
    }
}

pub fn toggle(habit: &mut Habit, date: NaiveDate, mode: StreakMode) -> bool {
    let completed = if habit.is_completed_on(date) {
        habit.completed_dates.remove(&date);
        false
    } else {
        habit.completed_dates.insert(date, true);
        true
    };

    habit.streak = match mode {
        StreakMode::Naive if completed => habit.streak.saturating_add(1),
        StreakMode::Naive => habit.streak.saturating_sub(1),
        StreakMode::Consecutive => trailing_run(habit),
    };
    habit.longest_streak = habit.longest_streak.max(habit.streak);
    habit.total_completed = habit.completed_dates.len() as u32;
    completed
}

pub fn trailing_run(habit: &Habit) -> u32 {
    let mut days = habit.completed_days().rev();
    let Some(mut previous) = days.next() else {
        return 0;
    };
    let mut run = 1;
    for date in days {
        if previous.pred_opt() != Some(date) {
            break;
        }
        run += 1;
        previous = date;
    }
    run
}
