use crate::errors::HabitError;
use crate::reminders::default_deadline_time;
use crate::storage::resolve_data_path;
use crate::streak::StreakMode;
use chrono::NaiveTime;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub streak_mode: StreakMode,
    pub deadline_time: NaiveTime,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: resolve_data_path(None),
            streak_mode: StreakMode::default(),
            deadline_time: default_deadline_time(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, HabitError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HabitError> {
        let streak_mode = match lookup("HABIT_STREAK_MODE") {
            Some(value) => value.parse()?,
            None => StreakMode::default(),
        };
        let deadline_time = match lookup("HABIT_DEADLINE_TIME") {
            Some(value) => NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
                HabitError::validation(format!("HABIT_DEADLINE_TIME must be HH:MM, got '{value}'"))
            })?,
            None => default_deadline_time(),
        };

        Ok(Self {
            data_path: resolve_data_path(lookup("HABIT_DATA_PATH")),
            streak_mode,
            deadline_time,
        })
    }
}
