use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ICON: &str = "fitness";
pub const DEFAULT_COLOR: &str = "blue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder: bool,
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<NaiveTime>,
    #[serde(default)]
    pub completed_dates: BTreeMap<NaiveDate, bool>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub total_completed: u32,
}

impl Habit {
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.get(&date).copied().unwrap_or(false)
    }

    pub fn completed_days(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.completed_dates
            .iter()
            .filter(|(_, done)| **done)
            .map(|(date, _)| *date)
    }

    pub fn normalize(&mut self, fallback_start: NaiveDate) {
        self.completed_dates.retain(|_, done| *done);
        self.total_completed = self.completed_dates.len() as u32;
        self.longest_streak = self.longest_streak.max(self.streak);
        if self.start_date.is_none() {
            self.start_date = Some(crate::ids::created_on(&self.id).unwrap_or(fallback_start));
        }
        if self.description.as_deref().is_some_and(|text| text.trim().is_empty()) {
            self.description = None;
        }
    }
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Debug, Clone, Default)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub reminder: bool,
    pub reminder_time: Option<NaiveTime>,
}

impl NewHabit {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub reminder: Option<bool>,
    /// `Some(None)` clears the time back to the default.
    pub reminder_time: Option<Option<NaiveTime>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub label: String,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkStatus {
    Completed,
    Missed,
    /// Today, not completed yet.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMark {
    pub date: NaiveDate,
    pub status: MarkStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub label: String,
    pub completed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub habit_count: usize,
    pub total_completions: u64,
    pub avg_streak: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub id: String,
    pub title: String,
    pub total_completed: u32,
    pub streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
