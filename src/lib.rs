pub mod config;
pub mod errors;
pub mod ids;
pub mod models;
pub mod queue;
pub mod reminders;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;
pub mod theme;

pub use config::Config;
pub use errors::HabitError;
pub use models::{Habit, HabitPatch, NewHabit};
pub use queue::SaveStatus;
pub use reminders::{NotificationScheduler, Permission, Reminder};
pub use storage::{FileStorage, MemoryStorage, Persistence};
pub use store::{HabitStore, StoreOptions};
pub use streak::StreakMode;
