#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use habit_tracker::{
    HabitError, HabitStore, MemoryStorage, NotificationScheduler, Permission, Persistence,
    Reminder, StoreOptions,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CancelAll,
    Schedule(Reminder),
}

#[derive(Debug)]
pub struct RecordingScheduler {
    permission: Permission,
    calls: Mutex<Vec<Call>>,
}

impl RecordingScheduler {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Reminders registered after the most recent cancel-all.
    pub fn active(&self) -> Vec<Reminder> {
        let calls = self.calls();
        let start = calls
            .iter()
            .rposition(|c| *c == Call::CancelAll)
            .map_or(0, |i| i + 1);
        calls[start..]
            .iter()
            .filter_map(|c| match c {
                Call::Schedule(r) => Some(r.clone()),
                Call::CancelAll => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotificationScheduler for RecordingScheduler {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn request_daily_reminder(&self, reminder: &Reminder) -> Result<(), HabitError> {
        self.calls.lock().unwrap().push(Call::Schedule(reminder.clone()));
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), HabitError> {
        self.calls.lock().unwrap().push(Call::CancelAll);
        Ok(())
    }
}

/// Storage whose writes always fail.
#[derive(Debug, Default)]
pub struct BrokenStorage;

#[async_trait]
impl Persistence for BrokenStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>, HabitError> {
        Ok(None)
    }

    async fn save(&self, _blob: Vec<u8>) -> Result<(), HabitError> {
        Err(std::io::Error::other("disk full").into())
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
}

pub struct Harness {
    pub store: HabitStore,
    pub storage: Arc<MemoryStorage>,
    pub scheduler: Arc<RecordingScheduler>,
}

pub async fn harness(options: StoreOptions) -> Harness {
    harness_with(Arc::new(MemoryStorage::default()), options).await
}

pub async fn harness_with(storage: Arc<MemoryStorage>, options: StoreOptions) -> Harness {
    let scheduler = Arc::new(RecordingScheduler::new(Permission::Granted));
    let store = HabitStore::open(storage.clone(), scheduler.clone(), options, today()).await;
    Harness {
        store,
        storage,
        scheduler,
    }
}

pub fn saved_titles(storage: &MemoryStorage) -> Vec<String> {
    let blob = storage.contents().expect("nothing saved");
    let value: serde_json::Value = serde_json::from_slice(&blob).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["title"].as_str().unwrap().to_string())
        .collect()
}
