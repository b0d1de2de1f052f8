use crate::errors::HabitError;
use crate::models::Habit;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::{error, warn};

pub const DEFAULT_DATA_PATH: &str = "data/habits.json";

#[async_trait]
pub trait Persistence: Send + Sync {
    async fn load(&self) -> Result<Option<Vec<u8>>, HabitError>;
    async fn save(&self, blob: Vec<u8>) -> Result<(), HabitError>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Persistence for FileStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>, HabitError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, blob: Vec<u8>) -> Result<(), HabitError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, blob).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.blob.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

#[async_trait]
impl Persistence for MemoryStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>, HabitError> {
        Ok(self.contents())
    }

    async fn save(&self, blob: Vec<u8>) -> Result<(), HabitError> {
        *self.blob.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(blob);
        Ok(())
    }
}

pub fn resolve_data_path(value: Option<String>) -> PathBuf {
    value
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

pub fn encode_habits(habits: &[Habit]) -> Result<Vec<u8>, HabitError> {
    Ok(serde_json::to_vec_pretty(habits)?)
}

pub fn decode_habits(bytes: &[u8], today: NaiveDate) -> Result<Vec<Habit>, HabitError> {
    let mut habits: Vec<Habit> = serde_json::from_slice(bytes)?;
    let mut taken: HashSet<String> = habits.iter().map(|h| h.id.clone()).collect();
    let mut seen = HashSet::new();
    for habit in &mut habits {
        habit.normalize(today);
        if !seen.insert(habit.id.clone()) {
            let original = std::mem::take(&mut habit.id);
            let mut suffix = 2;
            while taken.contains(&format!("{original}-{suffix}")) {
                suffix += 1;
            }
            habit.id = format!("{original}-{suffix}");
            warn!("duplicate habit id {original}, '{}' renamed to {}", habit.title, habit.id);
            taken.insert(habit.id.clone());
            seen.insert(habit.id.clone());
        }
    }
    Ok(habits)
}

pub async fn load_habits(storage: &dyn Persistence, today: NaiveDate) -> Vec<Habit> {
    match storage.load().await {
        Ok(Some(bytes)) => match decode_habits(&bytes, today) {
            Ok(habits) => habits,
            Err(err) => {
                error!("failed to parse habit data: {err}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(err) => {
            error!("failed to read habit data: {err}");
            Vec::new()
        }
    }
}
