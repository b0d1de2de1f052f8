use crate::errors::HabitError;
use crate::reminders::{self, NotificationScheduler, Reminder};
use crate::storage::Persistence;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saved,
    /// The in-memory collection is ahead of what is on disk.
    Failed(String),
}

enum Job {
    Save(Vec<u8>),
    Remind(Vec<Reminder>),
    Flush(oneshot::Sender<()>),
}

pub struct WriteQueue {
    jobs: mpsc::UnboundedSender<Job>,
    status: Arc<watch::Sender<SaveStatus>>,
}

impl WriteQueue {
    pub fn spawn(storage: Arc<dyn Persistence>, scheduler: Arc<dyn NotificationScheduler>) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        let status = Arc::new(watch::Sender::new(SaveStatus::Idle));
        tokio::spawn(run(rx, storage, scheduler, Arc::clone(&status)));
        Self { jobs, status }
    }

    pub fn save(&self, blob: Vec<u8>) {
        if self.jobs.send(Job::Save(blob)).is_err() {
            self.fail(HabitError::Closed.to_string());
        }
    }

    pub fn remind(&self, reminders: Vec<Reminder>) {
        if self.jobs.send(Job::Remind(reminders)).is_err() {
            warn!("reminders not registered: {}", HabitError::Closed);
        }
    }

    pub fn fail(&self, message: String) {
        warn!("habits not saved: {message}");
        self.status.send_replace(SaveStatus::Failed(message));
    }

    pub async fn flush(&self) -> Result<(), HabitError> {
        let (done, wait) = oneshot::channel();
        self.jobs.send(Job::Flush(done)).map_err(|_| HabitError::Closed)?;
        wait.await.map_err(|_| HabitError::Closed)
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }
}

async fn run(
    mut jobs: mpsc::UnboundedReceiver<Job>,
    storage: Arc<dyn Persistence>,
    scheduler: Arc<dyn NotificationScheduler>,
    status: Arc<watch::Sender<SaveStatus>>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            Job::Save(blob) => match storage.save(blob).await {
                Ok(()) => {
                    debug!("habits saved");
                    status.send_replace(SaveStatus::Saved);
                }
                Err(err) => {
                    warn!("failed to save habits: {err}");
                    status.send_replace(SaveStatus::Failed(err.to_string()));
                }
            },
            Job::Remind(planned) => {
                if let Err(err) = reminders::register(scheduler.as_ref(), &planned).await {
                    warn!("failed to register reminders: {err}");
                }
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("write queue closed");
}
