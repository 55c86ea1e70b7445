use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::library::Track;

use super::model::CaptionLine;
use super::resolver::LyricsResolver;

/// Result of one background resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsUpdate {
    pub track_id: u64,
    pub lines: Vec<CaptionLine>,
}

struct Job {
    track: Track,
    cancelled: Arc<AtomicBool>,
}

impl Job {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

struct Pending {
    track_id: u64,
    cancelled: Arc<AtomicBool>,
}

/// Resolves lyrics off the UI thread on one long-lived worker thread.
///
/// Starting a new request cancels the previous one. Requests still queued
/// behind a newer one are skipped, and a job cancelled before its lines are
/// sent does not deliver them. A cancel racing the send can still let one
/// result through, so receivers compare `track_id` against `pending()`.
pub struct LyricsWorker {
    jobs: Option<Sender<Job>>,
    pending: Option<Pending>,
}

impl LyricsWorker {
    pub fn new(resolver: Arc<LyricsResolver>) -> (Self, Receiver<LyricsUpdate>) {
        let (tx, rx) = mpsc::channel();
        let (jobs_tx, jobs_rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("canto-lyrics".to_string())
            .spawn(move || run_jobs(&resolver, &jobs_rx, &tx));
        let jobs = match spawned {
            Ok(_) => Some(jobs_tx),
            Err(e) => {
                warn!(error = %e, "failed to spawn lyrics worker");
                None
            }
        };

        (
            Self {
                jobs,
                pending: None,
            },
            rx,
        )
    }

    pub fn request(&mut self, track: &Track) {
        self.cancel();
        let Some(jobs) = &self.jobs else {
            return;
        };

        let cancelled = Arc::new(AtomicBool::new(false));
        let job = Job {
            track: track.clone(),
            cancelled: cancelled.clone(),
        };
        if jobs.send(job).is_err() {
            warn!("lyrics worker stopped");
            self.jobs = None;
            return;
        }
        self.pending = Some(Pending {
            track_id: track.id,
            cancelled,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(job) = self.pending.take() {
            job.cancelled.store(true, Ordering::Release);
        }
    }

    /// Track id of the most recent request that has not been cancelled.
    pub fn pending(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.track_id)
    }
}

impl Drop for LyricsWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Worker loop; ends when the `LyricsWorker` or the update receiver is gone.
fn run_jobs(resolver: &LyricsResolver, jobs: &Receiver<Job>, tx: &Sender<LyricsUpdate>) {
    while let Ok(mut job) = jobs.recv() {
        while let Ok(newer) = jobs.try_recv() {
            job = newer;
        }
        let track_id = job.track.id;
        if job.is_cancelled() {
            debug!(track_id, "lyrics job skipped");
            continue;
        }

        let lines = resolver.resolve(&job.track);
        if job.is_cancelled() {
            debug!(track_id, "lyrics job cancelled");
            continue;
        }
        if tx.send(LyricsUpdate { track_id, lines }).is_err() {
            break;
        }
    }
}
