use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use tracing::debug;

use crate::formats::{LoadedFile, read_file};

/// Completion events posted by the background loader.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded(LoadedFile),
    Failed { path: PathBuf, message: String },
}

struct LoadJob {
    path: PathBuf,
    max_bytes: u64,
    first_to_last: bool,
}

/// Parses files off the interactive thread. Jobs queue over a channel to
/// one worker and finish in request order; the host polls for events.
#[derive(Debug)]
pub struct Loader {
    jobs: Option<Sender<LoadJob>>,
    events: Receiver<LoadEvent>,
    worker: Option<JoinHandle<()>>,
}

impl Loader {
    pub fn new() -> Loader {
        let (jobs, queue) = channel::<LoadJob>();
        let (done, events) = channel();
        let worker = std::thread::spawn(move || {
            while let Ok(job) = queue.recv() {
                let event = match read_file(&job.path, job.max_bytes, job.first_to_last) {
                    Ok(file) => LoadEvent::Loaded(file),
                    Err(error) => LoadEvent::Failed {
                        path: job.path,
                        message: error.to_string(),
                    },
                };
                if done.send(event).is_err() {
                    break;
                }
            }
        });
        Loader {
            jobs: Some(jobs),
            events,
            worker: Some(worker),
        }
    }

    /// Queues a file for loading.
    pub fn request(&self, path: PathBuf, max_bytes: u64, first_to_last: bool) {
        debug!("queueing load of {:?}", path.display());
        if let Some(jobs) = &self.jobs {
            let _ = jobs.send(LoadJob {
                path,
                max_bytes,
                first_to_last,
            });
        }
    }

    /// The next finished load, if one is ready.
    pub fn poll(&self) -> Option<LoadEvent> {
        self.events.try_recv().ok()
    }

    /// Blocks until a queued load finishes.
    pub fn wait(&self) -> Option<LoadEvent> {
        self.events.recv().ok()
    }
}

impl Default for Loader {
    fn default() -> Loader {
        Loader::new()
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
