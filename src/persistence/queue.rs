//! Ordered background writes to the key-value store.
//!
//! Stores enqueue a snapshot after every mutation and return immediately.
//! One worker thread applies jobs strictly in the order they were queued, so
//! the last snapshot of a key is the one left in storage. `flush` waits for
//! everything queued before it; dropping the queue drains it and joins the
//! worker.

use super::error::StorageError;
use super::kv::KeyValueStore;
use log::{debug, error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

enum Job {
    Save { key: String, value: String },
    Clear,
    Flush(Sender<()>),
}

pub struct PersistQueue {
    backend: Arc<dyn KeyValueStore>,
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    failures: Arc<AtomicUsize>,
}

impl PersistQueue {
    /// Spawn the writer thread for `backend`
    pub fn start(backend: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let (sender, receiver) = mpsc::channel();
        let failures = Arc::new(AtomicUsize::new(0));

        let worker_backend = Arc::clone(&backend);
        let worker_failures = Arc::clone(&failures);
        let worker = thread::Builder::new()
            .name("habitual-persist".to_string())
            .spawn(move || run_worker(receiver, worker_backend, worker_failures))
            .map_err(|e| StorageError::Unavailable(format!("failed to start writer: {}", e)))?;

        Ok(Self {
            backend,
            sender: Some(sender),
            worker: Some(worker),
            failures,
        })
    }

    /// Queue a write of `value` under `key`
    pub fn save(&self, key: &str, value: String) {
        self.submit(Job::Save {
            key: key.to_string(),
            value,
        });
    }

    /// Queue removal of every key, ordered after writes already queued
    pub fn clear(&self) {
        self.submit(Job::Clear);
    }

    /// Block until every job queued so far has been applied
    pub fn flush(&self) {
        let (ack, done) = mpsc::channel();
        if self.submit(Job::Flush(ack)) {
            // An error here means the worker is gone, so nothing is left to wait for
            let _ = done.recv();
        }
    }

    /// Read a key after pending writes have landed
    pub fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.flush();
        self.backend.load(key)
    }

    /// Number of writes that failed since the queue started
    pub fn failed_writes(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn submit(&self, job: Job) -> bool {
        let sent = self
            .sender
            .as_ref()
            .map(|sender| sender.send(job).is_ok())
            .unwrap_or(false);
        if !sent {
            error!("event=persist_enqueue module=persistence status=error reason=writer_stopped");
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
        sent
    }
}

impl Drop for PersistQueue {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is left and exit
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("event=persist_shutdown module=persistence status=error reason=worker_panicked");
            }
        }
    }
}

fn run_worker(receiver: Receiver<Job>, backend: Arc<dyn KeyValueStore>, failures: Arc<AtomicUsize>) {
    for job in receiver {
        match job {
            Job::Save { key, value } => match backend.save(&key, &value) {
                Ok(()) => debug!(
                    "event=persist_save module=persistence status=ok key={} bytes={}",
                    key,
                    value.len()
                ),
                Err(err) => {
                    failures.fetch_add(1, Ordering::SeqCst);
                    error!(
                        "event=persist_save module=persistence status=error key={} error={}",
                        key, err
                    );
                }
            },
            Job::Clear => match backend.clear() {
                Ok(()) => debug!("event=persist_clear module=persistence status=ok"),
                Err(err) => {
                    failures.fetch_add(1, Ordering::SeqCst);
                    error!("event=persist_clear module=persistence status=error error={}", err);
                }
            },
            Job::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}
