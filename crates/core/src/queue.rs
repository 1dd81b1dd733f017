//! Single-concurrency FIFO task queue.
//!
//! Jobs are boxed futures executed one at a time, in submission order, by a
//! single worker task. A failing job is logged and does not stop the queue.
//! Used to serialize account cleanup after user deletion.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::CoreError;

type BoxedJob = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

struct QueuedJob {
    name: String,
    job: BoxedJob,
}

pub struct TaskQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<QueuedJob>>>,
    pending: Arc<AtomicUsize>,
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl TaskQueue {
    /// Create the queue and spawn its worker on the current runtime.
    pub fn start() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker = tokio::spawn(Self::run(receiver, Arc::clone(&pending)));
        Self {
            sender: Mutex::new(Some(sender)),
            pending,
            worker: tokio::sync::Mutex::new(Some(worker)),
        }
    }

    async fn run(mut receiver: mpsc::UnboundedReceiver<QueuedJob>, pending: Arc<AtomicUsize>) {
        while let Some(QueuedJob { name, job }) = receiver.recv().await {
            tracing::debug!(job = %name, "Task queue: running job");
            match job.await {
                Ok(()) => tracing::info!(job = %name, "Task queue: job completed"),
                Err(e) => tracing::error!(job = %name, error = %e, "Task queue: job failed"),
            }
            pending.fetch_sub(1, Ordering::SeqCst);
        }
        tracing::info!("Task queue drained, worker stopping");
    }

    /// Append a job to the queue. Returns immediately.
    ///
    /// Fails once [`shutdown`](Self::shutdown) has been called.
    pub fn enqueue<F, E>(&self, name: impl Into<String>, job: F) -> Result<(), CoreError>
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display,
    {
        let name = name.into();
        let guard = self
            .sender
            .lock()
            .map_err(|_| CoreError::Internal("task queue lock poisoned".into()))?;
        let sender = guard
            .as_ref()
            .ok_or_else(|| CoreError::Internal("task queue is shut down".into()))?;

        self.pending.fetch_add(1, Ordering::SeqCst);
        let job: BoxedJob = Box::pin(async move { job.await.map_err(|e| e.to_string()) });
        if sender.send(QueuedJob { name, job }).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(CoreError::Internal("task queue worker has stopped".into()));
        }
        Ok(())
    }

    /// Jobs accepted but not yet finished (including the running one).
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Stop accepting jobs, let queued jobs finish, then stop the worker.
    pub async fn shutdown(&self) {
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }
        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Task queue worker panicked");
            }
        }
    }
}
