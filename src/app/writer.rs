use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc,
    },
    thread,
};

use anyhow::{anyhow, Result};

use crate::{
    geotag::{GeoMetadata, WriteOutcome},
    picker::Coordinate,
    presenter::Outcome,
    session::Session,
};

struct WriteJob {
    paths: Vec<String>,
    at: Coordinate,
}

type WriteReply = Result<Vec<WriteOutcome>>;

/// What a finished batch means for the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Results were applied to the catalog and handed to the presenter.
    Finished(Outcome),
    /// The batch could not be attempted; nothing was changed.
    Failed(String),
}

/// Sends one batch at a time to a background metadata worker and folds the
/// reply back into the session.
pub struct BatchWriter {
    job_tx: Sender<WriteJob>,
    reply_rx: Receiver<WriteReply>,
    in_flight: Option<usize>,
}

impl BatchWriter {
    pub fn new(metadata: Arc<dyn GeoMetadata>) -> Self {
        let (job_tx, job_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        Self::spawn_worker(metadata, job_rx, reply_tx);
        Self {
            job_tx,
            reply_rx,
            in_flight: None,
        }
    }

    fn spawn_worker(
        metadata: Arc<dyn GeoMetadata>,
        rx: Receiver<WriteJob>,
        tx: Sender<WriteReply>,
    ) {
        thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                let reply = catch_panic("write", || {
                    metadata.write_coordinates(&job.paths, job.at)
                });
                if tx.send(reply).is_err() {
                    break;
                }
            }
        });
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of images in the batch currently being written.
    pub fn pending(&self) -> usize {
        self.in_flight.unwrap_or(0)
    }

    /// The write trigger is enabled only when this holds.
    pub fn can_submit(&self, session: &Session) -> bool {
        !self.is_busy() && !session.selection().is_empty() && session.picker.is_set()
    }

    /// Snapshots the selection and coordinate and hands them to the worker.
    pub fn submit(&mut self, session: &Session) -> Result<()> {
        debug_assert!(self.can_submit(session), "write submitted while disabled");
        if self.is_busy() {
            return Err(anyhow!("A write is already in progress"));
        }
        let at = session
            .picker
            .coordinate()
            .ok_or_else(|| anyhow!("No coordinate chosen"))?;
        let paths = session.targets();
        if paths.is_empty() {
            return Err(anyhow!("No images selected"));
        }

        tracing::info!("submitting {} images at {at}", paths.len());
        let count = paths.len();
        self.job_tx
            .send(WriteJob { paths, at })
            .map_err(|e| anyhow!("Metadata worker is gone: {e}"))?;
        self.in_flight = Some(count);
        Ok(())
    }

    /// Picks up the reply of the in-flight batch, if it has arrived.
    pub fn poll(&mut self, session: &mut Session) -> Option<BatchEvent> {
        self.in_flight?;
        let reply = match self.reply_rx.try_recv() {
            Ok(reply) => reply,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(anyhow!("Metadata worker stopped unexpectedly")),
        };
        self.in_flight = None;

        match reply {
            Ok(results) => {
                session.apply_write_results(&results);
                let outcome = Outcome::from_results(&results);
                tracing::info!("batch finished: {}", outcome.message());
                session.presenter.show(results);
                Some(BatchEvent::Finished(outcome))
            }
            Err(err) => {
                tracing::error!("batch write failed: {err:#}");
                Some(BatchEvent::Failed(format!("{err:#}")))
            }
        }
    }
}

/// Runs one backend call, turning a panic into an error so the worker
/// thread stays alive for the next job.
pub(crate) fn catch_panic<T>(what: &str, call: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(anyhow!("Metadata {what} panicked: {message}"))
    })
}
