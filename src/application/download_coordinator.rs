use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::{
    application::progress::ProgressState,
    domain::{AppError, DownloadOutcome, DownloadRequest, ProgressEvent},
    extractor::ExtractionClient,
};

struct ActiveRun {
    outcome_rx: Receiver<DownloadOutcome>,
    worker: JoinHandle<()>,
}

/// Runs one download at a time on a background worker thread.
///
/// The coordinator lives on the UI thread. It owns the admission gate (a run is
/// active until its outcome has been collected) and the progress counters the
/// worker writes into.
pub struct DownloadCoordinator {
    client: Arc<dyn ExtractionClient>,
    progress: ProgressState,
    active: Option<ActiveRun>,
}

impl DownloadCoordinator {
    pub fn new(client: Arc<dyn ExtractionClient>) -> Self {
        Self {
            client,
            progress: ProgressState::new(),
            active: None,
        }
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, request: DownloadRequest) -> Result<(), AppError> {
        if self.is_running() {
            log::debug!("refusing {}: a download is already running", request.url);
            return Err(AppError::Busy);
        }

        self.progress.reset();

        let (outcome_tx, outcome_rx) = mpsc::channel();
        let client = Arc::clone(&self.client);
        let progress = self.progress.clone();
        let output_template = request.output_template();

        log::info!("starting download of {} into {}", request.url, output_template);

        let worker = thread::Builder::new()
            .name("download-worker".to_string())
            .spawn(move || {
                let result = client.extract(
                    &request.url,
                    &output_template,
                    &mut |event: ProgressEvent| progress.apply(&event),
                );

                let outcome = match result {
                    Ok(media) => DownloadOutcome::Success { title: media.title },
                    Err(e) => DownloadOutcome::failure(e.into()),
                };
                // The receiver only disappears if the coordinator itself was dropped.
                let _ = outcome_tx.send(outcome);
            })
            .map_err(|e| {
                AppError::Unclassified(format!("could not spawn download worker: {}", e))
            })?;

        self.active = Some(ActiveRun { outcome_rx, worker });
        Ok(())
    }

    /// Non-blocking check for the active run's outcome.
    ///
    /// Returns the outcome exactly once and reopens the admission gate at the
    /// same moment.
    pub fn poll_outcome(&mut self) -> Option<DownloadOutcome> {
        let outcome = match self.active.as_ref()?.outcome_rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => worker_lost(),
        };
        Some(self.finish(outcome))
    }

    fn finish(&mut self, outcome: DownloadOutcome) -> DownloadOutcome {
        if let Some(run) = self.active.take() {
            if run.worker.join().is_err() {
                log::error!("download worker panicked");
            }
        }

        match &outcome {
            DownloadOutcome::Success { title } => log::info!("download finished: {:?}", title),
            DownloadOutcome::Failure { kind, message } => {
                log::warn!("download failed ({:?}): {}", kind, message)
            }
        }
        outcome
    }
}

fn worker_lost() -> DownloadOutcome {
    DownloadOutcome::failure(AppError::Unclassified(
        "the download worker stopped without reporting a result".to_string(),
    ))
}
