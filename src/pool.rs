use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::clamp_workers;
use crate::downloader::Downloader;
use crate::error::Result;
use crate::outcome::{DownloadOutcome, ResultSet};
use crate::source::DownloadRequest;

type Backlog = Arc<Mutex<VecDeque<(usize, DownloadRequest)>>>;

/// Fixed-size pool running one [`Downloader`] call per request.
#[derive(Debug)]
pub struct WorkerPool<D> {
    downloader: Arc<D>,
    workers: usize,
}

impl<D> Clone for WorkerPool<D> {
    fn clone(&self) -> Self {
        WorkerPool {
            downloader: Arc::clone(&self.downloader),
            workers: self.workers,
        }
    }
}

impl<D: Downloader> WorkerPool<D> {
    /// Creates the pool. The worker count is clamped, see [`clamp_workers`].
    pub fn new(downloader: Arc<D>, workers: i64) -> WorkerPool<D> {
        WorkerPool {
            downloader,
            workers: clamp_workers(workers),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs the whole batch and waits for every request to finish.
    ///
    /// Requests start in submission order as workers free up. A failed
    /// download becomes a failed outcome and never stops the other requests.
    /// Errors are returned only when the pool itself breaks down.
    pub async fn run(&self, requests: Vec<DownloadRequest>) -> Result<ResultSet> {
        let expected = requests.len();
        if expected == 0 {
            debug!("empty batch, nothing to do");
            return Ok(ResultSet::default());
        }
        let worker_count = self.workers.min(expected);
        info!(
            requests = expected,
            workers = worker_count,
            "starting concurrent download"
        );

        let backlog: Backlog = Arc::new(Mutex::new(requests.into_iter().enumerate().collect()));
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut handles = Vec::with_capacity(worker_count);
        for worker in 1..=worker_count {
            let backlog = Arc::clone(&backlog);
            let downloader = Arc::clone(&self.downloader);
            let outcome_tx = outcome_tx.clone();
            handles.push(tokio::spawn(Self::worker(
                worker, backlog, downloader, outcome_tx,
            )));
        }
        // Channel closes once the last worker exits.
        drop(outcome_tx);

        let mut results = ResultSet::default();
        while let Some(outcome) = outcome_rx.recv().await {
            results.record(outcome);
            debug!(done = results.len(), total = expected, "outcome received");
        }
        for handle in handles {
            handle.await?;
        }
        results.finish(expected)
    }

    /// Pulls requests off the backlog until it is empty.
    async fn worker(
        worker: usize,
        backlog: Backlog,
        downloader: Arc<D>,
        outcome_tx: UnboundedSender<DownloadOutcome>,
    ) {
        loop {
            let next = backlog.lock().await.pop_front();
            let (index, request) = match next {
                None => return,
                Some(item) => item,
            };
            let outcome = Self::execute(worker, index, request, &downloader).await;
            if outcome_tx.send(outcome).is_err() {
                return;
            }
        }
    }

    /// Runs one download in its own task so a panic only fails this request.
    async fn execute(
        worker: usize,
        index: usize,
        request: DownloadRequest,
        downloader: &Arc<D>,
    ) -> DownloadOutcome {
        debug!(worker, url = %request.url, "picked up request");
        let task_downloader = Arc::clone(downloader);
        let task_request = request.clone();
        let handle =
            tokio::spawn(async move { task_downloader.download(&task_request).await });
        let result = match handle.await {
            Ok(Ok(info)) => Ok(info),
            Ok(Err(error)) => Err(error.to_string()),
            Err(error) => Err(format!("download task aborted: {}", error)),
        };
        match &result {
            Ok(info) => info!(worker, url = %request.url, title = info.title(), "completed"),
            Err(error) => warn!(worker, url = %request.url, %error, "failed"),
        }
        DownloadOutcome {
            index,
            worker,
            request,
            result,
        }
    }
}
