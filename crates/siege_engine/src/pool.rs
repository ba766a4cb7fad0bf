use std::io;
use std::sync::mpsc;
use std::thread;

use siege_core::{Outcome, RunConfig};
use thiserror::Error;

use crate::fetch::Fetcher;

/// Message on the dispatch queue: one URL to fetch, or the poison pill that
/// tells exactly one worker to exit.
enum Dispatch {
    Fetch(String),
    Shutdown,
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] io::Error),
}

/// Fixed-size pool of fetch workers behind a pair of FIFO queues.
///
/// Workers run as tasks on a tokio runtime owned by a background thread; the
/// control thread talks to them exclusively over the unbounded dispatch and
/// response channels, so neither side ever blocks the other on a send.
pub struct WorkerPool {
    dispatch_tx: async_channel::Sender<Dispatch>,
    outcome_rx: mpsc::Receiver<Outcome>,
    worker_count: usize,
}

impl WorkerPool {
    /// Starts `config.concurrency` workers, all pulling from one queue.
    pub fn start(config: &RunConfig) -> Result<Self, PoolError> {
        let fetcher = Fetcher::new(config.request_timeout, config.target_vhost.clone())?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (dispatch_tx, dispatch_rx) = async_channel::unbounded();
        let (outcome_tx, outcome_rx) = mpsc::channel();
        let worker_count = config.concurrency;

        thread::spawn(move || {
            let workers: Vec<_> = (0..worker_count)
                .map(|_| {
                    runtime.spawn(worker_loop(
                        dispatch_rx.clone(),
                        outcome_tx.clone(),
                        fetcher.clone(),
                    ))
                })
                .collect();
            // The harvester must observe a disconnect, not a hang, once
            // every worker is gone.
            drop(outcome_tx);
            runtime.block_on(async {
                for worker in workers {
                    let _ = worker.await;
                }
            });
        });

        Ok(Self {
            dispatch_tx,
            outcome_rx,
            worker_count,
        })
    }

    /// Queues one URL. The queue is unbounded, so this never blocks.
    pub fn dispatch(&self, url: String) {
        let _ = self.dispatch_tx.try_send(Dispatch::Fetch(url));
    }

    /// Queues one shutdown marker per worker. A worker mid-fetch reports its
    /// in-flight outcome before it sees the marker; a worker that already
    /// exited leaves its marker unconsumed, which is harmless.
    pub fn shutdown(&self) {
        for _ in 0..self.worker_count {
            let _ = self.dispatch_tx.try_send(Dispatch::Shutdown);
        }
    }

    /// Non-blocking pop from the response queue.
    pub fn try_harvest(&self) -> Option<Outcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Blocking pop from the response queue; `None` once every worker has
    /// exited and the queue is drained.
    pub fn harvest(&self) -> Option<Outcome> {
        self.outcome_rx.recv().ok()
    }
}

async fn worker_loop(
    dispatch_rx: async_channel::Receiver<Dispatch>,
    outcome_tx: mpsc::Sender<Outcome>,
    fetcher: Fetcher,
) {
    while let Ok(message) = dispatch_rx.recv().await {
        match message {
            Dispatch::Fetch(url) => {
                let outcome = fetcher.fetch(&url).await;
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
            Dispatch::Shutdown => break,
        }
    }
}
