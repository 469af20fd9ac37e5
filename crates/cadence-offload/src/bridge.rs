// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The offload bridge.
//!
//! Computations are submitted as a function plus a serializable payload. If a
//! worker pool is available the payload is encoded, queued and decoded again
//! on a worker thread; otherwise the function runs on the calling thread with
//! the payload exactly as given.
//!
//! Failures of the worker context are logged and the call is re-run inline on
//! the original payload. That covers a full or closed queue, a payload the
//! codec cannot carry, a panicking worker and a lost reply. Errors returned
//! by the function itself are never retried.

use crate::codec;
use crate::error::{ComputeError, WorkerFailure};
use crate::pool::WorkerPool;
use crate::stats::{OffloadStats, StatsCounters};
use crate::ticket::{ComputeTicket, WorkerReply};
use cadence_core::OffloadConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Runs pure computations off the calling thread when it can.
#[derive(Debug)]
pub struct OffloadBridge {
    pool: Option<WorkerPool>,
    stats: Arc<StatsCounters>,
}

impl OffloadBridge {
    /// Probes the host once and starts a worker pool if parallelism is
    /// available and `config.enabled` is set.
    ///
    /// `config.workers == 0` sizes the pool to the available parallelism
    /// minus the calling thread.
    pub fn new(config: &OffloadConfig) -> Self {
        if !config.enabled {
            log::info!("OffloadBridge: disabled by configuration, computations run inline.");
            return Self::inline();
        }

        let parallelism = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        if parallelism <= 1 {
            log::info!("OffloadBridge: no parallelism available, computations run inline.");
            return Self::inline();
        }

        let workers = if config.workers == 0 {
            (parallelism - 1).max(1)
        } else {
            config.workers
        };
        Self::with_workers(workers, config.queue_capacity)
    }

    /// Starts a pool of exactly `workers` threads, regardless of the host.
    ///
    /// Falls back to an inline bridge if the threads cannot be spawned.
    pub fn with_workers(workers: usize, queue_capacity: usize) -> Self {
        match WorkerPool::spawn(workers, queue_capacity) {
            Ok(pool) => {
                log::info!(
                    "OffloadBridge: started {} worker(s), queue capacity {}.",
                    pool.worker_count(),
                    queue_capacity
                );
                Self {
                    pool: Some(pool),
                    stats: Arc::default(),
                }
            }
            Err(e) => {
                log::warn!(
                    "OffloadBridge: could not spawn workers ({e}), computations run inline."
                );
                Self::inline()
            }
        }
    }

    /// A bridge that always runs computations on the calling thread.
    pub fn inline() -> Self {
        Self {
            pool: None,
            stats: Arc::default(),
        }
    }

    /// Whether computations are sent to worker threads.
    pub fn is_available(&self) -> bool {
        self.pool.is_some()
    }

    /// Number of worker threads (0 when inline).
    pub fn worker_count(&self) -> usize {
        self.pool.as_ref().map_or(0, WorkerPool::worker_count)
    }

    /// Counters accumulated since the bridge was created.
    pub fn stats(&self) -> OffloadStats {
        self.stats.snapshot()
    }

    /// Submits `func(payload)`.
    ///
    /// The returned ticket is already resolved when the computation ran
    /// inline. An `Err` from `func` is delivered as
    /// [`ComputeError::Computation`]. A panic in `func` while running inline
    /// unwinds into the caller.
    pub fn compute<P, R, F>(&self, func: F, payload: P) -> ComputeTicket<R>
    where
        P: Serialize + DeserializeOwned + Send + 'static,
        R: Send + 'static,
        F: Fn(P) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        let stats = Arc::clone(&self.stats);
        stats.record_submitted();

        let Some(pool) = &self.pool else {
            stats.record_inline();
            return ComputeTicket::resolved(run_inline(&func, payload), stats);
        };

        let bytes = match codec::encode(&payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!(
                    "OffloadBridge: {}; running computation inline.",
                    WorkerFailure::Encode(e)
                );
                stats.record_fallback();
                return ComputeTicket::resolved(run_inline(&func, payload), stats);
            }
        };

        let func = Arc::new(func);
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);

        let job = {
            let func = Arc::clone(&func);
            Box::new(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    decode_and_run::<P, R, F>(&func, &bytes)
                }));
                let reply = match outcome {
                    Ok(Ok(result)) => WorkerReply::Done(result),
                    Ok(Err(failure)) => WorkerReply::Failed(failure),
                    Err(payload) => {
                        WorkerReply::Failed(WorkerFailure::Panicked(panic_message(&*payload)))
                    }
                };
                // The ticket may be gone already; the reply is then dropped.
                let _ = reply_tx.send(reply);
            })
        };

        match pool.submit(job) {
            Ok(()) => {
                stats.record_offloaded();
                let fallback = Box::new(move || run_inline(&*func, payload));
                ComputeTicket::pending(reply_rx, fallback, stats)
            }
            Err(failure) => {
                log::warn!("OffloadBridge: {failure}; running computation inline.");
                stats.record_fallback();
                ComputeTicket::resolved(run_inline(&*func, payload), stats)
            }
        }
    }

    /// Stops the workers. Queued computations finish first; their results
    /// are dropped if nobody waits for them. Later calls run inline.
    pub fn shutdown(&mut self) {
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
            log::info!("OffloadBridge: workers stopped.");
        }
    }
}

impl Default for OffloadBridge {
    fn default() -> Self {
        Self::new(&OffloadConfig::default())
    }
}

impl Drop for OffloadBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn decode_and_run<P, R, F>(func: &F, bytes: &[u8]) -> Result<anyhow::Result<R>, WorkerFailure>
where
    P: DeserializeOwned,
    F: Fn(P) -> anyhow::Result<R>,
{
    let payload: P = codec::decode(bytes)?;
    Ok(func(payload))
}

fn run_inline<P, R, F>(func: &F, payload: P) -> Result<R, ComputeError>
where
    F: Fn(P) -> anyhow::Result<R>,
{
    func(payload).map_err(ComputeError::Computation)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::TicketPoll;

    fn double(x: i64) -> anyhow::Result<i64> {
        Ok(x * 2)
    }

    #[test]
    fn test_inline_bridge_resolves_immediately() {
        let bridge = OffloadBridge::inline();
        let mut ticket = bridge.compute(double, 21);
        assert!(ticket.is_inline());
        assert!(matches!(ticket.poll(), TicketPoll::Ready(Ok(42))));
        assert!(matches!(ticket.poll(), TicketPoll::Discarded));
        assert_eq!(bridge.stats().inline, 1);
    }

    #[test]
    fn test_disabled_config_is_unavailable() {
        let config = OffloadConfig {
            enabled: false,
            ..OffloadConfig::default()
        };
        let bridge = OffloadBridge::new(&config);
        assert!(!bridge.is_available());
        assert_eq!(bridge.worker_count(), 0);
    }

    #[test]
    fn test_shutdown_makes_bridge_inline() {
        let mut bridge = OffloadBridge::with_workers(1, 4);
        assert!(bridge.is_available());
        bridge.shutdown();
        assert!(!bridge.is_available());
        assert!(bridge.compute(double, 4).is_inline());
    }

    #[test]
    fn test_inline_bridge_never_touches_the_codec() {
        // Encodes but cannot be decoded by a non self-describing format.
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(untagged)]
        enum Input {
            Num(i64),
            Text(String),
        }

        let bridge = OffloadBridge::inline();
        let result = bridge
            .compute(
                |input: Input| match input {
                    Input::Num(n) => Ok(n * 2),
                    Input::Text(_) => anyhow::bail!("not a number"),
                },
                Input::Num(21),
            )
            .wait();
        assert_eq!(result.unwrap(), 42);
        assert_eq!(bridge.stats().fallbacks, 0);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*payload), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }
}
