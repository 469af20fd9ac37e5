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

//! Fixed-size pool of worker threads fed by a bounded queue.

use crate::error::WorkerFailure;
use crossbeam_channel::{Sender, TrySendError};
use std::io;
use std::thread;

/// A unit of work. Jobs report their own outcome; the pool only runs them.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Prefix of every worker thread name.
pub const WORKER_THREAD_PREFIX: &str = "cadence-offload";

/// Worker threads draining a shared bounded queue.
#[derive(Debug)]
pub(crate) struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `count` workers sharing a queue of `capacity` jobs.
    ///
    /// If any thread fails to spawn, the ones already started are stopped
    /// and the error is returned.
    pub(crate) fn spawn(count: usize, capacity: usize) -> io::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded::<Job>(capacity.max(1));
        let mut workers = Vec::with_capacity(count);

        for index in 0..count.max(1) {
            let rx = rx.clone();
            let spawned = thread::Builder::new()
                .name(format!("{WORKER_THREAD_PREFIX}-{index}"))
                .spawn(move || {
                    log::debug!("Offload worker {} started.", index);
                    for job in rx.iter() {
                        job();
                    }
                    log::debug!("Offload worker {} stopped.", index);
                });

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    drop(tx);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(e);
                }
            }
        }

        Ok(Self {
            sender: Some(tx),
            workers,
        })
    }

    /// Number of worker threads.
    pub(crate) fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queues a job without blocking.
    pub(crate) fn submit(&self, job: Job) -> Result<(), WorkerFailure> {
        let sender = self.sender.as_ref().ok_or(WorkerFailure::QueueClosed)?;
        sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => WorkerFailure::QueueFull,
            TrySendError::Disconnected(_) => WorkerFailure::QueueClosed,
        })
    }

    /// Closes the queue and joins every worker. Queued jobs still run.
    pub(crate) fn shutdown(&mut self) {
        if self.sender.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::warn!("Offload worker terminated abnormally.");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
