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

//! Handles to computations that may still be running on a worker.

use crate::error::{ComputeError, WorkerFailure};
use crate::stats::StatsCounters;
use cadence_core::PhaseLiveness;
use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::Arc;

/// What a worker sends back.
pub(crate) enum WorkerReply<R> {
    /// The computation ran; its own result.
    Done(anyhow::Result<R>),
    /// The worker context failed before or while running it.
    Failed(WorkerFailure),
}

/// Re-runs the computation on the calling thread.
pub(crate) type InlineFallback<R> = Box<dyn FnOnce() -> Result<R, ComputeError> + Send>;

enum TicketState<R> {
    Ready(Result<R, ComputeError>),
    Pending {
        reply: Receiver<WorkerReply<R>>,
        fallback: InlineFallback<R>,
    },
    Consumed,
}

/// Outcome of a non-blocking [`ComputeTicket::poll`].
#[derive(Debug)]
pub enum TicketPoll<R> {
    /// The worker has not replied yet.
    Pending,
    /// The result, delivered exactly once.
    Ready(Result<R, ComputeError>),
    /// The bound phase was released, or the result was already taken.
    Discarded,
}

impl<R> TicketPoll<R> {
    /// Returns `true` for [`TicketPoll::Pending`].
    pub fn is_pending(&self) -> bool {
        matches!(self, TicketPoll::Pending)
    }
}

/// Handle to one submitted computation.
///
/// Tickets resolved on the inline path are ready immediately. Worker tickets
/// are polled from a later tick. A ticket bound to a [`PhaseLiveness`] drops
/// its result once the phase is released.
pub struct ComputeTicket<R> {
    state: TicketState<R>,
    inline: bool,
    liveness: Option<PhaseLiveness>,
    stats: Arc<StatsCounters>,
}

impl<R> std::fmt::Debug for ComputeTicket<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            TicketState::Ready(_) => "ready",
            TicketState::Pending { .. } => "pending",
            TicketState::Consumed => "consumed",
        };
        f.debug_struct("ComputeTicket")
            .field("state", &state)
            .field("inline", &self.inline)
            .field("bound", &self.liveness.is_some())
            .finish()
    }
}

impl<R> ComputeTicket<R> {
    pub(crate) fn resolved(result: Result<R, ComputeError>, stats: Arc<StatsCounters>) -> Self {
        Self {
            state: TicketState::Ready(result),
            inline: true,
            liveness: None,
            stats,
        }
    }

    pub(crate) fn pending(
        reply: Receiver<WorkerReply<R>>,
        fallback: InlineFallback<R>,
        stats: Arc<StatsCounters>,
    ) -> Self {
        Self {
            state: TicketState::Pending { reply, fallback },
            inline: false,
            liveness: None,
            stats,
        }
    }

    /// Ties the result to a phase; once the phase is released the result
    /// is discarded instead of delivered.
    pub fn bind(mut self, liveness: PhaseLiveness) -> Self {
        self.liveness = Some(liveness);
        self
    }

    /// Returns `true` if the computation ran (or will run) on the calling thread.
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    fn phase_released(&self) -> bool {
        self.liveness.as_ref().is_some_and(|l| !l.is_alive())
    }

    fn discard(&mut self) -> TicketPoll<R> {
        if !matches!(self.state, TicketState::Consumed) {
            self.stats.record_discarded();
            log::debug!("ComputeTicket: phase released, dropping result.");
        }
        self.state = TicketState::Consumed;
        TicketPoll::Discarded
    }

    /// Checks for the result without blocking.
    pub fn poll(&mut self) -> TicketPoll<R> {
        if self.phase_released() {
            return self.discard();
        }

        match std::mem::replace(&mut self.state, TicketState::Consumed) {
            TicketState::Consumed => TicketPoll::Discarded,
            TicketState::Ready(result) => TicketPoll::Ready(result),
            TicketState::Pending { reply, fallback } => {
                let outcome = match reply.try_recv() {
                    Ok(outcome) => outcome,
                    Err(TryRecvError::Empty) => {
                        self.state = TicketState::Pending { reply, fallback };
                        return TicketPoll::Pending;
                    }
                    Err(TryRecvError::Disconnected) => {
                        WorkerReply::Failed(WorkerFailure::Disconnected)
                    }
                };
                TicketPoll::Ready(self.settle(outcome, fallback))
            }
        }
    }

    /// Blocks until the result is available.
    ///
    /// Returns [`ComputeError::Discarded`] if the bound phase was released
    /// (before or while waiting) or the result was already taken.
    pub fn wait(mut self) -> Result<R, ComputeError> {
        if self.phase_released() {
            self.discard();
            return Err(ComputeError::Discarded);
        }

        let result = match std::mem::replace(&mut self.state, TicketState::Consumed) {
            TicketState::Ready(result) => result,
            TicketState::Pending { reply, fallback } => {
                let reply = reply
                    .recv()
                    .unwrap_or(WorkerReply::Failed(WorkerFailure::Disconnected));
                self.settle(reply, fallback)
            }
            TicketState::Consumed => return Err(ComputeError::Discarded),
        };

        if self.phase_released() {
            self.stats.record_discarded();
            log::debug!("ComputeTicket: phase released, dropping result.");
            return Err(ComputeError::Discarded);
        }
        result
    }

    fn settle(
        &mut self,
        reply: WorkerReply<R>,
        fallback: InlineFallback<R>,
    ) -> Result<R, ComputeError> {
        match reply {
            WorkerReply::Done(result) => result.map_err(ComputeError::Computation),
            WorkerReply::Failed(failure) => {
                log::warn!("Offload worker failed ({failure}); running computation inline.");
                self.stats.record_fallback();
                self.inline = true;
                fallback()
            }
        }
    }
}
