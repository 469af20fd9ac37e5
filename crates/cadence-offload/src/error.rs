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

//! Error types of the offload bridge.

use thiserror::Error;

/// Error surfaced to the caller of a computation.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// The computation itself returned an error. Propagated unchanged on
    /// both the worker and the inline path.
    #[error("computation failed: {0:#}")]
    Computation(anyhow::Error),
    /// The phase the ticket was bound to was released before the result
    /// could be delivered.
    #[error("result discarded: the owning phase was released")]
    Discarded,
}

impl ComputeError {
    /// Returns `true` for [`ComputeError::Discarded`].
    pub fn is_discarded(&self) -> bool {
        matches!(self, ComputeError::Discarded)
    }
}

/// A failure of the worker context rather than of the computation.
///
/// These never reach the caller. The bridge logs them and runs the
/// computation inline instead.
#[derive(Debug, Error)]
pub enum WorkerFailure {
    /// The payload could not be encoded for transfer.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    /// The worker could not decode the payload it received.
    #[error("payload decoding failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    /// Every queue slot is taken.
    #[error("work queue is full")]
    QueueFull,
    /// The pool has shut down.
    #[error("work queue is closed")]
    QueueClosed,
    /// The computation panicked on the worker thread.
    #[error("worker panicked: {0}")]
    Panicked(String),
    /// The worker went away without replying.
    #[error("worker dropped the reply channel")]
    Disconnected,
}
