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

//! # Cadence Offload
//!
//! Moves pure, serializable computations onto worker threads and falls back
//! to running them on the calling thread whenever no worker can take them.
//!
//! ```
//! use cadence_offload::OffloadBridge;
//!
//! let bridge = OffloadBridge::inline();
//! let ticket = bridge.compute(|x: u32| Ok(x * 2), 21);
//! assert_eq!(ticket.wait().unwrap(), 42);
//! ```

#![warn(missing_docs)]

pub mod bridge;
pub mod codec;
pub mod error;
mod pool;
mod stats;
pub mod ticket;

pub use bridge::OffloadBridge;
pub use error::{ComputeError, WorkerFailure};
pub use pool::WORKER_THREAD_PREFIX;
pub use stats::OffloadStats;
pub use ticket::{ComputeTicket, TicketPoll};
