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

//! Payload encoding for the worker path.
//!
//! The standard bincode configuration keeps floats bit-exact, so a payload
//! that survives the trip reaches the worker unchanged.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes a payload with the standard bincode configuration.
pub fn encode<P: Serialize>(payload: &P) -> Result<Vec<u8>, bincode::error::EncodeError> {
    bincode::serde::encode_to_vec(payload, bincode::config::standard())
}

/// Decodes a payload previously produced by [`encode`].
pub fn decode<P: DeserializeOwned>(bytes: &[u8]) -> Result<P, bincode::error::DecodeError> {
    let (payload, _read) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(payload)
}
