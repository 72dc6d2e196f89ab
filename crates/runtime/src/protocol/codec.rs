//! Bincode wire encoding.

use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{ClientMessage, ServerMessage};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode frame: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode frame: {0}")]
    Decode(#[source] bincode::Error),
}

/// Encodes protocol messages into frames and back.
///
/// Frames are capped at [`WireCodec::MAX_FRAME_BYTES`]; larger or malformed
/// input fails to decode instead of allocating.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl WireCodec {
    pub const MAX_FRAME_BYTES: u64 = 64 * 1024;

    fn options() -> impl Options {
        bincode::DefaultOptions::new().with_limit(Self::MAX_FRAME_BYTES)
    }

    pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
        Self::options().serialize(value).map_err(CodecError::Encode)
    }

    pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
        Self::options().deserialize(bytes).map_err(CodecError::Decode)
    }

    pub fn encode_client(message: &ClientMessage) -> Result<Vec<u8>, CodecError> {
        Self::encode(message)
    }

    pub fn decode_client(bytes: &[u8]) -> Result<ClientMessage, CodecError> {
        Self::decode(bytes)
    }

    pub fn encode_server(message: &ServerMessage) -> Result<Vec<u8>, CodecError> {
        Self::encode(message)
    }

    pub fn decode_server(bytes: &[u8]) -> Result<ServerMessage, CodecError> {
        Self::decode(bytes)
    }
}
