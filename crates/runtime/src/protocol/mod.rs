//! Messages exchanged between the authoritative and observer roles.
//!
//! Framing, delivery and transport belong to the host. This module defines
//! the payload schema and the bincode wire encoding.

mod codec;
mod messages;

pub use codec::{CodecError, WireCodec};
pub use messages::{ClientMessage, ServerMessage, Snapshot};
