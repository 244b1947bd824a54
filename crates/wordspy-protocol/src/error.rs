//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outbound event failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// An inbound frame was not valid JSON or did not match the
    /// `{event, data}` shape.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
