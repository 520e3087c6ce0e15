//! Payload encoding strategies
//!
//! The lifecycle engine is generic over how a payload becomes a request
//! body. Form payloads go out as multipart, JSON payloads as raw JSON.

use crate::error::Result;
use crate::transport::RequestBody;
use crate::types::{FormData, JsonData};
use std::fmt::Debug;

/// Builds the outgoing body and headers for a payload type
pub trait PayloadEncoding: Send + Sync {
    /// Payload this strategy encodes
    type Payload: Clone + Debug + Send + Sync;

    /// Encode the payload into a request body
    fn body(&self, payload: &Self::Payload) -> Result<RequestBody>;

    /// Headers sent with every request of this encoding
    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// `multipart/form-data` encoding for form payloads
///
/// The transport sets the content type (with its boundary) itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipartEncoding;

impl PayloadEncoding for MultipartEncoding {
    type Payload = FormData;

    fn body(&self, payload: &FormData) -> Result<RequestBody> {
        Ok(RequestBody::Multipart(payload.clone()))
    }
}

/// JSON encoding for record payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoding;

impl PayloadEncoding for JsonEncoding {
    type Payload = JsonData;

    fn body(&self, payload: &JsonData) -> Result<RequestBody> {
        Ok(RequestBody::Json(serde_json::to_string(payload)?))
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }
}
