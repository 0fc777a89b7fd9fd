use serde::Serialize;

/// The `{message}` body used by every error response and by the endpoints
/// whose success payload is a bare message.
///
/// The wire shapes of this API are flat (`{"message": ...}`,
/// `{"totalLectures": ...}`, ...); payload-specific structs live next to
/// their route group, and this type covers the message-only case.
#[derive(Debug, Serialize, Default)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
