//! Resolved photo record.

use serde::{Deserialize, Serialize};

/// One displayable image resolved from the shared-album backend.
///
/// This is a URL plus the pixel dimensions of the chosen derivative, not
/// raw image bytes; the display layer fetches the bytes itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Fully-qualified `https://` URL of the derivative.
    pub url: String,
    /// Pixel width of the derivative.
    pub width: u32,
    /// Pixel height of the derivative.
    pub height: u32,
}

impl Photo {
    /// Creates a new photo record.
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }
}
