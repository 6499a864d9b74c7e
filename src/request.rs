use crate::config::{DEFAULT_IMAGE_SIZE, DEFAULT_TEXT, DEFAULT_TITLE, MAX_IMAGE_SIZE, PLACEHOLDER_URL};
use crate::error::ErrorKind;

/// One share trigger. Built fresh on every click and never mutated afterwards.
///
/// # Example
///
/// ```rust
/// use qrshare::request::ShareRequest;
///
/// let request = ShareRequest::new("https://example.com")
///     .with_title("Share this page")
///     .with_image_size(300)
///     .unwrap();
/// assert_eq!(request.image_size(), 300);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    payload_url: String,
    title: String,
    text: String,
    image_size: u32,
}

impl ShareRequest {
    /// Creates a request with the default title, text and size.
    ///
    /// A blank `payload_url` is replaced by [`PLACEHOLDER_URL`] so the surface always has
    /// something to encode.
    pub fn new(payload_url: impl Into<String>) -> Self {
        let payload_url = payload_url.into();
        let payload_url = if payload_url.trim().is_empty() {
            PLACEHOLDER_URL.to_string()
        } else {
            payload_url
        };
        Self {
            payload_url,
            title: DEFAULT_TITLE.to_string(),
            text: DEFAULT_TEXT.to_string(),
            image_size: DEFAULT_IMAGE_SIZE,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// # Errors
    ///
    /// [`ErrorKind::InvalidRequest`] when `size` is zero or above [`MAX_IMAGE_SIZE`].
    pub fn with_image_size(mut self, size: u32) -> Result<Self, ErrorKind> {
        if size == 0 {
            return Err(ErrorKind::InvalidRequest("image size must be positive".into()));
        }
        if size > MAX_IMAGE_SIZE {
            return Err(ErrorKind::InvalidRequest(format!(
                "image size must be at most {MAX_IMAGE_SIZE} pixels"
            )));
        }
        self.image_size = size;
        Ok(self)
    }

    pub fn payload_url(&self) -> &str {
        &self.payload_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// True while the real page URL is unknown.
    pub fn is_placeholder(&self) -> bool {
        self.payload_url == PLACEHOLDER_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_the_share_button() {
        let request = ShareRequest::new("https://example.com");
        assert_eq!(request.title(), "QR Code");
        assert_eq!(request.text(), "Scan this QR code");
        assert_eq!(request.image_size(), 200);
        assert!(!request.is_placeholder());
    }

    #[test]
    fn test_blank_url_becomes_placeholder() {
        let request = ShareRequest::new("   ");
        assert_eq!(request.payload_url(), "about:blank");
        assert!(request.is_placeholder());
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let result = ShareRequest::new("https://example.com").with_image_size(0);
        assert!(matches!(result, Err(ErrorKind::InvalidRequest(_))));
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let request = ShareRequest::new("https://example.com");
        assert!(request.clone().with_image_size(MAX_IMAGE_SIZE).is_ok());
        for size in [MAX_IMAGE_SIZE + 1, 100_000, u32::MAX] {
            let result = request.clone().with_image_size(size);
            assert!(matches!(result, Err(ErrorKind::InvalidRequest(_))), "size {size}");
        }
    }
}
