//! Error types for rendering and share dispatch.
//!
//! [`ErrorKind`] is the taxonomy reported to callers through
//! [`DispatchResult::Failed`](crate::strategy::DispatchResult). [`PlatformError`] is what a
//! host [`Platform`](crate::platform::Platform) returns; it is folded into an `ErrorKind` by
//! the strategy that made the call.

use serde::Serialize;

use crate::strategy::StrategyName;

/// Why a render or a dispatch did not complete.
///
/// Every failure is scoped to a single dispatch and leaves the controller idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ErrorKind {
    /// The image surface is not mounted yet.
    #[error("The QR code is not ready yet. Try again in a moment.")]
    SurfaceUnavailable,

    /// The platform refused the share or the clipboard write.
    #[error("Sharing was blocked by the browser. Check the site permissions.")]
    PermissionDenied,

    /// Explicit user abort. Reported as [`DispatchResult::Cancelled`](crate::strategy::DispatchResult::Cancelled)
    /// at the top level; only sub-steps carry it as an error.
    #[error("Sharing was cancelled.")]
    Cancelled,

    /// The PNG bytes could not be produced.
    #[error("The QR code image could not be created.")]
    ArtifactUnavailable,

    /// The strategy is not eligible on this device.
    #[error("{0} is not available on this device.")]
    Unsupported(StrategyName),

    /// The request cannot be dispatched as given.
    #[error("Nothing to share: {0}.")]
    InvalidRequest(String),

    /// Opaque platform failure, message passed through.
    #[error("{0}")]
    Unknown(String),
}

/// Failure reported by a host [`Platform`](crate::platform::Platform) call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The user dismissed the native share sheet.
    #[error("share aborted by user")]
    Aborted,

    /// The host denied access (share sheet, clipboard, or download).
    #[error("not allowed: {0}")]
    NotAllowed(String),

    #[error("{0}")]
    Other(String),
}

impl From<PlatformError> for ErrorKind {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::Aborted => ErrorKind::Cancelled,
            PlatformError::NotAllowed(_) => ErrorKind::PermissionDenied,
            PlatformError::Other(message) => ErrorKind::Unknown(message),
        }
    }
}

impl From<image::ImageError> for ErrorKind {
    fn from(error: image::ImageError) -> Self {
        log::warn!("PNG encoding failed: {error}");
        ErrorKind::ArtifactUnavailable
    }
}

impl From<qrcode::types::QrError> for ErrorKind {
    fn from(error: qrcode::types::QrError) -> Self {
        log::warn!("QR encoding failed: {error}");
        ErrorKind::ArtifactUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_errors_map_to_taxonomy() {
        assert_eq!(ErrorKind::from(PlatformError::Aborted), ErrorKind::Cancelled);
        assert_eq!(
            ErrorKind::from(PlatformError::NotAllowed("NotAllowedError".into())),
            ErrorKind::PermissionDenied
        );
        assert_eq!(
            ErrorKind::from(PlatformError::Other("boom".into())),
            ErrorKind::Unknown("boom".into())
        );
    }

    #[test]
    fn test_unknown_message_is_passed_through_verbatim() {
        assert_eq!(ErrorKind::Unknown("share target crashed".into()).to_string(), "share target crashed");
    }

    #[test]
    fn test_unsupported_names_the_strategy() {
        let message = ErrorKind::Unsupported(StrategyName::NativeShare).to_string();
        assert_eq!(message, "Native share is not available on this device.");
    }
}
