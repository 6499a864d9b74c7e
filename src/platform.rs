//! Host side effects.
//!
//! A shell implements [`Platform`] on top of whatever it runs in: `web_sys` calls in a wasm
//! page, plugin commands in a Tauri webview, a recorder in tests. All calls happen on one
//! execution context, so the futures are not required to be `Send`.

use async_trait::async_trait;

use crate::error::PlatformError;

/// What the native share sheet receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSharePayload<'a> {
    pub file_name: &'a str,
    pub mime: &'a str,
    pub bytes: &'a [u8],
    pub title: &'a str,
    pub text: &'a str,
}

#[async_trait(?Send)]
pub trait Platform {
    /// Opens the OS share sheet with a file attachment.
    ///
    /// Resolves once the platform reports the share as completed. A dismissed sheet must be
    /// reported as [`PlatformError::Aborted`] and a refused one as
    /// [`PlatformError::NotAllowed`].
    async fn share(&self, payload: NativeSharePayload<'_>) -> Result<(), PlatformError>;

    /// Opens `url` in a new browsing context. Fire-and-forget.
    fn open_url(&self, url: &str) -> Result<(), PlatformError>;

    async fn write_clipboard(&self, text: &str) -> Result<(), PlatformError>;

    /// Triggers a browser-native save of `data_uri` under `file_name`.
    async fn save_file(&self, file_name: &str, data_uri: &str) -> Result<(), PlatformError>;
}
