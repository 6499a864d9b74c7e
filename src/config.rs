//! Compile-time constants and the configuration structs built from them.
//!
//! Nothing here is read from disk. A shell that wants different providers, hashtags or
//! colours builds a [`ShareConfig`] by hand, starting from [`ShareConfig::default`].

use image::Luma;
use qrcode::EcLevel;

use crate::provider::Provider;
use crate::strategy::Strategy;

/// Payload rendered when the page URL is not known yet. Inert, never navigated to.
pub const PLACEHOLDER_URL: &str = "about:blank";

pub const DEFAULT_TITLE: &str = "QR Code";
pub const DEFAULT_TEXT: &str = "Scan this QR code";
/// Edge length of the rendered image in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 200;
/// Largest edge length a render accepts. Keeps the raster allocation bounded.
pub const MAX_IMAGE_SIZE: u32 = 4096;

/// MIME type of every artifact this crate produces.
pub const PNG_MIME: &str = "image/png";

pub const LINKEDIN_SHARE_ENDPOINT: &str = "https://www.linkedin.com/sharing/share-offsite/";
pub const TWITTER_SHARE_ENDPOINT: &str = "https://twitter.com/intent/tweet";

/// Raster options for [`QrSurface`](crate::surface::QrSurface).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub error_correction: EcLevel,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
    pub dark: Luma<u8>,
    pub light: Luma<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            error_correction: EcLevel::M,
            margin: 2,
            dark: Luma([0u8]),
            light: Luma([255u8]),
        }
    }
}

/// What a top-level share does when the native file share sheet is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Offer the strategy menu and wait for the user to pick one.
    Menu,
    /// Run one fixed strategy without asking. Used by the single-button Instagram flow,
    /// where the only fallback is a download.
    Direct(Strategy),
}

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// Providers listed in the fallback menu, in display order.
    pub providers: Vec<Provider>,
    /// Hashtags passed to providers that accept them, without the leading `#`.
    pub hashtags: Vec<String>,
    pub fallback: Fallback,
    /// File stem for downloads. A timestamp and sequence number are appended.
    pub download_stem: String,
    /// File name handed to the native share sheet when no hint is set.
    pub share_file_name: String,
    /// Optional file name hint for the native share sheet. Some iOS share targets are said
    /// to react to the `.igo` extension; nothing depends on it.
    pub share_name_hint: Option<String>,
    pub render: RenderOptions,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            providers: vec![Provider::LinkedIn, Provider::Twitter],
            hashtags: Vec::new(),
            fallback: Fallback::Menu,
            download_stem: "qrcode".to_string(),
            share_file_name: "qrcode.png".to_string(),
            share_name_hint: Some("qrcode.igo".to_string()),
            render: RenderOptions::default(),
        }
    }
}

impl ShareConfig {
    /// Configuration of the single-button flow: native share when possible, otherwise an
    /// immediate download. No provider menu.
    pub fn instagram() -> Self {
        Self {
            providers: Vec::new(),
            fallback: Fallback::Direct(Strategy::Download),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_the_menu() {
        let config = ShareConfig::default();
        assert_eq!(config.fallback, Fallback::Menu);
        assert_eq!(config.providers, vec![Provider::LinkedIn, Provider::Twitter]);
    }

    #[test]
    fn test_instagram_config_downloads_directly() {
        let config = ShareConfig::instagram();
        assert_eq!(config.fallback, Fallback::Direct(Strategy::Download));
        assert!(config.providers.is_empty());
    }
}
