//! Capability detection.
//!
//! The host is probed once through [`Environment`] and the answer is frozen into a
//! [`Capabilities`] value that strategies receive as an argument. Strategies never probe the
//! host themselves.

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::config::PNG_MIME;

/// Which sharing mechanisms the host can use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// A generic share entry point exists.
    pub native_share: bool,
    /// The share entry point affirms it can take an image file.
    pub native_file_share: bool,
    pub clipboard_write: bool,
}

impl Capabilities {
    /// Nothing available. Every share falls back to the menu or a download.
    pub const NONE: Capabilities = Capabilities {
        native_share: false,
        native_file_share: false,
        clipboard_write: false,
    };
}

/// Raw feature probes on the host.
///
/// Each probe answers `Some(true)` / `Some(false)`, or `None` when the host cannot tell.
/// `None` is treated as unavailable.
pub trait Environment {
    /// Whether a generic share entry point is exposed.
    fn has_share(&self) -> Option<bool>;

    /// Whether the share entry point accepts a file object of the given MIME type.
    fn can_share_file(&self, mime: &str) -> Option<bool>;

    /// Whether text can be written to the clipboard.
    fn has_clipboard_write(&self) -> Option<bool>;
}

/// Probes `env` without caching.
pub fn probe(env: &dyn Environment) -> Capabilities {
    let native_share = env.has_share() == Some(true);
    // A share entry point alone is not enough: the host must affirm file support.
    let native_file_share = native_share && env.can_share_file(PNG_MIME) == Some(true);
    let clipboard_write = env.has_clipboard_write() == Some(true);

    Capabilities {
        native_share,
        native_file_share,
        clipboard_write,
    }
}

/// Memoizes the first probe result.
#[derive(Debug, Default)]
pub struct CapabilityDetector {
    detected: OnceCell<Capabilities>,
}

impl CapabilityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached capabilities, probing `env` on the first call only.
    pub fn detect(&self, env: &dyn Environment) -> Capabilities {
        *self.detected.get_or_init(|| {
            let capabilities = probe(env);
            log::debug!("detected share capabilities: {capabilities:?}");
            capabilities
        })
    }

    pub fn cached(&self) -> Option<Capabilities> {
        self.detected.get().copied()
    }
}

static SESSION: OnceCell<Capabilities> = OnceCell::new();

/// Process-wide capabilities, detected on first use and read-only afterwards.
pub fn session_capabilities(env: &dyn Environment) -> Capabilities {
    *SESSION.get_or_init(|| {
        let capabilities = probe(env);
        log::info!("session share capabilities: {capabilities:?}");
        capabilities
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeEnv {
        share: Option<bool>,
        files: Option<bool>,
        clipboard: Option<bool>,
        probes: Cell<usize>,
    }

    impl FakeEnv {
        fn new(share: Option<bool>, files: Option<bool>, clipboard: Option<bool>) -> Self {
            Self {
                share,
                files,
                clipboard,
                probes: Cell::new(0),
            }
        }
    }

    impl Environment for FakeEnv {
        fn has_share(&self) -> Option<bool> {
            self.probes.set(self.probes.get() + 1);
            self.share
        }

        fn can_share_file(&self, mime: &str) -> Option<bool> {
            assert_eq!(mime, "image/png");
            self.files
        }

        fn has_clipboard_write(&self) -> Option<bool> {
            self.clipboard
        }
    }

    #[test]
    fn test_file_share_needs_both_entry_point_and_file_support() {
        let caps = probe(&FakeEnv::new(Some(true), Some(true), Some(true)));
        assert!(caps.native_share && caps.native_file_share && caps.clipboard_write);

        let caps = probe(&FakeEnv::new(Some(true), Some(false), None));
        assert!(caps.native_share);
        assert!(!caps.native_file_share);

        let caps = probe(&FakeEnv::new(Some(true), None, None));
        assert!(!caps.native_file_share);

        // File support claimed without a share entry point does not count.
        let caps = probe(&FakeEnv::new(Some(false), Some(true), None));
        assert!(!caps.native_share);
        assert!(!caps.native_file_share);
    }

    #[test]
    fn test_ambiguous_environment_reports_nothing() {
        assert_eq!(probe(&FakeEnv::new(None, None, None)), Capabilities::NONE);
    }

    #[test]
    fn test_detection_is_memoized() {
        let detector = CapabilityDetector::new();
        assert_eq!(detector.cached(), None);

        let env = FakeEnv::new(Some(true), Some(true), Some(false));
        let first = detector.detect(&env);
        let second = detector.detect(&env);
        assert_eq!(first, second);
        assert_eq!(env.probes.get(), 1);

        // A different environment later in the session does not change the answer.
        let later = detector.detect(&FakeEnv::new(None, None, None));
        assert_eq!(later, first);
        assert_eq!(detector.cached(), Some(first));
    }

    #[test]
    fn test_session_capabilities_are_write_once() {
        let first = session_capabilities(&FakeEnv::new(Some(true), Some(false), Some(true)));
        let second = session_capabilities(&FakeEnv::new(None, None, None));
        assert_eq!(first, second);
    }

    #[test]
    fn test_capabilities_serialize_camel_case() {
        let value = serde_json::to_value(Capabilities {
            native_share: true,
            native_file_share: false,
            clipboard_write: true,
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({"nativeShare": true, "nativeFileShare": false, "clipboardWrite": true})
        );
    }
}
