//! # qrshare
//!
//! Render a QR code for a URL and share it the best way the host allows.
//!
//! `qrshare` turns a URL into a PNG QR code and runs the "Share" button behind it. The host
//! (a wasm page, a webview, a test) is reached through two small traits, so the dispatch
//! logic never probes or calls the environment directly.
//!
//! ## Features
//!
//! - Deterministic PNG rendering at an exact pixel size, plus a `data:` URI of the same bytes.
//! - One-time capability detection, cached for the session.
//! - Native share sheet with the image attached when the host can share files.
//! - LinkedIn and Twitter share intents, with caption copy and image download for providers
//!   that cannot take text.
//! - Local download with collision-free file names.
//! - A controller that ignores re-entrant clicks and turns every outcome into one notice line.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrshare = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render the image shown on the page:
//!
//! ```rust
//! use qrshare::surface::{QrSurface, Surface};
//!
//! let surface = QrSurface::default();
//! surface.mount();
//! let artifact = surface.render("https://example.com", 220).unwrap();
//! assert!(artifact.data_uri().starts_with("data:image/png;base64,"));
//! ```
//!
//! Decide what a click does:
//!
//! ```rust
//! use qrshare::capability::Capabilities;
//! use qrshare::config::ShareConfig;
//! use qrshare::strategy::{select, Selection, Strategy};
//!
//! // No share API: the user picks from the menu.
//! let selection = select(&Capabilities::NONE, &ShareConfig::default());
//! assert!(matches!(selection, Selection::Menu(ref entries) if entries.last() == Some(&Strategy::Download)));
//! ```
//!
//! ## Modules
//!
//! - [`surface`]: QR rendering into an [`ImageArtifact`].
//! - [`capability`]: host capability detection.
//! - [`platform`]: the host side effects a shell implements.
//! - [`provider`]: share-intent URLs and captions.
//! - [`strategy`]: the strategy chain and selection policy.
//! - [`dispatch`]: the per-QR-code state machine.
//! - [`config`], [`request`], [`error`]: supporting types.

#![forbid(unsafe_code)]

pub mod capability;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod platform;
pub mod provider;
pub mod request;
pub mod strategy;
pub mod surface;

#[cfg(test)]
mod test_support;

pub use capability::{Capabilities, CapabilityDetector, Environment};
pub use config::{Fallback, RenderOptions, ShareConfig};
pub use dispatch::{DispatchController, DispatchState, Notice, NoticeTone, ShareOutcome};
pub use error::{ErrorKind, PlatformError};
pub use platform::{NativeSharePayload, Platform};
pub use provider::Provider;
pub use request::ShareRequest;
pub use strategy::{DispatchResult, Selection, Strategy, StrategyName};
pub use surface::{ImageArtifact, QrSurface, Surface};
