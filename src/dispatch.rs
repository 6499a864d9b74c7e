//! The dispatch controller.
//!
//! One controller sits behind one QR code on the page. It owns the busy flag and the notice
//! line the shell displays, and it guarantees that at most one share runs at a time:
//!
//! ```text
//! Idle --share/choose/download--> Pending --result--> Idle
//!                                    |
//!                                    +-- any trigger while Pending is ignored
//! ```

use std::cell::{Cell, RefCell};

use serde::Serialize;

use crate::capability::{session_capabilities, Capabilities, Environment};
use crate::config::{ShareConfig, PLACEHOLDER_URL};
use crate::error::ErrorKind;
use crate::platform::Platform;
use crate::request::ShareRequest;
use crate::strategy::{select, DispatchResult, Selection, ShareContext, Strategy, StrategyName};
use crate::surface::{ImageArtifact, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeTone {
    Info,
    Warning,
    Error,
}

/// The one line of feedback shown under the share button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub tone: NoticeTone,
    pub message: String,
}

impl Notice {
    fn new(tone: NoticeTone, message: impl Into<String>) -> Self {
        Self {
            tone,
            message: message.into(),
        }
    }

    /// Maps a finished dispatch to what the user sees. `None` means stay silent.
    pub fn for_result(result: &DispatchResult) -> Option<Self> {
        match result {
            DispatchResult::Succeeded { via } => match (via, via.provider()) {
                (StrategyName::Download, _) => Some(Self::new(NoticeTone::Info, "QR code downloaded.")),
                (_, Some(provider)) if provider.needs_manual_attachment() => Some(Self::new(
                    NoticeTone::Info,
                    format!("QR code downloaded. Attach it to your {provider} post."),
                )),
                _ => None,
            },
            DispatchResult::PartialSuccess { note, .. } => Some(Self::new(NoticeTone::Warning, note.clone())),
            DispatchResult::Failed { reason } => Some(Self::new(NoticeTone::Error, reason.to_string())),
            DispatchResult::Cancelled => None,
        }
    }
}

/// What a trigger produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// A dispatch was already pending; nothing happened.
    Ignored,
    /// The user has to pick one of these strategies, then call
    /// [`DispatchController::choose`].
    Menu(Vec<Strategy>),
    Completed(DispatchResult),
}

/// Marks the controller pending for as long as it lives.
///
/// Dropping it (normally, or because the dispatch future was dropped) returns the controller
/// to idle.
struct PendingGuard<'a> {
    state: &'a Cell<DispatchState>,
}

impl<'a> PendingGuard<'a> {
    fn enter(state: &'a Cell<DispatchState>) -> Option<Self> {
        if state.get() == DispatchState::Pending {
            return None;
        }
        state.set(DispatchState::Pending);
        Some(Self { state })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(DispatchState::Idle);
    }
}

/// Coordinates share requests for one QR code.
///
/// The controller is single-threaded: its methods take `&self` so a shell can fire a second
/// trigger while the first one is awaiting the platform, and that second trigger is ignored.
///
/// # Example
///
/// ```rust,ignore
/// use qrshare::{DispatchController, QrSurface, ShareConfig, ShareOutcome, ShareRequest};
///
/// let controller = DispatchController::with_environment(
///     QrSurface::default(),
///     BrowserPlatform::new(),
///     &BrowserEnvironment::new(),
///     ShareConfig::default(),
/// );
/// controller.surface().mount();
///
/// let request = ShareRequest::new(page_url).with_title("Share this page");
/// match controller.share(&request).await {
///     ShareOutcome::Menu(entries) => show_menu(entries),
///     _ => render_notice(controller.notice()),
/// }
/// ```
pub struct DispatchController<S, P> {
    surface: S,
    platform: P,
    capabilities: Capabilities,
    config: ShareConfig,
    state: Cell<DispatchState>,
    notice: RefCell<Option<Notice>>,
}

impl<S: Surface, P: Platform> DispatchController<S, P> {
    pub fn new(surface: S, platform: P, capabilities: Capabilities, config: ShareConfig) -> Self {
        Self {
            surface,
            platform,
            capabilities,
            config,
            state: Cell::new(DispatchState::Idle),
            notice: RefCell::new(None),
        }
    }

    /// Builds a controller with the session-wide capabilities of `env`.
    pub fn with_environment(surface: S, platform: P, env: &dyn Environment, config: ShareConfig) -> Self {
        Self::new(surface, platform, session_capabilities(env), config)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    pub fn state(&self) -> DispatchState {
        self.state.get()
    }

    pub fn is_busy(&self) -> bool {
        self.state() == DispatchState::Pending
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.borrow().clone()
    }

    /// The current notice text when it reports a failure.
    pub fn error(&self) -> Option<String> {
        self.notice
            .borrow()
            .as_ref()
            .filter(|notice| notice.tone == NoticeTone::Error)
            .map(|notice| notice.message.clone())
    }

    /// Renders the artifact the shell embeds on the page. Does not touch dispatch state.
    pub fn preview(&self, payload_url: &str, size: u32) -> Result<ImageArtifact, ErrorKind> {
        let text = if payload_url.trim().is_empty() {
            PLACEHOLDER_URL
        } else {
            payload_url
        };
        self.surface.render(text, size)
    }

    /// Handles the single "Share" button.
    ///
    /// Runs the native share sheet when the host can share the image; otherwise returns the
    /// strategy menu (or, in the single-button configuration, runs its fixed fallback).
    pub async fn share(&self, request: &ShareRequest) -> ShareOutcome {
        if self.is_busy() {
            log::debug!("share ignored, a dispatch is pending");
            return ShareOutcome::Ignored;
        }
        match select(&self.capabilities, &self.config) {
            Selection::Run(strategy) => self.dispatch(request, strategy).await,
            Selection::Menu(entries) => {
                log::debug!("native file share unavailable, offering {} strategies", entries.len());
                ShareOutcome::Menu(entries)
            }
        }
    }

    /// Runs the strategy the user picked from the menu.
    pub async fn choose(&self, request: &ShareRequest, strategy: Strategy) -> ShareOutcome {
        self.dispatch(request, strategy).await
    }

    /// Handles the explicit "Download" button.
    pub async fn download(&self, request: &ShareRequest) -> ShareOutcome {
        self.dispatch(request, Strategy::Download).await
    }

    async fn dispatch(&self, request: &ShareRequest, strategy: Strategy) -> ShareOutcome {
        let Some(_pending) = PendingGuard::enter(&self.state) else {
            log::debug!("{} ignored, a dispatch is pending", strategy.name());
            return ShareOutcome::Ignored;
        };
        self.notice.replace(None);

        let result = match self.surface.render(request.payload_url(), request.image_size()) {
            Ok(artifact) => {
                let artifact = artifact.with_name_hint(self.config.share_name_hint.clone());
                let ctx = ShareContext {
                    request,
                    artifact: &artifact,
                    capabilities: self.capabilities,
                    platform: &self.platform,
                    config: &self.config,
                };
                strategy.attempt(&ctx).await
            }
            Err(reason) => DispatchResult::failed(reason),
        };

        match &result {
            DispatchResult::Succeeded { via } => log::info!("shared via {via}"),
            DispatchResult::PartialSuccess { via, note } => log::info!("shared via {via} with issues: {note}"),
            DispatchResult::Failed { reason } => log::warn!("{} failed: {reason:?}", strategy.name()),
            DispatchResult::Cancelled => log::debug!("{} cancelled by user", strategy.name()),
        }
        self.notice.replace(Notice::for_result(&result));

        ShareOutcome::Completed(result)
    }
}
