//! The share strategy chain.
//!
//! A [`Strategy`] is one way of getting the QR code to the user. [`select`] decides what a
//! single "Share" click does; [`Strategy::attempt`] runs one strategy and always produces
//! exactly one [`DispatchResult`]. Compound strategies run their sub-steps in a fixed order
//! and fold the sub-step outcomes with [`fold_steps`], so a failed clipboard copy or
//! download never hides the fact that the share surface was opened.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;

use crate::capability::Capabilities;
use crate::config::{Fallback, ShareConfig};
use crate::error::{ErrorKind, PlatformError};
use crate::platform::{NativeSharePayload, Platform};
use crate::provider::{compose_caption, Provider};
use crate::request::ShareRequest;
use crate::surface::ImageArtifact;

/// Stable name of a strategy, as reported in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyName {
    NativeShare,
    LinkedIn,
    Twitter,
    Download,
}

impl From<Provider> for StrategyName {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::LinkedIn => StrategyName::LinkedIn,
            Provider::Twitter => StrategyName::Twitter,
        }
    }
}

impl StrategyName {
    /// The provider behind an intent strategy.
    pub fn provider(self) -> Option<Provider> {
        match self {
            StrategyName::LinkedIn => Some(Provider::LinkedIn),
            StrategyName::Twitter => Some(Provider::Twitter),
            StrategyName::NativeShare | StrategyName::Download => None,
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyName::NativeShare => "Native share",
            StrategyName::LinkedIn => "LinkedIn",
            StrategyName::Twitter => "Twitter",
            StrategyName::Download => "Download",
        })
    }
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DispatchResult {
    Succeeded { via: StrategyName },
    /// The primary action worked but a best-effort sub-step did not.
    PartialSuccess { via: StrategyName, note: String },
    Failed { reason: ErrorKind },
    Cancelled,
}

impl DispatchResult {
    pub fn failed(reason: ErrorKind) -> Self {
        DispatchResult::Failed { reason }
    }

    pub fn via(&self) -> Option<StrategyName> {
        match self {
            DispatchResult::Succeeded { via } | DispatchResult::PartialSuccess { via, .. } => Some(*via),
            DispatchResult::Failed { .. } | DispatchResult::Cancelled => None,
        }
    }
}

/// A top-level strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// OS share sheet with the image attached.
    NativeShare,
    /// Provider web intent in a new browsing context.
    PlatformIntent(Provider),
    /// Save the PNG locally. Always eligible.
    Download,
}

/// Everything a strategy needs for one attempt.
pub struct ShareContext<'a, P: ?Sized> {
    pub request: &'a ShareRequest,
    pub artifact: &'a ImageArtifact,
    pub capabilities: Capabilities,
    pub platform: &'a P,
    pub config: &'a ShareConfig,
}

impl Strategy {
    pub fn name(self) -> StrategyName {
        match self {
            Strategy::NativeShare => StrategyName::NativeShare,
            Strategy::PlatformIntent(provider) => provider.into(),
            Strategy::Download => StrategyName::Download,
        }
    }

    pub fn is_eligible(self, capabilities: &Capabilities) -> bool {
        match self {
            Strategy::NativeShare => capabilities.native_file_share,
            Strategy::PlatformIntent(_) | Strategy::Download => true,
        }
    }

    /// Runs this strategy once.
    pub async fn attempt<P: Platform + ?Sized>(self, ctx: &ShareContext<'_, P>) -> DispatchResult {
        if !self.is_eligible(&ctx.capabilities) {
            return DispatchResult::failed(ErrorKind::Unsupported(self.name()));
        }
        log::debug!("attempting {}", self.name());

        match self {
            Strategy::NativeShare => native_share(ctx).await,
            Strategy::PlatformIntent(provider) => platform_intent(provider, ctx).await,
            Strategy::Download => match download_artifact(ctx).await {
                Ok(_) => DispatchResult::Succeeded {
                    via: StrategyName::Download,
                },
                Err(reason) => DispatchResult::failed(reason),
            },
        }
    }
}

async fn native_share<P: Platform + ?Sized>(ctx: &ShareContext<'_, P>) -> DispatchResult {
    if ctx.artifact.is_empty() {
        return DispatchResult::failed(ErrorKind::ArtifactUnavailable);
    }
    let payload = NativeSharePayload {
        file_name: ctx
            .artifact
            .name_hint()
            .unwrap_or(&ctx.config.share_file_name),
        mime: ctx.artifact.mime(),
        bytes: ctx.artifact.bytes(),
        title: ctx.request.title(),
        text: ctx.request.text(),
    };

    match ctx.platform.share(payload).await {
        Ok(()) => DispatchResult::Succeeded {
            via: StrategyName::NativeShare,
        },
        Err(PlatformError::Aborted) => DispatchResult::Cancelled,
        Err(error) => DispatchResult::failed(error.into()),
    }
}

async fn platform_intent<P: Platform + ?Sized>(
    provider: Provider,
    ctx: &ShareContext<'_, P>,
) -> DispatchResult {
    let url = match provider.intent_url(ctx.request, &ctx.config.hashtags) {
        Ok(url) => url,
        Err(reason) => return DispatchResult::failed(reason),
    };
    if let Err(error) = ctx.platform.open_url(url.as_str()) {
        return DispatchResult::failed(error.into());
    }

    let via = StrategyName::from(provider);
    if !provider.needs_manual_attachment() {
        return DispatchResult::Succeeded { via };
    }

    let mut outcomes = Vec::with_capacity(2);
    if SubStep::ClipboardAssist.is_eligible(&ctx.capabilities) {
        let caption = compose_caption(ctx.request);
        let result = ctx
            .platform
            .write_clipboard(&caption)
            .await
            .map_err(ErrorKind::from);
        outcomes.push(StepOutcome {
            step: SubStep::ClipboardAssist,
            result,
        });
    }
    outcomes.push(StepOutcome {
        step: SubStep::Download,
        result: download_artifact(ctx).await.map(|_| ()),
    });

    fold_steps(via, &outcomes)
}

/// Saves the artifact under a fresh name and returns that name.
async fn download_artifact<P: Platform + ?Sized>(ctx: &ShareContext<'_, P>) -> Result<String, ErrorKind> {
    if ctx.artifact.is_empty() {
        return Err(ErrorKind::ArtifactUnavailable);
    }
    let file_name = unique_file_name(&ctx.config.download_stem);
    ctx.platform
        .save_file(&file_name, ctx.artifact.data_uri())
        .await?;
    log::info!("saved QR code as {file_name}");
    Ok(file_name)
}

static DOWNLOAD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// `<stem>-<UTC timestamp with millis>-<sequence>.png`.
///
/// The sequence number is process-wide, so two downloads in the same millisecond still get
/// different names.
pub fn unique_file_name(stem: &str) -> String {
    let sequence = DOWNLOAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{stem}-{}-{sequence}.png", Utc::now().format("%Y%m%d%H%M%S%3f"))
}

/*---- Sub-steps ----*/

/// Best-effort steps run after a provider intent has been opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubStep {
    /// Copy the caption. Never offered as a top-level strategy.
    ClipboardAssist,
    Download,
}

impl SubStep {
    pub fn is_eligible(self, capabilities: &Capabilities) -> bool {
        match self {
            SubStep::ClipboardAssist => capabilities.clipboard_write,
            SubStep::Download => true,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SubStep::ClipboardAssist => "clipboard copy",
            SubStep::Download => "image download",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: SubStep,
    pub result: Result<(), ErrorKind>,
}

/// Folds sub-step outcomes into the result of a primary action that already succeeded.
///
/// Sub-step failures never turn the result into `Failed`; they only produce a
/// `PartialSuccess` whose note says what the user has to do by hand.
pub fn fold_steps(via: StrategyName, outcomes: &[StepOutcome]) -> DispatchResult {
    let failed: Vec<SubStep> = outcomes
        .iter()
        .filter_map(|outcome| match &outcome.result {
            Ok(()) => None,
            Err(error) => {
                log::warn!("{via}: {} failed: {error}", outcome.step.label());
                Some(outcome.step)
            }
        })
        .collect();

    if failed.is_empty() {
        return DispatchResult::Succeeded { via };
    }

    let what = failed
        .iter()
        .map(|step| step.label())
        .collect::<Vec<_>>()
        .join(" and ");
    let clipboard_failed = failed.contains(&SubStep::ClipboardAssist);
    let download_failed = failed.contains(&SubStep::Download);
    let remedy = match (clipboard_failed, download_failed) {
        (true, true) => "add the caption and download the QR code manually",
        (true, false) => "add the caption manually",
        _ => "download the QR code manually",
    };

    DispatchResult::PartialSuccess {
        via,
        note: format!("Opened {via}, but {what} failed; {remedy}."),
    }
}

/*---- Selection ----*/

/// What a single "Share" click should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Run this strategy right away.
    Run(Strategy),
    /// Show these strategies and wait for the user's pick.
    Menu(Vec<Strategy>),
}

/// Native share when the host can share the image file; otherwise the configured fallback.
///
/// The default fallback is the menu. Non-native strategies have visible side effects (a new
/// tab, a file on disk), so they are not picked without the user.
pub fn select(capabilities: &Capabilities, config: &ShareConfig) -> Selection {
    if Strategy::NativeShare.is_eligible(capabilities) {
        return Selection::Run(Strategy::NativeShare);
    }
    match &config.fallback {
        Fallback::Menu => Selection::Menu(menu(capabilities, config)),
        Fallback::Direct(strategy) => Selection::Run(*strategy),
    }
}

/// Menu entries in display order: native share when eligible, each configured provider,
/// then download.
pub fn menu(capabilities: &Capabilities, config: &ShareConfig) -> Vec<Strategy> {
    let mut entries = Vec::with_capacity(config.providers.len() + 2);
    if Strategy::NativeShare.is_eligible(capabilities) {
        entries.push(Strategy::NativeShare);
    }
    entries.extend(config.providers.iter().copied().map(Strategy::PlatformIntent));
    entries.push(Strategy::Download);
    entries
}
