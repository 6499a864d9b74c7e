//! Test doubles shared by the module tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{ErrorKind, PlatformError};
use crate::platform::{NativeSharePayload, Platform};
use crate::request::ShareRequest;
use crate::surface::{ImageArtifact, QrSurface, Surface};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renders `request` with a mounted default surface.
pub(crate) fn artifact(request: &ShareRequest) -> ImageArtifact {
    let surface = QrSurface::default();
    surface.mount();
    surface
        .render(request.payload_url(), request.image_size())
        .expect("render test artifact")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Share {
        file_name: String,
        mime: String,
        title: String,
        text: String,
    },
    Open(String),
    Clipboard(String),
    Save {
        file_name: String,
        data_uri_is_png: bool,
    },
}

/// Records every host call, in order, including the ones it fails.
#[derive(Default)]
pub(crate) struct RecordingPlatform {
    calls: RefCell<Vec<Call>>,
    share_error: Option<PlatformError>,
    fail_open: bool,
    fail_clipboard: bool,
    fail_save: bool,
    /// When set, `share` waits for a notification before settling.
    gate: Option<Rc<Notify>>,
}

impl RecordingPlatform {
    pub(crate) fn with_share_error(mut self, error: PlatformError) -> Self {
        self.share_error = Some(error);
        self
    }

    pub(crate) fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub(crate) fn failing_clipboard(mut self) -> Self {
        self.fail_clipboard = true;
        self
    }

    pub(crate) fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub(crate) fn gated(mut self, gate: Rc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl Platform for RecordingPlatform {
    async fn share(&self, payload: NativeSharePayload<'_>) -> Result<(), PlatformError> {
        self.record(Call::Share {
            file_name: payload.file_name.to_string(),
            mime: payload.mime.to_string(),
            title: payload.title.to_string(),
            text: payload.text.to_string(),
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.share_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        self.record(Call::Open(url.to_string()));
        if self.fail_open {
            return Err(PlatformError::NotAllowed("popup blocked".into()));
        }
        Ok(())
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        self.record(Call::Clipboard(text.to_string()));
        if self.fail_clipboard {
            return Err(PlatformError::NotAllowed("clipboard-write denied".into()));
        }
        Ok(())
    }

    async fn save_file(&self, file_name: &str, data_uri: &str) -> Result<(), PlatformError> {
        self.record(Call::Save {
            file_name: file_name.to_string(),
            data_uri_is_png: data_uri.starts_with("data:image/png;base64,"),
        });
        if self.fail_save {
            return Err(PlatformError::Other("download blocked".into()));
        }
        Ok(())
    }
}

/// A mounted [`QrSurface`] that counts renders.
#[derive(Default)]
pub(crate) struct CountingSurface {
    inner: QrSurface,
    renders: Cell<usize>,
}

impl CountingSurface {
    pub(crate) fn mounted() -> Self {
        let surface = Self::default();
        surface.mount();
        surface
    }

    pub(crate) fn unmounted() -> Self {
        Self::default()
    }

    pub(crate) fn mount(&self) {
        self.inner.mount();
    }

    pub(crate) fn renders(&self) -> usize {
        self.renders.get()
    }
}

impl Surface for CountingSurface {
    fn render(&self, text: &str, size: u32) -> Result<ImageArtifact, ErrorKind> {
        self.renders.set(self.renders.get() + 1);
        self.inner.render(text, size)
    }
}
