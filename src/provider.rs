//! Share-intent providers and their URL formats.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::config::{LINKEDIN_SHARE_ENDPOINT, TWITTER_SHARE_ENDPOINT};
use crate::error::ErrorKind;
use crate::request::ShareRequest;

/// An external platform with a web share-intent endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Provider {
    /// Professional network. The intent only takes a `url` parameter.
    LinkedIn,
    /// Microblog. The intent takes `url`, `text` and `hashtags`.
    Twitter,
}

impl Provider {
    pub fn endpoint(self) -> &'static str {
        match self {
            Provider::LinkedIn => LINKEDIN_SHARE_ENDPOINT,
            Provider::Twitter => TWITTER_SHARE_ENDPOINT,
        }
    }

    /// Whether the intent accepts a text/description parameter.
    pub fn supports_text(self) -> bool {
        match self {
            Provider::LinkedIn => false,
            Provider::Twitter => true,
        }
    }

    /// Providers without text support get the caption and image through the clipboard and a
    /// download instead, so the user can attach them by hand.
    pub fn needs_manual_attachment(self) -> bool {
        !self.supports_text()
    }

    /// Builds the intent URL for `request`.
    ///
    /// Parameters a provider does not support are left out.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidRequest`] while the request still carries the placeholder URL.
    pub fn intent_url(self, request: &ShareRequest, hashtags: &[String]) -> Result<Url, ErrorKind> {
        if request.is_placeholder() {
            return Err(ErrorKind::InvalidRequest("the page address is not known yet".into()));
        }

        let mut params: Vec<(&str, String)> = vec![("url", request.payload_url().to_string())];
        if self.supports_text() {
            if !request.text().is_empty() {
                params.push(("text", request.text().to_string()));
            }
            if !hashtags.is_empty() {
                params.push(("hashtags", hashtags.join(",")));
            }
        }

        Url::parse_with_params(self.endpoint(), &params)
            .map_err(|e| ErrorKind::Unknown(format!("invalid {self} share endpoint: {e}")))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::LinkedIn => "LinkedIn",
            Provider::Twitter => "Twitter",
        })
    }
}

/// Caption copied to the clipboard for providers that cannot take text.
///
/// Text, then the title when it adds something, then the URL, one per line.
pub fn compose_caption(request: &ShareRequest) -> String {
    let text = request.text().trim();
    let title = request.title().trim();

    let mut lines: Vec<&str> = Vec::with_capacity(3);
    if !text.is_empty() {
        lines.push(text);
    }
    if !title.is_empty() && title != text {
        lines.push(title);
    }
    lines.push(request.payload_url().trim());

    lines.join("\n").trim().to_string()
}
