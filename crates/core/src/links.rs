//! Anchors in the log display open in the system browser, not the webview.

use std::process::{Command, Stdio};

use async_trait::async_trait;
use url::Url;

use crate::error::{Result, UiError};
use crate::report::{ErrorReporter, ErrorToastOptions};

const WEBVIEW_HOSTS: [&str; 2] = ["wails.localhost", "tauri.localhost"];

pub fn should_open_externally(url: &str) -> bool {
    if url.is_empty() || url.starts_with('#') || url.starts_with('/') {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            if let Some(host) = parsed.host_str() {
                if WEBVIEW_HOSTS.contains(&host) {
                    return false;
                }
            }
        }
        Err(_) => return false,
    }

    if url.starts_with("file://") {
        return false;
    }

    url.contains("://")
}

#[async_trait]
pub trait Opener: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<()>;
}

/// Hands URLs to the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(url: &str) -> Command {
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        }
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

#[async_trait]
impl Opener for SystemOpener {
    async fn open_url(&self, url: &str) -> Result<()> {
        Self::command(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| UiError::Open {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

pub struct ExternalLinkHandler<O: Opener> {
    opener: O,
    reporter: ErrorReporter,
}

impl<O: Opener> ExternalLinkHandler<O> {
    pub fn new(opener: O, reporter: ErrorReporter) -> Self {
        Self { opener, reporter }
    }

    /// Handle a click on an anchor. Returns `true` when the webview must not
    /// follow the link itself.
    pub async fn handle_click(&self, href: &str) -> bool {
        if !should_open_externally(href) {
            return false;
        }
        if let Err(e) = self.opener.open_url(href).await {
            self.reporter
                .show_error_toast(e, ErrorToastOptions::default())
                .await;
        }
        true
    }
}
