//! Chromium-based session using chromiumoxide.

use super::{NavigationResult, RenderSession};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Find the Chromium binary path.
pub fn find_chromium(configured: Option<&Path>) -> Option<PathBuf> {
    // 1. IMDB_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("IMDB_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Config file
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    // 3. ~/.cache/imdb-extract/chromium/
    if let Some(cache) = dirs::cache_dir() {
        let root = cache.join("imdb-extract/chromium");
        let candidates = if cfg!(target_os = "macos") {
            vec![
                root.join("chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                root.join("chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                root.join("chrome"),
            ]
        } else {
            vec![root.join("chrome-linux64/chrome"), root.join("chrome")]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 4. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 5. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Headless Chromium holding at most one open tab.
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
}

impl ChromiumSession {
    /// Launch a headless Chromium instance.
    pub async fn launch(configured: Option<&Path>) -> Result<Self> {
        let chrome_path = find_chromium(configured)
            .context("Chromium not found. Set IMDB_CHROMIUM_PATH or install Chrome.")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Drive the CDP event loop
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            page: None,
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page.as_ref().context("no open tab")
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn open(&mut self, user_agent: &str) -> Result<()> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;
        page.set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .context("failed to set user agent")?;
        self.page = Some(page);
        Ok(())
    }

    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let page = self.page()?;
        let start = Instant::now();

        let result = tokio::time::timeout(Duration::from_millis(timeout_ms), page.goto(url)).await;

        let load_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(_)) => {
                let final_url = page
                    .url()
                    .await
                    .unwrap_or_default()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| url.to_string());

                Ok(NavigationResult {
                    final_url,
                    load_time_ms,
                })
            }
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {timeout_ms}ms"),
        }
    }

    async fn get_html(&self) -> Result<String> {
        let result = self
            .page()?
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to get HTML")?;

        let html: String = result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))?;

        Ok(html)
    }

    async fn reset(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }
        self.browser
            .clear_cookies()
            .await
            .context("failed to clear cookies")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_chromium_prefers_existing_configured_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        if std::env::var("IMDB_CHROMIUM_PATH").is_err() {
            assert_eq!(
                find_chromium(Some(file.path())),
                Some(file.path().to_path_buf())
            );
        }
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_session_round_trip() {
        let mut session = ChromiumSession::launch(None)
            .await
            .expect("failed to launch Chromium");

        session.open("imdb-extract-test").await.expect("open failed");
        let nav = session
            .navigate("data:text/html,<h1>Hello</h1><p>World</p>", 10000)
            .await
            .expect("navigation failed");
        assert!(nav.load_time_ms < 10000);

        let html = session.get_html().await.expect("get_html failed");
        assert!(html.contains("<h1>Hello</h1>"));

        session.reset().await.expect("reset failed");
        assert!(session.get_html().await.is_err());
    }
}
