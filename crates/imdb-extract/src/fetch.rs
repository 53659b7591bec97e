//! Fetch client: one shared rendering session, one navigation at a time.
//!
//! Every page goes through the same protocol: lock the session, open a tab
//! with the desktop user agent, navigate, wait for client-side rendering,
//! read the markup, re-read once if it is the "enable JavaScript"
//! interstitial, then reset the session before releasing the lock.

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::renderer::chromium::ChromiumSession;
use crate::renderer::RenderSession;
use crate::view::View;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Handle to the process-wide rendering session.
///
/// Cloning is cheap and every clone contends for the same session, so at
/// most one navigation is in flight no matter how many entities exist.
#[derive(Clone)]
pub struct FetchClient {
    session: Arc<Mutex<Box<dyn RenderSession>>>,
    config: Arc<ScraperConfig>,
}

impl FetchClient {
    /// Wrap an existing session.
    pub fn new(session: impl RenderSession + 'static, config: ScraperConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(Box::new(session))),
            config: Arc::new(config),
        }
    }

    /// Launch headless Chromium and wrap it.
    pub async fn launch(config: ScraperConfig) -> Result<Self> {
        let session = ChromiumSession::launch(config.chromium_path.as_deref())
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;
        Ok(Self::new(session, config))
    }

    pub fn config(&self) -> &Arc<ScraperConfig> {
        &self.config
    }

    /// `{base}/title/tt{id}/{view}`
    pub fn title_url(&self, id: &str, view: View) -> String {
        format!("{}/title/tt{}/{}", self.config.base(), id, view.path())
    }

    /// `{base}/{path}` for listing endpoints.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base(), path.trim_start_matches('/'))
    }

    /// Fetch the rendered markup of one view of a title.
    pub async fn fetch(&self, id: &str, view: View) -> Result<String> {
        self.fetch_url(&self.title_url(id, view)).await
    }

    /// Fetch the rendered markup of an arbitrary URL.
    ///
    /// The returned markup may still be the interstitial if the single
    /// re-read did not get past it.
    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        let mut guard = self.session.lock().await;
        let session: &mut dyn RenderSession = &mut **guard;

        debug!("fetching {url}");
        let result = self.render(session, url).await;

        if let Err(e) = session.reset().await {
            warn!("session reset failed after {url}: {e:#}");
        }
        result
    }

    async fn render(&self, session: &mut dyn RenderSession, url: &str) -> Result<String> {
        let config = &self.config;

        session
            .open(&config.user_agent)
            .await
            .map_err(|e| ScrapeError::fetch(url, e))?;
        let nav = session
            .navigate(url, config.navigation_timeout_ms)
            .await
            .map_err(|e| ScrapeError::fetch(url, e))?;
        debug!("navigated to {} in {}ms", nav.final_url, nav.load_time_ms);

        tokio::time::sleep(Duration::from_millis(config.settle_delay_ms)).await;
        let mut html = session
            .get_html()
            .await
            .map_err(|e| ScrapeError::fetch(url, e))?;

        if is_interstitial(&html, &config.interstitial_marker, config.interstitial_tail) {
            debug!("interstitial at {url}, re-reading once");
            tokio::time::sleep(Duration::from_millis(config.retry_delay_ms)).await;
            html = session
                .get_html()
                .await
                .map_err(|e| ScrapeError::fetch(url, e))?;

            if is_interstitial(&html, &config.interstitial_marker, config.interstitial_tail) {
                warn!("interstitial persisted at {url}; returning it as content");
            }
        }

        Ok(html)
    }
}

/// Whether the last `tail` bytes of `html` contain the interstitial marker.
pub fn is_interstitial(html: &str, marker: &str, tail: usize) -> bool {
    let mut start = html.len().saturating_sub(tail);
    while !html.is_char_boundary(start) {
        start += 1;
    }
    html[start..].contains(marker)
}
