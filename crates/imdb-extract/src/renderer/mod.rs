//! Rendering session abstraction.
//!
//! A `RenderSession` is one browser tab slot that the fetch client drives
//! through open → navigate → read → reset. The only production backend is
//! Chromium via chromiumoxide; tests substitute a scripted session.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A single, non-reentrant browser session.
///
/// Implementations are not expected to tolerate interleaved calls; the fetch
/// client guarantees exclusive access for the whole open..reset sequence.
#[async_trait]
pub trait RenderSession: Send {
    /// Open a fresh tab identifying itself with `user_agent`.
    async fn open(&mut self, user_agent: &str) -> Result<()>;
    /// Navigate the open tab to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;
    /// Get the full rendered HTML of the open tab.
    async fn get_html(&self) -> Result<String>;
    /// Close the tab and clear navigation state.
    async fn reset(&mut self) -> Result<()>;
}
