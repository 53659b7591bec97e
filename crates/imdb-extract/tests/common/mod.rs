//! Scripted rendering session for integration tests.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use imdb_extract::renderer::{NavigationResult, RenderSession};
use imdb_extract::{FetchClient, ScraperConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const BASE: &str = "https://imdb.test";

/// What the stub saw, shared with the test body.
#[derive(Debug, Default)]
pub struct SessionLog {
    pub user_agents: Vec<String>,
    pub navigations: Vec<String>,
    pub reads: usize,
    pub reads_by_url: HashMap<String, usize>,
    pub resets: usize,
    pub open_tabs: usize,
    pub max_open_tabs: usize,
}

impl SessionLog {
    pub fn navigations_to(&self, url: &str) -> usize {
        self.navigations.iter().filter(|u| *u == url).count()
    }
}

/// Serves scripted markup per URL. Successive reads of the same URL walk
/// through its responses; the last one repeats.
pub struct StubSession {
    pages: HashMap<String, Vec<String>>,
    current: Option<String>,
    log: Arc<Mutex<SessionLog>>,
}

impl StubSession {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current: None,
            log: Arc::new(Mutex::new(SessionLog::default())),
        }
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), vec![html.to_string()]);
        self
    }

    pub fn pages(mut self, url: &str, responses: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), responses.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn log(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl RenderSession for StubSession {
    async fn open(&mut self, user_agent: &str) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.user_agents.push(user_agent.to_string());
        log.open_tabs += 1;
        log.max_open_tabs = log.max_open_tabs.max(log.open_tabs);
        Ok(())
    }

    async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> Result<NavigationResult> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        if !self.pages.contains_key(url) {
            bail!("navigation failed: net::ERR_NAME_NOT_RESOLVED for {url}");
        }
        self.current = Some(url.to_string());
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 1,
        })
    }

    async fn get_html(&self) -> Result<String> {
        let Some(url) = &self.current else {
            bail!("no page loaded");
        };
        let responses = &self.pages[url];
        let mut log = self.log.lock().unwrap();
        let seen = log.reads_by_url.entry(url.clone()).or_insert(0);
        let idx = (*seen).min(responses.len() - 1);
        *seen += 1;
        log.reads += 1;
        Ok(responses[idx].clone())
    }

    async fn reset(&mut self) -> Result<()> {
        self.current = None;
        let mut log = self.log.lock().unwrap();
        log.resets += 1;
        log.open_tabs = log.open_tabs.saturating_sub(1);
        Ok(())
    }
}

/// Config pointing at the stub host with no waits.
pub fn test_config() -> ScraperConfig {
    ScraperConfig {
        base_url: BASE.to_string(),
        settle_delay_ms: 0,
        retry_delay_ms: 0,
        ..ScraperConfig::default()
    }
}

/// Client over `session` plus a handle to its log.
pub fn client(session: StubSession) -> (FetchClient, Arc<Mutex<SessionLog>>) {
    let log = session.log();
    (FetchClient::new(session, test_config()), log)
}

pub fn title_url(id: &str, path: &str) -> String {
    format!("{BASE}/title/tt{id}/{path}")
}
