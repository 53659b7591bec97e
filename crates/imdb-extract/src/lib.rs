// Copyright 2026 imdb-extract Contributors
// SPDX-License-Identifier: Apache-2.0

//! Resilient extraction of IMDb title data through a rendered browser session.
//!
//! Titles are lazy: constructing one performs no I/O. Each attribute accessor
//! fetches the page variant it needs once, caches it on the instance, and
//! degrades to an empty value when the markup does not have what it expects.
//!
//! ```no_run
//! # async fn demo() -> imdb_extract::Result<()> {
//! use imdb_extract::{FetchClient, Movie, ScraperConfig};
//!
//! let client = FetchClient::launch(ScraperConfig::default().apply_env()).await?;
//! let mut movie = Movie::new(client.clone(), "0095016");
//! println!("{:?} ({:?})", movie.title(false).await, movie.year().await);
//!
//! for hit in imdb_extract::search(&client, "Die Hard").await? {
//!     println!("{}", hit.id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collections;
pub mod config;
pub mod entity;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod listing;
pub mod renderer;
pub mod sanitize;
pub mod title;
pub mod view;

pub use collections::{box_office, search, top_ranked, BoxOffice, Search, TopRanked};
pub use config::{ScraperConfig, Selectors};
pub use entity::{Entity, EntityKind, Episode, Movie, Season, Series};
pub use error::{Result, ScrapeError};
pub use extract::AlsoKnownAs;
pub use fetch::FetchClient;
pub use listing::TitleRef;
pub use title::TitlePage;
pub use view::View;
