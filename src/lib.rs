#![deny(clippy::all, clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]
//! # dot5ch
//!
//! dot5ch is a small wrapper around 5ch's `read.cgi` / `bbs.cgi` interface.
//!
//! This library can:
//! - parse thread URLs into a [`ThreadUrl`] and derive the board's endpoints
//! - fetch and parse a board's `subject.txt` into a [`Subject`]
//! - fetch a thread page
//! - post a reply to a thread
//!
//! While respecting:
//! - the site's `Shift_JIS` encoding, both ways.
//! - the headers and cookies a desktop browser would send.
//! - one request per call, `connection: close`, no retries.
//!
//! ## Example: Looking up a thread's title.
//!
//! ```no_run
//! # type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
//! use dot5ch::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::for_url("https://mi.5ch.net/test/read.cgi/news4vip/1667481658/")?;
//!
//!     let (subject, reply) = client.fetch_subject().await?;
//!     let Some(subject) = subject else {
//!         println!("subject.txt unavailable: {}", reply.status());
//!         return Ok(());
//!     };
//!
//!     println!("title: {}", subject.search_title("1667481658"));
//!     Ok(())
//! }
//! ```
//!
//! [`ThreadUrl`]: crate::location::ThreadUrl
//! [`Subject`]:   crate::subject::Subject

/// Client module contains [`Client`] for fetching and posting.
pub mod client;

/// The text codec used on the wire.
pub mod codec;

/// Contains [`ClientConfig`], the client's settings.
///
/// [`ClientConfig`]: crate::config::ClientConfig
pub mod config;

/// Contains [`Error`]s that can be thrown by the libary.
///
/// [`Error`]: crate::error::Error
pub mod error;

/// Builds the form body for a post.
pub mod form;

pub(crate) mod models;

pub(crate) mod result;

pub use client::Client;
pub use models::*;
