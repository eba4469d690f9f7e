// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP client for the music record service.
//!
//! This crate wraps the service's REST interface: creating a record from an
//! artist and song title (optionally naming the original artist of a cover),
//! reading it back by id, updating its original artist and deleting it.
//! Non-success HTTP statuses are reported to the caller as-is rather than
//! turned into errors.

pub mod client;
pub mod error;
pub mod models;

pub use client::{MusicClient, MusicClientBuilder};
pub use error::{MusicError, Result};
pub use models::{Created, Fetched, MusicRecord, OrigArtist};
pub use reqwest::StatusCode;
