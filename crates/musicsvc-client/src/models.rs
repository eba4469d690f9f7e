// SPDX-License-Identifier: GPL-3.0-or-later

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A music record as stored by the service.
///
/// The same shape is used for request bodies and for the entries of the
/// `Items` array returned by a read. The id is only ever filled in from a
/// service response; records built with [`MusicRecord::new`] have none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MusicRecord {
    /// Performing artist.
    #[serde(rename = "Artist")]
    pub artist: String,
    /// Title of the song.
    #[serde(rename = "SongTitle")]
    pub song_title: String,
    /// Performer of the original recording, present only for covers.
    #[serde(
        rename = "OrigArtist",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub orig_artist: Option<String>,
    #[serde(
        rename = "music_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    id: Option<String>,
}

impl MusicRecord {
    pub fn new(artist: impl Into<String>, song_title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            song_title: song_title.into(),
            orig_artist: None,
            id: None,
        }
    }

    pub fn orig_artist(mut self, orig_artist: impl Into<String>) -> Self {
        self.orig_artist = Some(orig_artist.into());
        self
    }

    /// Server-assigned id, present only on records decoded from the service.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Outcome of a create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    /// HTTP status returned by the service.
    pub status: StatusCode,
    /// Id of the new record. Always present when `status` is 200.
    pub music_id: Option<String>,
}

/// Outcome of a read call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// HTTP status returned by the service.
    pub status: StatusCode,
    /// The record, present only when `status` is 200.
    pub record: Option<MusicRecord>,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn artist(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.artist.as_str())
    }

    pub fn song_title(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.song_title.as_str())
    }

    pub fn orig_artist(&self) -> Option<&str> {
        self.record.as_ref().and_then(|r| r.orig_artist.as_deref())
    }
}

/// Outcome of an original-artist read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrigArtist {
    /// HTTP status returned by the service.
    pub status: StatusCode,
    /// `None` on a non-200 status or when the record is not a cover.
    pub orig_artist: Option<String>,
}

/// Body returned by `POST {base}`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateResponse {
    #[serde(default)]
    pub music_id: Option<String>,
}

/// Body returned by `GET {base}{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemsResponse<T> {
    #[serde(rename = "Items", default = "Vec::new")]
    pub items: Vec<T>,
}

/// Partial view of an item used when only the original artist is wanted.
#[derive(Debug, Deserialize)]
pub(crate) struct OrigArtistItem {
    #[serde(rename = "OrigArtist", default)]
    pub orig_artist: Option<String>,
}
