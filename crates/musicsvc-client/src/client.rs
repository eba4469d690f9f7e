// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{MusicError, Result};
use crate::models::{
    CreateResponse, Created, Fetched, ItemsResponse, MusicRecord, OrigArtist, OrigArtistItem,
};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("musicsvc-client/", env!("CARGO_PKG_VERSION"));

/// Client for the music record service.
///
/// Holds only immutable configuration and a pooled `reqwest` handle, so it is
/// cheap to clone and safe to share between tasks.
#[derive(Debug, Clone)]
pub struct MusicClient {
    client: Client,
    base_url: Url,
    auth: HeaderValue,
}

impl MusicClient {
    /// Create a client with the default timeout.
    ///
    /// # Arguments
    /// * `base_url` - Service URL, e.g. `http://cmpt756s2:30001/api/v1/music/`.
    /// * `auth` - Value sent verbatim in the `Authorization` header.
    pub fn new(base_url: impl Into<String>, auth: impl Into<String>) -> Result<Self> {
        Self::builder(base_url, auth).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder(base_url: impl Into<String>, auth: impl Into<String>) -> MusicClientBuilder {
        MusicClientBuilder::new(base_url, auth)
    }

    /// The normalised base URL, always ending with `/`.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Create a record.
    ///
    /// `OrigArtist` is only sent when `orig_artist` is given. A 200 response
    /// without a `music_id` is an error; any other status is returned with
    /// whatever id the body carried, usually none.
    ///
    /// # Example
    /// ```no_run
    /// # use musicsvc_client::MusicClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = MusicClient::new("http://localhost:30001/api/v1/music/", "token")?;
    /// let created = client
    ///     .create("Elvis Presley", "Hound Dog", Some("Big Mama Thornton"))
    ///     .await?;
    /// println!("{} {:?}", created.status, created.music_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(
        &self,
        artist: &str,
        song_title: &str,
        orig_artist: Option<&str>,
    ) -> Result<Created> {
        require_non_empty("artist", artist)?;
        require_non_empty("song title", song_title)?;

        let mut record = MusicRecord::new(artist, song_title);
        if let Some(orig_artist) = orig_artist {
            record = record.orig_artist(orig_artist);
        }

        trace!(target: "music", "POST {}", self.base_url);

        let response = self
            .authorized(self.client.post(self.base_url.clone()))
            .json(&record)
            .send()
            .await?;

        let status = response.status();
        debug!(target: "music", "create response status: {}", status);

        let body = response.text().await?;
        trace!(target: "music", "response body: {}", body);

        let music_id = if status == StatusCode::OK {
            let decoded: CreateResponse = decode(&body)?;
            match decoded.music_id {
                Some(id) if !id.is_empty() => Some(id),
                _ => {
                    return Err(MusicError::InvalidResponse(
                        "create response has no music_id".to_string(),
                    ))
                }
            }
        } else {
            serde_json::from_str::<CreateResponse>(&body)
                .ok()
                .and_then(|r| r.music_id)
                .filter(|id| !id.is_empty())
        };

        Ok(Created { status, music_id })
    }

    /// Read a record by id.
    ///
    /// On a non-200 status the record is `None` and the body is ignored.
    ///
    /// # Example
    /// ```no_run
    /// # use musicsvc_client::MusicClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = MusicClient::new("http://localhost:30001/api/v1/music/", "token")?;
    /// let fetched = client.read("6ecfafd0-8a35-4af6-a9e2-cbd79b3abeea").await?;
    /// if let Some(record) = fetched.record {
    ///     println!("{} - {}", record.artist, record.song_title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read(&self, id: &str) -> Result<Fetched> {
        let (status, record) = self.fetch_item::<MusicRecord>(id).await?;
        Ok(Fetched { status, record })
    }

    /// Read only the original artist of a record.
    pub async fn read_orig_artist(&self, id: &str) -> Result<OrigArtist> {
        let (status, item) = self.fetch_item::<OrigArtistItem>(id).await?;
        Ok(OrigArtist {
            status,
            orig_artist: item.and_then(|i| i.orig_artist),
        })
    }

    /// Replace the original artist of a record.
    ///
    /// Reads the record first and writes it back with `PUT {base}{id}`,
    /// keeping artist and title. If the read does not return 200 its status
    /// is returned and nothing is written.
    pub async fn write_orig_artist(&self, id: &str, orig_artist: &str) -> Result<StatusCode> {
        require_non_empty("original artist", orig_artist)?;

        let current = self.read(id).await?;
        let Some(record) = current.record else {
            debug!(target: "music", "skipping update of {}: read returned {}", id, current.status);
            return Ok(current.status);
        };

        let updated = MusicRecord::new(record.artist, record.song_title).orig_artist(orig_artist);
        let url = self.resource_url(id)?;
        trace!(target: "music", "PUT {}", url);

        let response = self
            .authorized(self.client.put(url))
            .json(&updated)
            .send()
            .await?;

        let status = response.status();
        debug!(target: "music", "update response status: {}", status);
        Ok(status)
    }

    /// Delete a record.
    ///
    /// The service status is not reported; only transport failures are.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.resource_url(id)?;
        trace!(target: "music", "DELETE {}", url);

        let response = self.authorized(self.client.delete(url)).send().await?;
        debug!(target: "music", "delete response status: {}", response.status());
        Ok(())
    }

    /// GET `{base}{id}` and decode the first entry of `Items` on a 200.
    async fn fetch_item<T: DeserializeOwned>(&self, id: &str) -> Result<(StatusCode, Option<T>)> {
        let url = self.resource_url(id)?;
        trace!(target: "music", "GET {}", url);

        let response = self.authorized(self.client.get(url)).send().await?;

        let status = response.status();
        debug!(target: "music", "read response status: {}", status);

        if status != StatusCode::OK {
            return Ok((status, None));
        }

        let body = response.text().await?;
        trace!(target: "music", "response body: {}", body);

        let decoded: ItemsResponse<T> = decode(&body)?;
        let item = decoded.items.into_iter().next().ok_or_else(|| {
            MusicError::InvalidResponse(format!("no items returned for {}", id))
        })?;

        Ok((status, Some(item)))
    }

    fn resource_url(&self, id: &str) -> Result<Url> {
        require_non_empty("id", id)?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MusicError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.auth.clone())
    }
}

/// Builder for configuring a music client.
#[derive(Debug)]
pub struct MusicClientBuilder {
    base_url: String,
    auth: String,
    timeout: Duration,
}

impl MusicClientBuilder {
    pub fn new(base_url: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: auth.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the music client.
    ///
    /// A missing trailing `/` on the base URL path is added. Base URLs with a
    /// query or fragment are rejected since ids are appended to the path.
    pub fn build(self) -> Result<MusicClient> {
        let raw = self.base_url;
        let mut base_url = Url::parse(&raw)
            .map_err(|e| MusicError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base()
            || base_url.query().is_some()
            || base_url.fragment().is_some()
        {
            return Err(MusicError::InvalidBaseUrl(raw));
        }
        if !base_url.path().ends_with('/') {
            base_url
                .path_segments_mut()
                .map_err(|_| MusicError::InvalidBaseUrl(raw.clone()))?
                .push("");
        }

        let mut auth = HeaderValue::from_str(&self.auth).map_err(|_| {
            MusicError::InvalidInput("auth token is not a valid header value".to_string())
        })?;
        auth.set_sensitive(true);

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        debug!(target: "music", base_url = %base_url, "initialized music client");

        Ok(MusicClient {
            client,
            base_url,
            auth,
        })
    }
}

fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MusicError::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| MusicError::InvalidResponse(format!("Failed to parse response: {}", e)))
}
