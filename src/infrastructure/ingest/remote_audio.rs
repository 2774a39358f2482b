use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::TryStreamExt;

/// Pulls remote audio for URL-based submissions: a best-effort HEAD to
/// guess the content type, then a streamed GET with a bounded timeout.
pub struct RemoteAudioFetcher {
    head_client: reqwest::Client,
    download_client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("server responded with {status}")]
    BadStatus { status: u16 },
    #[error("{0}")]
    Request(String),
}

impl RemoteAudioFetcher {
    pub fn new(head_timeout: Duration, download_timeout: Duration) -> Result<Self, FetchError> {
        let head_client = reqwest::Client::builder()
            .timeout(head_timeout)
            .build()
            .map_err(|e| FetchError::Request(format!("client: {}", e)))?;
        let download_client = reqwest::Client::builder()
            .timeout(download_timeout)
            .build()
            .map_err(|e| FetchError::Request(format!("client: {}", e)))?;
        Ok(Self {
            head_client,
            download_client,
        })
    }

    /// Best-effort content-type probe; any failure is ignored.
    pub async fn probe_content_type(&self, url: &str) -> Option<String> {
        let response = self.head_client.head(url).send().await.ok()?;
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)?
            .to_str()
            .ok()
            .map(str::to_string)
    }

    /// Open a byte stream for the audio body. A non-2xx response aborts
    /// before any bytes are staged.
    pub async fn download(
        &self,
        url: &str,
    ) -> Result<BoxStream<'static, Result<Bytes, io::Error>>, FetchError> {
        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                status: response.status().as_u16(),
            });
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        Ok(Box::pin(stream))
    }
}

/// File extension for a staged download: content type first, then the
/// URL path, then `.mp3`. Always includes the leading dot.
pub fn guess_extension(url: &str, content_type: Option<&str>) -> String {
    if let Some(content_type) = content_type {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        if let Some(ext) = extension_for_mime(essence) {
            return ext.to_string();
        }
    }
    url_path_extension(url).unwrap_or_else(|| ".mp3".to_string())
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "audio/mpeg" | "audio/mp3" => Some(".mp3"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some(".wav"),
        "audio/mp4" | "audio/x-m4a" => Some(".m4a"),
        "audio/ogg" | "application/ogg" => Some(".ogg"),
        "audio/flac" | "audio/x-flac" => Some(".flac"),
        "audio/webm" => Some(".webm"),
        "audio/aac" => Some(".aac"),
        "video/mp4" => Some(".mp4"),
        _ => None,
    }
}

fn url_path_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next()?;
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(name[dot..].to_ascii_lowercase())
}

/// Display name derived from the last URL path segment.
pub fn url_basename(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.trim_end_matches('/').rsplit('/').next()?;
    if name.is_empty() || name.contains("//") || name.ends_with(':') {
        return None;
    }
    Some(name.to_string())
}
