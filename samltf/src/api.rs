//! Thin JSON helpers around the generator backend's HTTP API.
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;
use warp::http::{header, Response};

use crate::error::Error;

/// JSON client bound to one backend base URL.
///
/// Cookies set by the backend are kept and sent back on later requests.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: HttpClient,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Result<Self, Error> {
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base.to_string()));
        }
        let http = HttpClient::builder().cookie_store(true).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `segments` below the base path. Each segment is percent-encoded
    /// so IDs can't escape into other routes. `.` and `..` are refused, the URL
    /// would otherwise resolve them away.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(Error::InvalidSegment((*segment).to_owned()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET` the endpoint with the given query parameters and decode the JSON
    /// response.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let mut url = self.endpoint(segments)?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    /// `POST` `data` as JSON and decode the JSON response.
    #[tracing::instrument(level = "debug", skip(self, data), err)]
    pub async fn post<B, T>(&self, segments: &[&str], data: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!("POST {}", url);
        let response = self.http.post(url).json(data).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::warn!("Backend answered {}: {}", status, body);
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

/// Build a response that makes the browser save `content` as `filename`.
pub fn download_text(
    filename: &str,
    content: String,
) -> Result<Response<String>, warp::http::Error> {
    // Quotes and line breaks would end the header value early.
    let filename: String = filename
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain;charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(content)
}
