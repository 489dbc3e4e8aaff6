//! Shared request plumbing: endpoint resolution, the auth header, status
//! handling and JSON decoding.

use crate::error::{Result, StretchFsError};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the session token on every authenticated request.
pub const TOKEN_HEADER: &str = "X-STRETCHFS-Token";

/// Borrowed view of everything needed to issue one API call.
#[derive(Clone, Copy)]
pub(crate) struct Api<'a> {
    http: &'a Client,
    base_url: &'a Url,
    token: Option<&'a str>,
}

impl<'a> Api<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url, token: Option<&'a str>) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    pub(crate) fn token(&self) -> Option<&'a str> {
        self.token
    }

    /// Resolve an API route (e.g. `file/list`) or a returned URL against the
    /// server base.
    pub(crate) fn resolve(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(route)
            .map_err(|e| StretchFsError::InvalidUrl(format!("{}: {}", route, e)))
    }

    pub(crate) async fn get_json<Q>(&self, route: &str, query: &Q) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.resolve(route)?;
        debug!(url = %url, "GET");
        let request = self.authed(self.http.get(url)).query(query);
        decode(send(request).await?).await
    }

    pub(crate) async fn post_json<B>(&self, route: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve(route)?;
        debug!(url = %url, "POST");
        let request = self.authed(self.http.post(url)).json(body);
        decode(send(request).await?).await
    }

    /// POST with no body; authentication travels in the header only.
    pub(crate) async fn post_empty(&self, route: &str) -> Result<Value> {
        let url = self.resolve(route)?;
        debug!(url = %url, "POST");
        let request = self.authed(self.http.post(url));
        decode(send(request).await?).await
    }

    pub(crate) async fn post_multipart<Q>(&self, route: &str, query: &Q, form: Form) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.resolve(route)?;
        debug!(url = %url, "POST multipart");
        let request = self.authed(self.http.post(url)).query(query).multipart(form);
        decode(send(request).await?).await
    }

    /// GET an arbitrary URL and hand back the raw response for streaming.
    ///
    /// The session token is only sent when `url` shares the server's origin.
    pub(crate) async fn get_raw(&self, url: Url) -> Result<Response> {
        let same_origin = self.is_same_origin(&url);
        debug!(url = %url, same_origin, "GET raw");

        let request = self.http.get(url);
        if same_origin {
            send(self.authed(request)).await
        } else {
            send(request).await
        }
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.base_url.origin()
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }
}

/// Send a request and turn non-success statuses into errors.
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    if status.as_u16() == 401 {
        warn!(status = %status, "Request rejected: not authenticated");
        return Err(StretchFsError::AuthFailed(error_text));
    }

    Err(StretchFsError::ServerError {
        status: status.as_u16(),
        message: error_text,
    })
}

/// Decode a response body as JSON. An empty body decodes to `null`.
async fn decode(response: Response) -> Result<Value> {
    let text = response.text().await?;
    parse_body(&text)
}

pub(crate) fn parse_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| StretchFsError::ParseError(e.to_string()))
}
