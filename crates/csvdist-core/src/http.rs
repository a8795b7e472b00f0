//! Blocking HTTP GET on top of async reqwest.
//!
//! Requests run on a private current-thread tokio runtime and are
//! `block_on`'d, so callers see a plain sequential interface.

use std::io;

use crate::error::LookupError;

/// HTTP client plus the runtime that drives it. No timeouts are set;
/// requests rely on the transport defaults.
pub struct HttpContext {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl std::fmt::Debug for HttpContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpContext").finish_non_exhaustive()
    }
}

impl HttpContext {
    pub fn new() -> io::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(io::Error::other)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { client, runtime })
    }

    /// GET `url` with `query` appended; returns status code and body text.
    ///
    /// Transport failures map to `LookupError::Http { status: None, .. }`.
    /// Non-200 statuses are returned, not treated as errors here.
    pub fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<(u16, String), LookupError> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(LookupError::from_reqwest)?;
            let status = resp.status().as_u16();
            let body = resp.text().await.map_err(LookupError::from_reqwest)?;
            Ok((status, body))
        })
    }
}
