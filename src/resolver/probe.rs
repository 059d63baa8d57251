//! URL existence probing.
//!
//! Candidate versions are checked with a lightweight HEAD request; servers
//! that reject HEAD (401/403/405) get a full GET retry. A URL "exists" when
//! the final status is a success or a redirect.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

/// Probe for whether a candidate URL is reachable.
///
/// A trait seam so resolution logic can be tested with canned responses.
pub trait ExistenceProbe {
    /// Check whether `url` points at fetchable content.
    fn exists(&self, url: &str) -> Result<bool>;
}

/// HTTP implementation of [`ExistenceProbe`].
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Create a probe with the default 15-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(15))
    }

    /// Create a probe with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("freshen/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    fn head_rejected(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::METHOD_NOT_ALLOWED
        )
    }

    fn status_exists(status: StatusCode) -> bool {
        status.is_success() || status.is_redirection()
    }
}

impl ExistenceProbe for HttpProbe {
    fn exists(&self, url: &str) -> Result<bool> {
        let head = self
            .client
            .head(url)
            .send()
            .with_context(|| format!("HEAD probe failed for {url}"))?;

        let status = head.status();
        if Self::status_exists(status) {
            return Ok(true);
        }

        if Self::head_rejected(status) {
            let get = self
                .client
                .get(url)
                .send()
                .with_context(|| format!("GET probe failed for {url}"))?;
            return Ok(Self::status_exists(get.status()));
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;

    #[test]
    fn head_success_exists() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(HEAD).path("/v/2.4.0.tar.gz");
            then.status(200);
        });

        let probe = HttpProbe::new().unwrap();
        assert!(probe.exists(&server.url("/v/2.4.0.tar.gz")).unwrap());
        mock.assert();
    }

    #[test]
    fn redirect_counts_as_exists() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/moved");
            then.status(302).header("location", "/elsewhere");
        });

        let probe = HttpProbe::new().unwrap();
        assert!(probe.exists(&server.url("/moved")).unwrap());
    }

    #[test]
    fn not_found_does_not_exist() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/missing");
            then.status(404);
        });

        let probe = HttpProbe::new().unwrap();
        assert!(!probe.exists(&server.url("/missing")).unwrap());
    }

    #[test]
    fn head_rejection_falls_back_to_get() {
        let server = MockServer::start();
        let head_mock = server.mock(|when, then| {
            when.method(HEAD).path("/blocked");
            then.status(405);
        });
        let get_mock = server.mock(|when, then| {
            when.method(GET).path("/blocked");
            then.status(200).body("tarball");
        });

        let probe = HttpProbe::new().unwrap();
        assert!(probe.exists(&server.url("/blocked")).unwrap());
        head_mock.assert();
        get_mock.assert();
    }

    #[test]
    fn head_rejection_with_failing_get_does_not_exist() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/denied");
            then.status(403);
        });
        server.mock(|when, then| {
            when.method(GET).path("/denied");
            then.status(403);
        });

        let probe = HttpProbe::new().unwrap();
        assert!(!probe.exists(&server.url("/denied")).unwrap());
    }
}
