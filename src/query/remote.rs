use anyhow::Result;

use crate::overlay::OverlayResponse;

/// A server that computes raw precinct/zone intersections (`POST /api/precinct_overlay`).
pub trait OverlayService: Send + Sync {
    fn precinct_overlay(&self, precinct: &str, year: u16) -> Result<OverlayResponse>;
}

#[cfg(feature = "remote")]
mod http {
    use std::time::Duration;

    use anyhow::{Context, Result};
    use reqwest::blocking::Client;

    use crate::{
        common::attempt_with_fallback,
        overlay::{OverlayRequest, OverlayResponse},
        query::OverlayService,
    };

    const OVERLAY_PATH: &str = "/api/precinct_overlay";

    /// Blocking HTTP client for the overlay service. Endpoints are tried once each, in order,
    /// so a call can take up to `endpoints × timeout`.
    #[derive(Debug, Clone)]
    pub struct HttpOverlayService {
        endpoints: Vec<String>,
        client: Client,
    }

    impl HttpOverlayService {
        pub fn new(endpoints: Vec<String>, timeout: Duration) -> Result<Self> {
            let client = Client::builder()
                .user_agent(concat!("precinct-overlay/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .context("build overlay HTTP client")?;
            Ok(Self { endpoints, client })
        }

        #[inline] pub fn endpoints(&self) -> &[String] { &self.endpoints }

        fn post(&self, endpoint: &str, request: &OverlayRequest) -> Result<OverlayResponse> {
            let url = format!("{}{OVERLAY_PATH}", endpoint.trim_end_matches('/'));
            self.client.post(&url)
                .json(request)
                .send()
                .with_context(|| format!("POST {url}"))?
                .error_for_status()
                .with_context(|| format!("POST {url} returned error status"))?
                .json::<OverlayResponse>()
                .with_context(|| format!("POST {url} returned a malformed body"))
        }
    }

    impl OverlayService for HttpOverlayService {
        fn precinct_overlay(&self, precinct: &str, year: u16) -> Result<OverlayResponse> {
            let request = OverlayRequest { precinct_name: precinct.to_owned(), year };
            let response = attempt_with_fallback(&self.endpoints, |endpoint| {
                self.post(endpoint, &request).map_err(|e| format!("{e:#}"))
            })?;
            Ok(response)
        }
    }

}

#[cfg(feature = "remote")]
pub use http::HttpOverlayService;
