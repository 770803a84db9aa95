use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, ClientBuilder, Response, header::CONTENT_TYPE};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client for the timetable site.
///
/// Keeps cookies between calls: the session cookie handed out with the landing
/// page has to accompany every room submission.
#[derive(Debug)]
pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new(request_timeout: Duration) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .cookie_store(true)
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub async fn fetch_url_response(&self, url: &str) -> anyhow::Result<Response> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response)
    }

    pub async fn fetch_url_body(&self, url: &str) -> anyhow::Result<String> {
        let response = self.fetch_url_response(url).await?;
        let body = response.text().await?;
        Ok(body)
    }

    /// POSTs `form` URL-encoded and returns the response body.
    ///
    /// Takes `&mut self` so a caller can never have two submissions in flight
    /// on the same session.
    pub async fn submit_form_body(
        &mut self,
        url: &str,
        form: &[(&str, String)],
    ) -> anyhow::Result<String> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }
}
