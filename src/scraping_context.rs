use crate::{config::ScrapingConfig, requests::RequestClient};

#[derive(Debug)]
pub struct ScrapingContext {
    pub scraping_config: ScrapingConfig,
    pub request_client: RequestClient,
}

impl ScrapingContext {
    pub fn with_config(scraping_config: ScrapingConfig) -> anyhow::Result<Self> {
        let request_client = RequestClient::new(scraping_config.request_timeout)?;
        Ok(ScrapingContext {
            scraping_config,
            request_client,
        })
    }
}
