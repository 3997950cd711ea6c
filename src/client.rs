use std::time::Duration;

use url::Url;

use crate::error::{ResultsError, ResultsResult};
use crate::model::{parse_page, Page, Window};

const RESULTS_PATH: &str = "/api/results";

/// Reads pages from the agent's results API.
#[derive(Debug, Clone)]
pub struct ResultsClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ResultsClient {
    pub fn new(server: &str, timeout: Duration) -> ResultsResult<Self> {
        let endpoint = Url::parse(server)?.join(RESULTS_PATH)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn url_for(&self, window: Window) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("start", &window.start.to_string())
            .append_pair("stop", &window.stop.to_string());
        url
    }

    pub async fn fetch(&self, window: Window) -> ResultsResult<Page> {
        let url = self.url_for(window);
        tracing::debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(ResultsError::Status(resp.status()));
        }
        let body = resp.text().await?;
        parse_page(&body, window)
    }
}
