use std::time::Duration;

use reqwest::blocking::Client;

use crate::errors::WatchResult;
use crate::sources::traits::{HttpClient, HttpResponse};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &str) -> WatchResult<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let moved = HttpResponse { status: 301, body: String::new() };
        let failed = HttpResponse { status: 500, body: String::new() };

        assert!(ok.is_success());
        assert!(!moved.is_success());
        assert!(!failed.is_success());
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("wpwatch/"));
    }
}
