use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// HTTP klient pro collector telemetrie jednoho zdroje
#[derive(Debug, Clone)]
pub struct CollectorClient {
    base_url: String,
    client: Client,
    username: Option<String>,
    password: Option<String>,
}

impl CollectorClient {
    pub fn new(base_url: String, insecure: bool, username: Option<String>, password: Option<String>) -> Result<Self> {
        // Ořízni trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            client,
            username,
            password,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Univerzální GET request
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.url(path);

        let mut request = self.client.get(&url);

        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        self.handle_response(response).await
    }

    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(anyhow!("Collector error ({}): {}", status, error_text));
        }

        let body = response.json::<T>().await
            .context("Failed to parse response JSON")?;

        Ok(body)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = CollectorClient::new("http://collector:9000/".to_string(), false, None, None).unwrap();
        assert_eq!(client.base_url(), "http://collector:9000");
        assert_eq!(client.url("/mongodb/nodes"), "http://collector:9000/mongodb/nodes");
        assert_eq!(client.url("health"), "http://collector:9000/health");
    }
}
