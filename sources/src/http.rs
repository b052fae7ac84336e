use std::time::Duration;
use reqwest::Client;
use discovery::SourceError;

pub const USER_AGENT: &str = "launchpad-discovery/0.1";

/// One client shared by every fetcher
pub fn build_client(timeout: Duration) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SourceError::Http(format!("client build failed: {}", e)))
}

/// GET `url` and return the body of a 2xx response
pub async fn get_body(client: &Client, url: &str) -> Result<String, SourceError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| SourceError::Http(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status { status: status.as_u16(), body: truncate(&body, 200) });
    }

    response.text().await.map_err(|e| SourceError::Http(e.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
