use reqwest::Client;
use std::time::Duration;

/// Builds the shared HTTP client used for token and order requests.
pub fn create_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
}
