use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("stockcast/", env!("CARGO_PKG_VERSION"));

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client.
    ///
    /// Failed requests are not retried; the caller reports them to the user.
    pub fn create_client(timeout: Duration, connect_timeout: Duration) -> Client {
        Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
