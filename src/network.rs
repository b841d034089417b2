use std::time::Duration;

/// Gate checked before a download request is built.
pub trait ConnectivityProbe {
    fn is_connected(&self) -> bool;
}

/// Considers the network up when a HEAD request to a well-known host gets any
/// HTTP response at all.
pub struct HttpProbe {
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl ConnectivityProbe for HttpProbe {
    fn is_connected(&self) -> bool {
        let client = match reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                log::error!("failed to build probe client: {err}");
                return false;
            }
        };

        match client.head(&self.url).send() {
            Ok(response) => {
                log::debug!("probe {} answered {}", self.url, response.status());
                true
            }
            Err(err) => {
                log::warn!("probe {} failed: {err}", self.url);
                false
            }
        }
    }
}
