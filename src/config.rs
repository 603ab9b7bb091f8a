use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser the requests pretend to come from.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:106.0) Gecko/20100101 Firefox/106.0";

/// Settings for a [`Client`].
///
/// The defaults match what 5ch expects; most callers never change them.
///
/// ```
/// use std::time::Duration;
/// use dot5ch::config::ClientConfig;
///
/// let config = ClientConfig::default().read_timeout(Duration::from_secs(20));
/// assert_eq!(config.connect_timeout, Duration::from_secs(6));
/// ```
///
/// [`Client`]: crate::Client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Time allowed between reads of the response.
    pub read_timeout: Duration,
    /// `user-agent` sent with every request.
    pub user_agent: String,
    /// Send requests here (`scheme://host[:port]`) instead of the thread's
    /// own server. `host`, `origin` and `referer` still name the real server.
    pub origin: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(6),
            read_timeout: Duration::from_secs(6),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            origin: None,
        }
    }
}

impl ClientConfig {
    /// Sets the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the `user-agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Redirects every request to `origin`, e.g. a mirror or a local server.
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into().trim_end_matches('/').to_string());
        self
    }

    /// Rewrites `url`, which lives on `server_url`, onto the configured origin.
    pub(crate) fn route(&self, server_url: &str, url: &str) -> String {
        match (&self.origin, url.strip_prefix(server_url)) {
            (Some(origin), Some(rest)) => format!("{}{rest}", origin.trim_end_matches('/')),
            _ => url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_site() {
        let config = ClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(6));
        assert_eq!(config.read_timeout, Duration::from_secs(6));
        assert!(config.user_agent.contains("Firefox"));
        assert_eq!(config.origin, None);
    }

    #[test]
    fn route_without_origin_is_identity() {
        let config = ClientConfig::default();
        let url = "https://mi.5ch.net/news4vip/subject.txt";
        assert_eq!(config.route("https://mi.5ch.net", url), url);
    }

    #[test]
    fn route_swaps_the_origin() {
        let config = ClientConfig::default().origin("http://127.0.0.1:8080/");
        assert_eq!(
            config.route(
                "https://mi.5ch.net",
                "https://mi.5ch.net/test/read.cgi/news4vip/1/l1"
            ),
            "http://127.0.0.1:8080/test/read.cgi/news4vip/1/l1"
        );
    }
}
