use std::ops::Deref;

use crate::{
    codec::{Codec, ShiftJis},
    config::ClientConfig,
    error::Error,
    form::PostForm,
    location::ThreadUrl,
    result::Result,
    subject::Subject,
};
use reqwest::{
    header::{
        HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION,
        CONTENT_TYPE, COOKIE, HOST, ORIGIN, REFERER, USER_AGENT,
    },
    Client as ReqwestClient, Response, StatusCode,
};

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "ja,en-US;q=0.7,en;q=0.3";
const ACCEPT_ENCODING_VALUE: &str = "gzip, deflate, br";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const POST_COOKIES: &str = "yuki=akari; READJS=\"off\"";

/// Talks to one 5ch thread at a time.
///
/// Every call is a single request with `connection: close`; nothing is
/// retried.
#[derive(Debug)]
pub struct Client {
    http: ReqwestClient,
    config: ClientConfig,
    codec: Box<dyn Codec>,
    target: Option<ThreadUrl>,
}

impl Client {
    /// Creates a client with the default [`ClientConfig`] and no target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientFormation`] if the HTTP client cannot be built.
    pub fn new() -> Result<Client> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with `config` and no target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientFormation`] if the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Client> {
        let http = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(Error::ClientFormation)?;

        Ok(Client {
            http,
            config,
            codec: Box::new(ShiftJis),
            target: None,
        })
    }

    /// Creates a client targeting `url`.
    ///
    /// The target stays unset if `url` does not parse; check [`Client::target`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientFormation`] if the HTTP client cannot be built.
    pub fn for_url(url: &str) -> Result<Client> {
        let mut client = Self::new()?;
        client.set_target(url);
        Ok(client)
    }

    /// Replaces the text codec.
    #[must_use]
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Parses `url` and makes it the target, returning whether it parsed.
    ///
    /// A URL that does not parse clears the target.
    pub fn set_target(&mut self, url: &str) -> bool {
        self.target = ThreadUrl::parse(url);
        if self.target.is_none() {
            log::debug!("`{url}` is not a thread url, target cleared");
        }
        self.target.is_some()
    }

    /// Returns the current target.
    pub fn target(&self) -> Option<&ThreadUrl> {
        self.target.as_ref()
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the target board's `subject.txt`.
    ///
    /// The index is `None` when the server does not answer with a success
    /// status; the reply is returned either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTarget`] without a target, or a transport error.
    pub async fn fetch_subject(&self) -> Result<(Option<Subject>, Reply)> {
        let url = self.require_target()?;
        let subject_url = url.subject_index_url();

        log::debug!("fetching subject.txt of {}/{}", url.host_label(), url.board_id());
        let reply = self.get(url, &subject_url).await?;
        log::debug!("fetched subject.txt: {}", reply.status());

        let subject = reply.is_success().then(|| {
            let mut subject = if reply.text().is_empty() {
                Subject::default()
            } else {
                Subject::parse(reply.text())
            };
            subject.url = Some(subject_url);
            subject
        });
        Ok((subject, reply))
    }

    /// Fetches the target thread, with `suffix` appended to its URL.
    ///
    /// `suffix` picks a rendering, e.g. `l50` for the last fifty posts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTarget`] without a target, or a transport error.
    pub async fn fetch_thread(&self, suffix: &str) -> Result<Reply> {
        let url = self.require_target()?;
        let thread_url = url.thread_url() + suffix;

        log::debug!("fetching thread {}", describe(url));
        let reply = self.get(url, &thread_url).await?;
        log::debug!("fetched thread {}: {}", describe(url), reply.status());
        Ok(reply)
    }

    /// Fetches only the first post of the target thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTarget`] without a target, or a transport error.
    pub async fn fetch_thread_l1(&self) -> Result<Reply> {
        self.fetch_thread("l1").await
    }

    /// Posts `message` to the target thread as `name`, with `mail` in the
    /// mail field (`sage` keeps the thread from bumping).
    ///
    /// The reply comes back whatever its status; 5ch reports most
    /// rejections in the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTarget`] without a target, [`Error::EmptyMessage`]
    /// if `message` is empty, [`Error::Unmappable`] if a field cannot be
    /// encoded, or a transport error.
    pub async fn post(&self, message: &str, name: &str, mail: &str) -> Result<Reply> {
        let url = self.require_target()?;
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let body = PostForm::new(url, message, name, mail).encode(self.codec.as_ref())?;
        let endpoint = self
            .config
            .route(&url.server_url(), &url.post_endpoint_url());

        log::debug!("posting to thread {}", describe(url));
        let response = self
            .http
            .post(&endpoint)
            .headers(self.post_headers(url)?)
            .body(body)
            .send()
            .await?;
        log::debug!("posted to thread {}: {}", describe(url), response.status());

        self.reply(response).await
    }

    fn require_target(&self) -> Result<&ThreadUrl> {
        self.target.as_ref().ok_or(Error::NoTarget)
    }

    async fn get(&self, url: &ThreadUrl, full_url: &str) -> Result<Reply> {
        let endpoint = self.config.route(&url.server_url(), full_url);
        log::info!("request for {} dispatched", endpoint);
        let response = self
            .http
            .get(&endpoint)
            .headers(self.get_headers()?)
            .send()
            .await?;
        self.reply(response).await
    }

    async fn reply(&self, response: Response) -> Result<Reply> {
        log::info!("response status: {}", response.status());
        let url = response.url().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let text = self.codec.decode(&bytes).into_owned();

        Ok(Reply {
            url,
            status,
            headers,
            text,
        })
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING_VALUE));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        Ok(headers)
    }

    fn post_headers(&self, url: &ThreadUrl) -> Result<HeaderMap> {
        let mut headers = self.get_headers()?;
        // copied from what a browser shows for the form submission
        headers.insert(HeaderName::from_static("method"), HeaderValue::from_static("POST"));
        headers.insert(HOST, HeaderValue::from_str(&url.server())?);
        headers.insert(
            HeaderName::from_static("path"),
            HeaderValue::from_static(url.post_path()),
        );
        headers.insert(
            HeaderName::from_static("scheme"),
            HeaderValue::from_static(url.scheme().as_str()),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(ORIGIN, HeaderValue::from_str(&url.server_url())?);
        headers.insert(REFERER, HeaderValue::from_str(&url.thread_url())?);
        headers.insert(COOKIE, HeaderValue::from_static(POST_COOKIES));
        Ok(headers)
    }
}

fn describe(url: &ThreadUrl) -> String {
    format!("{}/{}/{}", url.host_label(), url.board_id(), url.thread_id())
}

/// A response body decoded with the client's codec, plus what came with it.
#[derive(Debug, Clone)]
pub struct Reply {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    text: String,
}

impl Reply {
    /// Returns the final URL, after redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the decoded body.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Deref for Reply {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targeted() -> Client {
        Client::for_url("https://mi.5ch.net/test/read.cgi/news4vip/1667481658/").unwrap()
    }

    #[test]
    fn target_is_set_only_for_thread_urls() {
        let mut client = Client::new().unwrap();
        assert!(client.target().is_none());

        assert!(client.set_target("https://test.5ch.net/test/read.cgi/news4vip"));
        assert_eq!(client.target().unwrap().board_id(), "news4vip");

        assert!(!client.set_target("ftps://test.5ch.net/test/read.cgi/news4vip/294691274"));
        assert!(client.target().is_none());

        let client = Client::for_url("afsoif m9qw8vm32mva mf9 vuq34vofmfowie").unwrap();
        assert!(client.target().is_none());
    }

    #[test]
    fn get_headers_look_like_a_browser() {
        let headers = targeted().get_headers().unwrap();
        assert_eq!(headers.len(), 5);
        assert_eq!(headers[CONNECTION], "close");
        assert_eq!(headers[ACCEPT_ENCODING], ACCEPT_ENCODING_VALUE);
        assert!(headers[USER_AGENT].to_str().unwrap().contains("Firefox"));
    }

    #[test]
    fn post_headers_name_the_real_server() {
        let client = targeted();
        let headers = client.post_headers(client.target.as_ref().unwrap()).unwrap();
        assert_eq!(headers["method"], "POST");
        assert_eq!(headers[HOST], "mi.5ch.net");
        assert_eq!(headers["path"], "/test/bbs.cgi");
        assert_eq!(headers["scheme"], "https");
        assert_eq!(headers[CONTENT_TYPE], FORM_CONTENT_TYPE);
        assert_eq!(headers[ORIGIN], "https://mi.5ch.net");
        assert_eq!(
            headers[REFERER],
            "https://mi.5ch.net/test/read.cgi/news4vip/1667481658/"
        );
        assert_eq!(headers[COOKIE], "yuki=akari; READJS=\"off\"");
        assert_eq!(headers[CONNECTION], "close");
    }

    #[test]
    fn bad_user_agent_is_reported() {
        let config = ClientConfig::default().user_agent("bad\nagent");
        let client = Client::with_config(config).unwrap();
        assert!(matches!(client.get_headers(), Err(Error::Header(_))));
    }
}
