use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{error::Error, result::Result};

/// Domain every board server lives under.
pub const DOMAIN_BASE: &str = "5ch.net";
/// Path of the thread reader.
pub const READ_CGI: &str = "/test/read.cgi";
/// Path of the posting endpoint.
pub const BBS_CGI: &str = "/test/bbs.cgi";
/// File name of a board's thread index.
pub const SUBJECT_TXT: &str = "subject.txt";

static THREAD_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(?P<scheme>https?)://(?P<host>[^/.]+)\.{}/test/read\.cgi/(?P<bbs>[^/]+)(?:/(?P<tid>\d+))?",
        regex::escape(DOMAIN_BASE)
    );
    Regex::new(&pattern).expect("thread url pattern is valid")
});

/// URL scheme of a 5ch server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain `http`.
    Http,
    /// `https`, used unless a parsed URL says otherwise.
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme as it appears in a URL.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `read.cgi` location on 5ch, split into its parts.
///
/// An empty thread ID points at the board itself.
///
/// ```
/// use dot5ch::location::ThreadUrl;
///
/// let url = ThreadUrl::parse("https://mi.5ch.net/test/read.cgi/news4vip/1667481658/l50").unwrap();
/// assert_eq!(url.board_id(), "news4vip");
/// assert_eq!(url.thread_url(), "https://mi.5ch.net/test/read.cgi/news4vip/1667481658/");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadUrl {
    scheme: Scheme,
    host_label: String,
    board_id: String,
    thread_id: String,
}

impl ThreadUrl {
    /// Builds a URL from its parts. The scheme is `https`.
    pub fn new(
        host_label: impl Into<String>,
        board_id: impl Into<String>,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            scheme: Scheme::Https,
            host_label: host_label.into(),
            board_id: board_id.into(),
            thread_id: thread_id.into(),
        }
    }

    /// Parses a thread (or board root) URL.
    ///
    /// Anything after the thread ID, such as `l50` or `10-420`, is dropped.
    /// Returns `None` if `url` is not a `read.cgi` URL on 5ch.
    pub fn parse(url: &str) -> Option<Self> {
        let caps = THREAD_URL_RE.captures(url)?;
        let scheme = match &caps["scheme"] {
            "http" => Scheme::Http,
            _ => Scheme::Https,
        };
        let thread_id = caps.name("tid").map_or("", |m| m.as_str());

        Some(Self::new(&caps["host"], &caps["bbs"], thread_id).with_scheme(scheme))
    }

    /// Returns a copy using `scheme`.
    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Returns the scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the server label in front of the base domain, e.g. `mi`.
    pub fn host_label(&self) -> &str {
        &self.host_label
    }

    /// Returns the board ID, e.g. `news4vip`.
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Returns the thread ID, empty for a board root.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// `mi.5ch.net`
    pub fn server(&self) -> String {
        if self.host_label.is_empty() {
            return String::new();
        }
        format!("{}.{DOMAIN_BASE}", self.host_label)
    }

    /// `https://mi.5ch.net`
    pub fn server_url(&self) -> String {
        let server = self.server();
        if server.is_empty() {
            return server;
        }
        format!("{}://{server}", self.scheme)
    }

    /// `https://mi.5ch.net/news4vip/subject.txt`
    pub fn subject_index_url(&self) -> String {
        let server_url = self.server_url();
        if server_url.is_empty() || self.board_id.is_empty() {
            return String::new();
        }
        format!("{server_url}/{}/{SUBJECT_TXT}", self.board_id)
    }

    /// Path component of the posting endpoint.
    pub fn post_path(&self) -> &'static str {
        BBS_CGI
    }

    /// `https://mi.5ch.net/test/bbs.cgi`
    pub fn post_endpoint_url(&self) -> String {
        let server_url = self.server_url();
        if server_url.is_empty() {
            return server_url;
        }
        server_url + BBS_CGI
    }

    /// `https://mi.5ch.net/test/read.cgi/news4vip/1667481658/`
    pub fn thread_url(&self) -> String {
        let server_url = self.server_url();
        if server_url.is_empty() {
            return server_url;
        }
        format!(
            "{server_url}{READ_CGI}/{}/{}/",
            self.board_id, self.thread_id
        )
    }
}

impl FromStr for ThreadUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidUrl(s.to_string()))
    }
}

impl Display for ThreadUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.thread_url())
    }
}
