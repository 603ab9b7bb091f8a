use chrono::{FixedOffset, Utc};
use url::form_urlencoded::byte_serialize;

use crate::{codec::Codec, location::ThreadUrl, result::Result};

/// Label of the submit button on the posting form ("書き込む").
pub const SUBMIT_LABEL: &str = "書き込む";

/// 5ch's clock runs on JST.
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// The fields `bbs.cgi` expects for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm<'a> {
    name: &'a str,
    mail: &'a str,
    message: &'a str,
    board_id: &'a str,
    thread_id: &'a str,
    time: i64,
}

impl<'a> PostForm<'a> {
    /// Builds the form for a reply to `url`, stamped with the current time.
    pub fn new(url: &'a ThreadUrl, message: &'a str, name: &'a str, mail: &'a str) -> Self {
        Self {
            name,
            mail,
            message,
            board_id: url.board_id(),
            thread_id: url.thread_id(),
            time: server_time(),
        }
    }

    /// Returns the `time` field, in seconds since the epoch.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Encodes the form as an `application/x-www-form-urlencoded` body.
    ///
    /// Every value is converted with `codec` before it is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unmappable`] if a field cannot be represented by `codec`.
    ///
    /// [`Error::Unmappable`]: crate::error::Error::Unmappable
    pub fn encode(&self, codec: &dyn Codec) -> Result<String> {
        let time = self.time.to_string();
        let fields = [
            ("FROM", self.name),
            ("mail", self.mail),
            ("MESSAGE", self.message),
            ("bbs", self.board_id),
            ("key", self.thread_id),
            ("time", time.as_str()),
            ("submit", SUBMIT_LABEL),
            ("oekaki_thread1", ""),
        ];

        let mut body = String::new();
        for (key, value) in fields {
            if !body.is_empty() {
                body.push('&');
            }
            body.push_str(key);
            body.push('=');
            body.extend(byte_serialize(&codec.encode(value)?));
        }
        Ok(body)
    }
}

fn server_time() -> i64 {
    let now = Utc::now();
    FixedOffset::east_opt(JST_OFFSET_SECS)
        .map_or_else(|| now.timestamp(), |jst| now.with_timezone(&jst).timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::ShiftJis, error::Error};

    fn field_names(body: &str) -> Vec<&str> {
        body.split('&')
            .filter_map(|pair| pair.split_once('=').map(|(k, _)| k))
            .collect()
    }

    fn field<'b>(body: &'b str, name: &str) -> Option<&'b str> {
        body.split('&')
            .filter_map(|pair| pair.split_once('='))
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    #[test]
    fn body_has_every_field_in_order() {
        let url = ThreadUrl::new("mi", "news4vip", "1667481658");
        let body = PostForm::new(&url, "hello", "", "sage")
            .encode(&ShiftJis)
            .unwrap();

        assert_eq!(
            field_names(&body),
            ["FROM", "mail", "MESSAGE", "bbs", "key", "time", "submit", "oekaki_thread1"]
        );
        assert_eq!(field(&body, "FROM"), Some(""));
        assert_eq!(field(&body, "mail"), Some("sage"));
        assert_eq!(field(&body, "MESSAGE"), Some("hello"));
        assert_eq!(field(&body, "bbs"), Some("news4vip"));
        assert_eq!(field(&body, "key"), Some("1667481658"));
        assert_eq!(field(&body, "oekaki_thread1"), Some(""));
    }

    #[test]
    fn values_are_shift_jis_percent_encoded() {
        let url = ThreadUrl::new("mi", "news4vip", "1");
        let body = PostForm::new(&url, "あ a&b", "名無し", "")
            .encode(&ShiftJis)
            .unwrap();

        assert_eq!(field(&body, "MESSAGE"), Some("%82%A0+a%26b"));
        let submit: String = byte_serialize(&ShiftJis.encode(SUBMIT_LABEL).unwrap()).collect();
        assert_eq!(field(&body, "submit"), Some(submit.as_str()));
        assert!(!body.contains("%E3"), "no utf-8 bytes expected: {body}");
    }

    #[test]
    fn time_is_current_epoch_seconds() {
        let url = ThreadUrl::new("mi", "news4vip", "1");
        let form = PostForm::new(&url, "x", "", "");
        assert!((form.time() - Utc::now().timestamp()).abs() <= 5);

        let body = form.encode(&ShiftJis).unwrap();
        assert_eq!(field(&body, "time"), Some(form.time().to_string().as_str()));
    }

    #[test]
    fn unmappable_text_is_rejected() {
        let url = ThreadUrl::new("mi", "news4vip", "1");
        let err = PostForm::new(&url, "🙂", "", "")
            .encode(&ShiftJis)
            .unwrap_err();
        assert!(matches!(err, Error::Unmappable { character: '🙂', .. }));
    }
}
