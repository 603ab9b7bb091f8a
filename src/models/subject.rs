use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SUBJECT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<tid>\d+)\.dat<>(?P<title>.+?)  ?\((?P<resnum>\d+)\)\r?$")
        .expect("subject line pattern is valid")
});

/// A board's thread index, as listed in its `subject.txt`.
///
/// Threads keep the order they were listed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subject {
    threads: Vec<SubjectItem>,
    #[serde(skip)]
    pub(crate) url: Option<String>,
}

impl Subject {
    /// Parses the body of a `subject.txt`.
    ///
    /// Lines that do not look like `{id}.dat<>{title} ({replies})` are skipped.
    ///
    /// # Panics
    ///
    /// Panics if `text` is empty.
    pub fn parse(text: &str) -> Self {
        assert!(!text.is_empty(), "subject text must not be empty");

        let threads: Vec<SubjectItem> = text.lines().filter_map(SubjectItem::parse).collect();
        log::debug!("parsed {} threads from subject text", threads.len());
        Self { threads, url: None }
    }

    /// Returns the URL this index was fetched from, if it was fetched.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the number of listed threads.
    pub fn total_count(&self) -> usize {
        self.threads.len()
    }

    /// Returns the listed threads.
    pub fn threads(&self) -> &[SubjectItem] {
        &self.threads
    }

    /// Finds a thread by its ID.
    ///
    /// # Panics
    ///
    /// Panics if `thread_id` is empty.
    pub fn search(&self, thread_id: &str) -> Option<&SubjectItem> {
        self.search_tuple(thread_id)
            .map(|(index, _, _)| &self.threads[index])
    }

    /// Finds the position of a thread in the listing.
    ///
    /// # Panics
    ///
    /// Panics if `thread_id` is empty.
    pub fn search_index(&self, thread_id: &str) -> Option<usize> {
        assert!(!thread_id.is_empty(), "thread id must not be empty");
        self.threads.iter().position(|th| th.thread_id == thread_id)
    }

    /// Finds a thread's title, or `""` if it is not listed.
    ///
    /// # Panics
    ///
    /// Panics if `thread_id` is empty.
    pub fn search_title(&self, thread_id: &str) -> &str {
        self.search(thread_id).map_or("", SubjectItem::title)
    }

    /// Finds a thread's reply count.
    ///
    /// # Panics
    ///
    /// Panics if `thread_id` is empty.
    pub fn search_resnum(&self, thread_id: &str) -> Option<u64> {
        self.search(thread_id).map(SubjectItem::reply_count)
    }

    /// Finds a thread's position, title and reply count.
    ///
    /// # Panics
    ///
    /// Panics if `thread_id` is empty.
    pub fn search_tuple(&self, thread_id: &str) -> Option<(usize, &str, u64)> {
        let index = self.search_index(thread_id)?;
        let item = &self.threads[index];
        Some((index, item.title(), item.reply_count()))
    }
}

impl std::ops::Deref for Subject {
    type Target = [SubjectItem];

    fn deref(&self) -> &Self::Target {
        &self.threads
    }
}

/// One line of a `subject.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectItem {
    /// Thread ID, the `.dat` file's stem.
    thread_id: String,
    /// Thread title, possibly containing HTML entities.
    title: String,
    /// Number of replies, including the first post.
    reply_count: u64,
}

impl SubjectItem {
    fn parse(line: &str) -> Option<Self> {
        let caps = SUBJECT_LINE_RE.captures(line)?;
        // digits only, so the sole failure is overflow
        let reply_count = caps["resnum"].parse().unwrap_or(u64::MAX);
        Some(Self {
            thread_id: caps["tid"].to_string(),
            title: caps["title"].to_string(),
            reply_count,
        })
    }

    /// Returns the thread ID.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Returns the thread title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the number of replies.
    ///
    /// Counts beyond `u64::MAX` saturate.
    pub fn reply_count(&self) -> u64 {
        self.reply_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "123.dat<>Hello (5)\n456.dat<>World  (10)\n";

    #[test]
    fn parses_listing_in_order() {
        let sbj = Subject::parse(SAMPLE);
        assert_eq!(sbj.total_count(), 2);
        assert_eq!(sbj.url(), None);

        assert_eq!(sbj[0].thread_id(), "123");
        assert_eq!(sbj[0].title(), "Hello");
        assert_eq!(sbj[0].reply_count(), 5);

        assert_eq!(sbj[1].thread_id(), "456");
        assert_eq!(sbj[1].title(), "World");
        assert_eq!(sbj[1].reply_count(), 10);
    }

    #[test]
    fn skips_malformed_lines() {
        let text = "123.dat<>Hello (5)\nthis is not a thread\n\nabc.dat<>Bad id (1)\n456.dat<>World  (10)\n789.dat<>no count\n";
        let sbj = Subject::parse(text);
        assert_eq!(sbj.total_count(), 2);
        let ids: Vec<_> = sbj.iter().map(SubjectItem::thread_id).collect();
        assert_eq!(ids, ["123", "456"]);
    }

    #[test]
    fn only_the_trailing_count_is_extracted() {
        let sbj = Subject::parse("1667481658.dat<>Part (3) [ok] (1000)\r\n");
        assert_eq!(sbj.total_count(), 1);
        assert_eq!(sbj[0].title(), "Part (3) [ok]");
        assert_eq!(sbj[0].reply_count(), 1000);
    }

    #[test]
    fn huge_counts_are_kept() {
        let sbj = Subject::parse("1.dat<>big (99999999999)\n2.dat<>bigger (123456789012345678901234)\n");
        assert_eq!(sbj.total_count(), 2);
        assert_eq!(sbj.search_resnum("1"), Some(99_999_999_999));
        assert_eq!(sbj.search_resnum("2"), Some(u64::MAX));
    }

    #[test]
    fn handles_crlf_and_missing_final_newline() {
        let sbj = Subject::parse("1.dat<>a (1)\r\n2.dat<>b  (2)\r");
        assert_eq!(sbj.total_count(), 2);
        assert_eq!(sbj.search_title("2"), "b");
    }

    #[test]
    fn search_finds_present_threads() {
        let sbj = Subject::parse(SAMPLE);
        let item = sbj.search("456").unwrap();
        assert_eq!(item, &sbj.threads()[1]);
        assert_eq!(sbj.search_index("456"), Some(1));
        assert_eq!(sbj.search_title("123"), "Hello");
        assert_eq!(sbj.search_resnum("123"), Some(5));
        assert_eq!(sbj.search_tuple("456"), Some((1, "World", 10)));
    }

    #[test]
    fn search_misses_absent_threads() {
        let sbj = Subject::parse(SAMPLE);
        assert!(sbj.search("999").is_none());
        assert_eq!(sbj.search_index("999"), None);
        assert_eq!(sbj.search_title("999"), "");
        assert_eq!(sbj.search_resnum("999"), None);
        assert_eq!(sbj.search_tuple("999"), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let sbj = Subject::parse("7.dat<>first (1)\n7.dat<>second (2)\n");
        assert_eq!(sbj.total_count(), 2);
        assert_eq!(sbj.search_tuple("7"), Some((0, "first", 1)));
    }

    #[test]
    #[should_panic(expected = "subject text must not be empty")]
    fn empty_text_is_rejected() {
        let _ = Subject::parse("");
    }

    #[test]
    #[should_panic(expected = "thread id must not be empty")]
    fn empty_thread_id_is_rejected() {
        let _ = Subject::parse(SAMPLE).search("");
    }
}
