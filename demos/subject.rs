//! Fetches a board's thread index and looks up the thread the URL points at.
//!
//! ```text
//! cargo run --example subject -- https://mi.5ch.net/test/read.cgi/news4vip/1667481658/
//! ```

use anyhow::{bail, Context};
use dot5ch::Client;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new().init()?;

    let url = std::env::args()
        .nth(1)
        .context("usage: subject <thread url>")?;
    let client = Client::for_url(&url)?;
    let Some(target) = client.target() else {
        bail!("`{url}` is not a 5ch thread url");
    };
    let thread_id = target.thread_id().to_string();

    let (subject, reply) = client.fetch_subject().await?;
    let Some(subject) = subject else {
        bail!("subject.txt request failed with {}", reply.status());
    };

    println!("{} threads listed", subject.total_count());
    for item in subject.iter().take(10) {
        println!("{:>12} {:>5} {}", item.thread_id(), item.reply_count(), item.title());
    }

    if !thread_id.is_empty() {
        match subject.search_tuple(&thread_id) {
            Some((index, title, replies)) => {
                println!("#{index}: {title} ({replies} replies)");
            }
            None => println!("thread {thread_id} is not listed (dropped off the board?)"),
        }
    }

    Ok(())
}
