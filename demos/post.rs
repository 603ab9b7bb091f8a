//! Posts a message to a thread and prints what the server said.
//!
//! ```text
//! cargo run --example post -- https://mi.5ch.net/test/read.cgi/news4vip/1667481658/ "message" [name] [mail]
//! ```

use anyhow::{bail, Context};
use dot5ch::Client;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new().init()?;

    let mut args = std::env::args().skip(1);
    let url = args.next().context("usage: post <thread url> <message> [name] [mail]")?;
    let message = args.next().context("a message is required")?;
    let name = args.next().unwrap_or_default();
    let mail = args.next().unwrap_or_default();

    let mut client = Client::new()?;
    if !client.set_target(&url) {
        bail!("`{url}` is not a 5ch thread url");
    }

    let reply = client.post(&message, &name, &mail).await?;
    println!("status: {}", reply.status());
    // the verdict is in the <title> of the returned page
    println!("{}", reply.text());

    Ok(())
}
