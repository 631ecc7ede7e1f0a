use std::io::Write;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use dr_core::{Attachment, DiceRelay, Destination, InboundMessage, RelayConfig};

pub async fn run(
    server: &str,
    user: &str,
    name: &str,
    channel: &str,
    ignore_errors: bool,
) -> Result<(), String> {
    let config = RelayConfig::from_env(server).with_error_sensitive(!ignore_errors);
    if config.generated_password {
        eprintln!("{} {}", "admin password:".bold(), config.password);
    }
    let evaluator = super::client(&config);
    let relay = DiceRelay::new(config, evaluator, super::fetcher());

    println!("  {} dicerelay console", "Starting".bold());
    println!("  Server: {server} | Channel: {channel} | User: {name}");
    println!("  End a line with \\ to continue it, ':attach URL' to upload a file, 'quit' to exit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = String::new();
    let mut attachments = Vec::new();

    loop {
        print!("> ");
        std::io::stdout().flush().map_err(|e| e.to_string())?;

        let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? else {
            break;
        };
        if let Some(head) = line.strip_suffix('\\') {
            pending.push_str(head);
            pending.push('\n');
            continue;
        }
        pending.push_str(&line);
        let text = std::mem::take(&mut pending);

        let input = text.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }
        if let Some(url) = input.strip_prefix(":attach ") {
            let url = url.trim();
            let file_name = url.rsplit('/').next().unwrap_or(url);
            attachments.push(Attachment::new(url, file_name));
            println!("{}", format!("attached {file_name}").dimmed());
            continue;
        }

        let msg = InboundMessage {
            text,
            author_id: user.to_string(),
            author_name: name.to_string(),
            channel_id: channel.to_string(),
            attachments: std::mem::take(&mut attachments),
        };
        debug!(text = %msg.text, attachments = msg.attachments.len(), "console message");
        for out in relay.handle(&msg).await {
            match out.destination {
                Destination::Channel(_) => println!("{}\n", out.text),
                Destination::User(to) => {
                    println!("{}\n{}\n", format!("(to {to})").cyan(), out.text)
                }
            }
        }
    }

    Ok(())
}
