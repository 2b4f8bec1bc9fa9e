//! Interactive paging loop over stdin.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use crate::browser::{PageMove, ResultBrowser};
use crate::render;
use crate::sources::searchidx::SearchIndexClient;
use crate::utils::query::Query;

const HELP: &str = "Commands: n (next), p (previous), a page number, size N, q (quit)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseCommand {
    Move(PageMove),
    Help,
    Quit,
}

/// Maps one input line to a command. Unrecognized input shows help;
/// out-of-range page numbers are accepted and clamp downstream.
fn parse_command(input: &str) -> BrowseCommand {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return BrowseCommand::Quit,
        "n" | "next" => return BrowseCommand::Move(PageMove::Next),
        "p" | "prev" | "previous" => return BrowseCommand::Move(PageMove::Prev),
        _ => {}
    }
    if let Ok(page) = input.parse::<usize>() {
        return BrowseCommand::Move(PageMove::Page(page));
    }
    if let Some(size) = input
        .to_ascii_lowercase()
        .strip_prefix("size")
        .map(str::trim)
        .and_then(|s| s.parse::<usize>().ok())
    {
        return BrowseCommand::Move(PageMove::Resize(size));
    }
    BrowseCommand::Help
}

async fn write_line(
    stdout: &mut tokio::io::Stdout,
    line: &str,
) -> Result<(), std::io::Error> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

async fn show_page(
    stdout: &mut tokio::io::Stdout,
    browser: &ResultBrowser,
) -> anyhow::Result<()> {
    if let Some(view) = browser.view() {
        let rendered = render::markdown::hit_page_markdown(
            &browser.query().label(),
            view,
            &browser.state(),
        )?;
        write_line(stdout, &rendered).await?;
    }
    Ok(())
}

pub(crate) async fn run(
    client: SearchIndexClient,
    query: Query,
    db: String,
    size: usize,
) -> anyhow::Result<()> {
    let mut browser = ResultBrowser::open(client, query, db, size).await?;
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // First page up front; a failure here still enters the loop so the
    // user can retry or quit.
    let first = browser.select(PageMove::Page(1)).await.map(|_| ());
    match first {
        Ok(()) => show_page(&mut stdout, &browser).await?,
        Err(err) => {
            warn!(error = %err, "Initial page fetch failed");
            write_line(&mut stdout, "Unable to load results; enter a page to retry.").await?;
        }
    }
    write_line(&mut stdout, HELP).await?;

    loop {
        stdout.write_all(b"page> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let mv = match parse_command(&line) {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                write_line(&mut stdout, HELP).await?;
                continue;
            }
            BrowseCommand::Move(mv) => mv,
        };

        let selected = browser.select(mv).await.map(|_| ());
        match selected {
            Ok(()) => show_page(&mut stdout, &browser).await?,
            Err(err) => {
                // Keep the current page; the action can simply be retried.
                warn!(error = %err, "Page fetch failed");
                write_line(
                    &mut stdout,
                    "Unable to load results; previous page kept. Try again.",
                )
                .await?;
            }
        }
    }

    Ok(())
}
