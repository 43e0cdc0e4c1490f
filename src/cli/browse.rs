use anyhow::{anyhow, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use boardlist::pager::{
    parse_page_size, validate_page_size, Intent, ListSnapshot, ListView, ViewSignal,
    ViewportMetrics,
};
use boardlist::session::AppSession;

const HELP: &str = "commands: n(ext) | p(rev) | g <page> | s <size> | m(ore) | r(eload) | q(uit)";

/// Page through the post list interactively
#[derive(Args)]
pub struct BrowseCommand {
    /// Posts per page for this session
    #[arg(short = 's', long = "page-size")]
    pub page_size: Option<i64>,
}

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Intent(Intent),
    /// Scroll to the bottom and let the loop tick
    More,
    Help,
    Quit,
}

impl BrowseCommand {
    pub async fn execute(&self, session: &AppSession) -> Result<()> {
        let mut view = match self.page_size {
            Some(size) => {
                let change = validate_page_size(size, session.config().max_page_size)
                    .map_err(|e| anyhow!("{}", e))?;
                if let Some(message) = &change.message {
                    println!("! {}", message);
                }
                session.open_list_view_with_page_size(change.applied).await
            }
            None => session.open_list_view().await,
        };

        println!("Signed in as {}", session.user().name);
        println!("{}", HELP);
        print_snapshot(&view.snapshot());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let command = match parse_command(&line, session.config().max_page_size) {
                Ok(command) => command,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };
            debug!("Browse command: {:?}", command);

            let signals = match command {
                Command::Quit => break,
                Command::Help => {
                    println!("{}", HELP);
                    continue;
                }
                Command::Intent(intent) => view.dispatch(intent).await,
                Command::More => more(&mut view).await,
            };

            print_notices(&signals);
            if signals.contains(&ViewSignal::Render) {
                print_snapshot(&view.snapshot());
            } else {
                print_status(&view.snapshot());
            }
        }

        Ok(())
    }
}

/// A terminal has no scroll events; "more" stands in for reaching the bottom
async fn more(view: &mut ListView) -> Vec<ViewSignal> {
    let snapshot = view.snapshot();
    let content_height = snapshot.rows.len() as f64;
    view.dispatch(Intent::Scroll(ViewportMetrics::at_bottom(content_height, 1.0)))
        .await;
    view.dispatch(Intent::Tick).await
}

fn parse_command(line: &str, max_page_size: usize) -> std::result::Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(Command::Help);
    };
    let argument = parts.next();

    match (word, argument) {
        ("n" | "next", None) => Ok(Command::Intent(Intent::Next)),
        ("p" | "prev", None) => Ok(Command::Intent(Intent::Previous)),
        ("m" | "more", None) => Ok(Command::More),
        ("r" | "reload", None) => Ok(Command::Intent(Intent::Reload)),
        ("q" | "quit", None) => Ok(Command::Quit),
        ("h" | "help", None) => Ok(Command::Help),
        ("g" | "go", Some(page)) => page
            .parse()
            .map(|page| Command::Intent(Intent::GoTo(page)))
            .map_err(|_| format!("'{}' is not a page number", page)),
        ("s" | "size", Some(size)) => parse_page_size(size, max_page_size)
            .map(|change| {
                // The view clamps over-ceiling sizes and reports it
                let requested = change.clamped_from.unwrap_or(change.applied as i64);
                Command::Intent(Intent::ApplyPageSize(requested))
            })
            .map_err(|e| e.to_string()),
        _ => Err(format!("unknown command '{}'; {}", line.trim(), HELP)),
    }
}

fn print_notices(signals: &[ViewSignal]) {
    for signal in signals {
        if let ViewSignal::Notice(message) = signal {
            println!("! {}", message);
        }
    }
}

fn print_snapshot(snapshot: &ListSnapshot) {
    for row in &snapshot.rows {
        let number = row
            .number
            .map(|n| n.to_string())
            .unwrap_or_default();
        let when = row
            .record
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("{:>6}  {:<60} {}", number, row.record.title, when);
    }
    print_status(snapshot);
}

fn print_status(snapshot: &ListSnapshot) {
    println!("{}", status_line(snapshot));
}

fn status_line(snapshot: &ListSnapshot) -> String {
    let pages = snapshot
        .total_pages
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());
    let total = snapshot
        .total_items
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());

    let mut line = format!(
        "-- page {}/{} | showing {} of {} loaded | {} posts | {} per page",
        snapshot.page,
        pages,
        snapshot.rows.len(),
        snapshot.loaded_count,
        total,
        snapshot.page_size
    );
    if snapshot.can_go_previous {
        line.push_str(" | [p]rev");
    }
    if snapshot.can_go_next {
        line.push_str(" | [n]ext");
    } else if snapshot.rows.len() < snapshot.loaded_count {
        line.push_str(" | [m]ore");
    }
    line
}
