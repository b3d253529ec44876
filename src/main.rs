//! Terminal dashboard for a remote commit-tracking service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use commitdeck::feed::{Action, FeedAction, FeedConfig, FeedController, FeedSnapshot, TrackingState};
use commitdeck::infra::api::{ApiGateway, HttpApiGateway};
use commitdeck::infra::app_config;

#[derive(Parser)]
#[command(
    name = "commitdeck",
    version,
    about = "Watch a repository's commit feed, one commit at a time"
)]
struct Cli {
    /// Base URL of the tracking API (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,
    /// Feed poll cadence in milliseconds while tracking
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    /// Reveal cadence in milliseconds while playing
    #[arg(long)]
    advance_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = app_config::load_config();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(ms) = cli.advance_interval_ms {
        config.advance_interval_ms = ms;
    }

    let gateway = Arc::new(HttpApiGateway::new(
        &config.api_base_url,
        Duration::from_millis(config.request_timeout_ms),
    )?);
    let mut controller = FeedController::new(gateway.clone(), FeedConfig::from(&config));

    log::info!("Connected to {}", config.api_base_url);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(200));
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => {}
                    "track" => controller.dispatch(Action::Feed(FeedAction::StartTracking)),
                    "refresh" => controller.dispatch(Action::Feed(FeedAction::Refresh)),
                    "next" => {
                        controller.dispatch(Action::Feed(FeedAction::AdvanceReveal));
                        render(&controller.snapshot());
                    }
                    "play" => controller.dispatch(Action::Feed(FeedAction::Resume)),
                    "pause" => controller.dispatch(Action::Feed(FeedAction::Pause)),
                    "all" => {
                        controller.dispatch(Action::Feed(FeedAction::ShowAll));
                        render(&controller.snapshot());
                    }
                    "reset" => {
                        controller.dispatch(Action::Feed(FeedAction::ResetReveal));
                        render(&controller.snapshot());
                    }
                    "clear" => controller.dispatch(Action::Feed(FeedAction::Clear)),
                    "status" => match gateway.health().await {
                        Ok(report) => println!(
                            "service {} is {}",
                            report.service.as_deref().unwrap_or("unknown"),
                            report.status.as_deref().unwrap_or("unknown"),
                        ),
                        Err(err) => println!("health check failed: {err}"),
                    },
                    "help" => print_help(),
                    "quit" | "exit" | "q" => break,
                    other => println!("unknown command: {other} (try 'help')"),
                }
            }
            _ = ticker.tick() => {
                if controller.poll_pending_actions() {
                    render(&controller.snapshot());
                }
            }
        }
    }

    Ok(())
}

fn render(snapshot: &FeedSnapshot) {
    let state = match snapshot.tracking_state {
        TrackingState::Idle => "idle",
        TrackingState::Tracking => "tracking",
        TrackingState::PausedReveal => "paused",
    };
    println!(
        "[{state}] {}/{} shown{}{}",
        snapshot.revealed_commits.len(),
        snapshot.total_known_count,
        if snapshot.loading { ", loading" } else { "" },
        if snapshot.is_playing { ", playing" } else { "" },
    );
    if let Some(err) = &snapshot.last_error {
        println!("  ! {err}");
    }
    for record in &snapshot.revealed_commits {
        let place = match (&record.repository, &record.branch) {
            (Some(repo), Some(branch)) => format!(" [{repo}@{branch}]"),
            (Some(repo), None) => format!(" [{repo}]"),
            _ => String::new(),
        };
        println!(
            "  {:>3}. {:.9} {} ({}, {}){place}",
            record.display_order,
            record.hash,
            record.message,
            record.author,
            record.timestamp.format("%Y-%m-%d %H:%M"),
        );
    }
}

fn print_help() {
    println!("commands:");
    println!("  track    start server-side tracking and begin polling");
    println!("  refresh  fetch the feed now");
    println!("  next     reveal the next commit");
    println!("  play     auto-reveal on a timer");
    println!("  pause    stop the auto-reveal timer");
    println!("  all      reveal every known commit");
    println!("  reset    hide everything again");
    println!("  clear    delete all commits on the server and go idle");
    println!("  status   check service health");
    println!("  quit     exit");
}
