//! Interactive terminal UI
//!
//! Account selection, confirmation and a live progress log built on
//! ratatui. The batch runner works on a background task and streams its
//! progress lines through a bounded channel; the UI drains the channel
//! between frames until it closes.

mod app;
mod terminal;
mod ui;

use app::{App, Command};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ncp_sweep_cloud::{
    BatchRunner, BatchSummary, ChannelSink, FilterSet, RootAccount, RunOptions, SubAccountAction,
};
use ncp_sweep_ncloud::NcloudFactory;
use std::io;
use std::time::Duration;
use terminal::{Tui, restore_terminal, setup_terminal};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Progress lines buffered between the worker and the UI.
const PROGRESS_BUFFER: usize = 100;
const TICK: Duration = Duration::from_millis(100);

/// A batch running in the background.
struct Worker {
    progress: mpsc::Receiver<String>,
    handle: JoinHandle<BatchSummary>,
}

pub async fn run(accounts: Vec<RootAccount>, filters: Option<FilterSet>) -> anyhow::Result<()> {
    let mut app = App::new(accounts, filters.is_some());
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut app, filters).await;

    restore_terminal(&mut terminal)?;
    if let Some(summary) = &app.summary {
        crate::utils::print_summary(summary);
    }
    result
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    filters: Option<FilterSet>,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let mut worker: Option<Worker> = None;

    loop {
        let closed = worker
            .as_mut()
            .is_some_and(|running| drain_progress(&mut running.progress, app));
        if closed && let Some(finished) = worker.take() {
            // The sender lives inside the task, so a closed channel means it is done
            let summary = finished.handle.await?;
            app.finish(summary);
        }

        terminal.draw(|f| ui::draw_ui(f, app))?;

        let Some(key) = next_key(TICK).await? else {
            continue;
        };
        match app.handle_key(key) {
            Command::None => {}
            Command::Quit => break,
            Command::Cancel => cancel.cancel(),
            Command::Start => {
                let options = RunOptions {
                    cleanup: app.cleanup,
                    filters: if app.cleanup { filters.clone() } else { None },
                    ..RunOptions::new(SubAccountAction::Deactivate)
                };
                worker = Some(spawn_batch(app.selected_accounts(), options, cancel.clone()));
            }
        }
    }

    // Quit is not accepted while running; stop anything still alive
    if let Some(running) = worker {
        cancel.cancel();
        running.handle.abort();
    }
    Ok(())
}

fn spawn_batch(
    accounts: Vec<RootAccount>,
    options: RunOptions,
    cancel: CancellationToken,
) -> Worker {
    let (tx, rx) = mpsc::channel(PROGRESS_BUFFER);
    let runner = BatchRunner::new(NcloudFactory, options).with_cancellation(cancel);

    let handle = tokio::spawn(async move {
        let sink = ChannelSink::new(tx);
        runner.run(&accounts, &sink).await
    });

    Worker {
        progress: rx,
        handle,
    }
}

/// Move every queued line into the log. Returns true once the channel is closed.
fn drain_progress(progress: &mut mpsc::Receiver<String>, app: &mut App) -> bool {
    loop {
        match progress.try_recv() {
            Ok(line) => app.push_log(line),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}

/// Wait up to `timeout` for a key press without blocking the runtime.
async fn next_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    tokio::task::spawn_blocking(move || {
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(Some(key));
        }
        Ok(None)
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_progress_until_closed() {
        let mut app = App::new(vec![RootAccount::new("lab-01", "ak", "sk")], false);
        let (tx, mut rx) = mpsc::channel(PROGRESS_BUFFER);

        tx.send("━━ lab-01 ━━".to_string()).await.unwrap();
        tx.send("  ✓ deactivated student01".to_string()).await.unwrap();
        assert!(!drain_progress(&mut rx, &mut app));
        assert_eq!(app.log.len(), 2);

        tx.send("Done.".to_string()).await.unwrap();
        drop(tx);
        assert!(drain_progress(&mut rx, &mut app));
        assert_eq!(app.log.last().map(String::as_str), Some("Done."));
    }

    #[tokio::test]
    async fn test_worker_with_bad_credentials_finishes() {
        let account = RootAccount::new("lab-01", "", "");
        let mut worker = spawn_batch(
            vec![account],
            RunOptions::new(SubAccountAction::Deactivate),
            CancellationToken::new(),
        );

        let mut lines = Vec::new();
        while let Some(line) = worker.progress.recv().await {
            lines.push(line);
        }
        let summary = worker.handle.await.unwrap();

        assert_eq!(summary.skipped_accounts(), 1);
        assert!(lines.iter().any(|l| l.contains("could not connect")));
    }
}
