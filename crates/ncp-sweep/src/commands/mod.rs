pub mod activate;
pub mod deactivate;
pub mod list;
pub mod template;
pub mod tui;

use crate::utils;
use colored::Colorize;
use ncp_sweep_cloud::{BatchRunner, BatchSummary, PreparedAccount, RootAccount, RunOptions};
use ncp_sweep_ncloud::NcloudFactory;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Run the batch against the live API, printing progress as it arrives.
///
/// Ctrl-C cancels the run at the next wait or API call; the partial
/// summary is still printed.
pub(crate) async fn run_batch(accounts: &[RootAccount], options: RunOptions) -> BatchSummary {
    let (cancel, watcher) = cancel_on_ctrl_c();
    let runner = BatchRunner::new(NcloudFactory, options).with_cancellation(cancel);
    let sink = |line: String| utils::print_progress_line(&line);
    let summary = runner.run(accounts, &sink).await;

    watcher.abort();
    utils::print_summary(&summary);
    summary
}

/// Same as [`run_batch`], tearing down inventories the user already reviewed.
pub(crate) async fn run_prepared_batch(
    runner: BatchRunner<NcloudFactory>,
    prepared: &[PreparedAccount],
) -> BatchSummary {
    let (cancel, watcher) = cancel_on_ctrl_c();
    let runner = runner.with_cancellation(cancel);
    let sink = |line: String| utils::print_progress_line(&line);
    let summary = runner.run_prepared(prepared, &sink).await;

    watcher.abort();
    utils::print_summary(&summary);
    summary
}

fn cancel_on_ctrl_c() -> (CancellationToken, JoinHandle<()>) {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "Cancelling after the current step...".yellow());
            trigger.cancel();
        }
    });
    (cancel, watcher)
}
