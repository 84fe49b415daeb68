use crate::tui;
use ncp_sweep_cloud::RootAccount;
use std::path::PathBuf;

pub async fn handle(accounts: Vec<RootAccount>, config: Option<PathBuf>) -> anyhow::Result<()> {
    // Load before taking over the terminal so filter errors print normally
    let filters = ncp_sweep_config::resolve_filter(config.as_deref())?;
    tui::run(accounts, filters).await
}
