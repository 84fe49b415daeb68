//! Sequential processing of many root accounts

use crate::account::RootAccount;
use crate::api::ApiFactory;
use crate::clock::{Clock, TokioClock};
use crate::error::Result;
use crate::filter::FilterSet;
use crate::inventory::{self, CollectError, ResourceInventory};
use crate::progress::ProgressSink;
use crate::subaccount::{self, SubAccountAction, SubAccountTally};
use crate::teardown::{Teardown, TeardownResult, TeardownTimings};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Everything that shapes one batch run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub action: SubAccountAction,
    /// Delete resources before touching sub-accounts.
    pub cleanup: bool,
    pub filters: Option<FilterSet>,
    /// Sub-account login to target when an account row names none.
    pub login: Option<String>,
    pub timings: TeardownTimings,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(action: SubAccountAction) -> Self {
        Self {
            action,
            cleanup: false,
            filters: None,
            login: None,
            timings: TeardownTimings::default(),
            dry_run: false,
        }
    }
}

/// What happened to one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountOutcome {
    pub account_name: String,
    /// Set when cleanup ran.
    pub teardown: Option<TeardownResult>,
    pub collection_errors: usize,
    pub sub_accounts: SubAccountTally,
    /// Why the account was abandoned part way, if it was.
    pub skipped: Option<String>,
}

impl AccountOutcome {
    fn new(account_name: &str) -> Self {
        Self {
            account_name: account_name.to_string(),
            ..Self::default()
        }
    }
}

/// An account whose resources were collected and filtered ahead of the run,
/// typically so the user could review them first.
#[derive(Debug)]
pub struct PreparedAccount {
    pub account: RootAccount,
    pub inventory: ResourceInventory,
    pub collection_errors: Vec<CollectError>,
}

impl PreparedAccount {
    /// Nothing collected. The run still connects and reports the account.
    pub fn empty(account: RootAccount) -> Self {
        Self {
            account,
            inventory: ResourceInventory::new(),
            collection_errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub accounts: Vec<AccountOutcome>,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn teardown_total(&self) -> TeardownResult {
        let mut total = TeardownResult::default();
        for result in self.accounts.iter().filter_map(|a| a.teardown.as_ref()) {
            total.merge(result);
        }
        total
    }

    pub fn sub_account_total(&self) -> SubAccountTally {
        let mut total = SubAccountTally::default();
        for account in &self.accounts {
            total.merge(&account.sub_accounts);
        }
        total
    }

    pub fn skipped_accounts(&self) -> usize {
        self.accounts.iter().filter(|a| a.skipped.is_some()).count()
    }

    pub fn summary_line(&self) -> String {
        let resources = self.teardown_total();
        let subs = self.sub_account_total();
        let mut line = format!(
            "{} account(s): resources {} deleted / {} failed, sub-accounts {} succeeded / {} failed",
            self.accounts.len(),
            resources.succeeded,
            resources.failed,
            subs.succeeded,
            subs.failed
        );
        let skipped = self.skipped_accounts();
        if skipped > 0 {
            line.push_str(&format!(", {} skipped", skipped));
        }
        if self.cancelled {
            line.push_str(" (cancelled)");
        }
        line
    }
}

/// Runs collect, filter, teardown and the sub-account action for each
/// account in turn.
pub struct BatchRunner<F> {
    factory: F,
    options: RunOptions,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl<F: ApiFactory> BatchRunner<F> {
    pub fn new(factory: F, options: RunOptions) -> Self {
        Self {
            factory,
            options,
            clock: Arc::new(TokioClock),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub async fn run(&self, accounts: &[RootAccount], progress: &dyn ProgressSink) -> BatchSummary {
        let jobs = accounts.iter().map(|account| (account, None)).collect();
        self.run_jobs(jobs, progress).await
    }

    /// Like [`BatchRunner::run`], but cleanup tears down the given
    /// inventories as they are instead of listing each account again.
    pub async fn run_prepared(
        &self,
        prepared: &[PreparedAccount],
        progress: &dyn ProgressSink,
    ) -> BatchSummary {
        let jobs = prepared
            .iter()
            .map(|p| (&p.account, Some(p)))
            .collect();
        self.run_jobs(jobs, progress).await
    }

    /// Connect, collect and apply the run's filters for one account.
    pub async fn prepare(&self, account: &RootAccount) -> Result<PreparedAccount> {
        let api = self.factory.connect(account)?;
        let (mut found, errors) = inventory::collect(api.as_ref()).await;
        if let Some(filters) = &self.options.filters {
            filters.apply(&mut found);
        }
        Ok(PreparedAccount {
            account: account.clone(),
            inventory: found,
            collection_errors: errors,
        })
    }

    async fn run_jobs(
        &self,
        jobs: Vec<(&RootAccount, Option<&PreparedAccount>)>,
        progress: &dyn ProgressSink,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (account, prepared) in jobs {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let outcome = self.run_account(account, prepared, progress).await;
            summary.accounts.push(outcome);
        }
        if self.cancel.is_cancelled() {
            summary.cancelled = true;
        }

        info!(
            accounts = summary.accounts.len(),
            cancelled = summary.cancelled,
            "Batch finished"
        );
        progress.emit(String::new()).await;
        progress
            .emit(format!("Done. {}", summary.summary_line()))
            .await;
        summary
    }

    async fn run_account(
        &self,
        account: &RootAccount,
        prepared: Option<&PreparedAccount>,
        progress: &dyn ProgressSink,
    ) -> AccountOutcome {
        let mut outcome = AccountOutcome::new(&account.account_name);
        progress
            .emit(format!("━━ {} ━━", account.account_name))
            .await;

        let api = match self.factory.connect(account) {
            Ok(api) => api,
            Err(e) => {
                warn!(account = %account.account_name, error = %e, "Could not build API client");
                progress.emit(format!("  ✗ could not connect: {}", e)).await;
                outcome.skipped = Some(e.to_string());
                return outcome;
            }
        };

        if self.options.cleanup {
            let collected;
            let found = match prepared {
                Some(prepared) => {
                    outcome.collection_errors = prepared.collection_errors.len();
                    &prepared.inventory
                }
                None => {
                    progress.emit("  collecting resources…".to_string()).await;
                    let (mut listed, errors) = inventory::collect(api.as_ref()).await;
                    outcome.collection_errors = errors.len();
                    for error in &errors {
                        progress
                            .emit(format!("  ! could not list {}", error))
                            .await;
                    }
                    if let Some(filters) = &self.options.filters {
                        filters.apply(&mut listed);
                    }
                    collected = listed;
                    &collected
                }
            };
            progress
                .emit(format!("  found: {}", found.summary_line()))
                .await;

            let result = if found.is_empty() {
                TeardownResult::default()
            } else {
                let result = Teardown::new(api.as_ref())
                    .with_clock(self.clock.as_ref())
                    .with_timings(self.options.timings)
                    .with_cancellation(self.cancel.clone())
                    .dry_run(self.options.dry_run)
                    .run(found, progress)
                    .await;
                progress
                    .emit(format!(
                        "  teardown: {} succeeded, {} failed",
                        result.succeeded, result.failed
                    ))
                    .await;
                result
            };
            outcome.teardown = Some(result);
            if result.cancelled {
                return outcome;
            }
        }

        if self.cancel.is_cancelled() {
            return outcome;
        }

        let subs = match subaccount::fetch_all(api.as_ref()).await {
            Ok(subs) => subs,
            Err(e) => {
                warn!(account = %account.account_name, error = %e, "Failed to list sub-accounts");
                progress
                    .emit(format!("  ✗ could not list sub-accounts: {}", e))
                    .await;
                outcome.skipped = Some(e.to_string());
                return outcome;
            }
        };

        let login = account
            .target_sub_username
            .as_deref()
            .or(self.options.login.as_deref());
        let targets = subaccount::select_targets(&subs, login);
        if targets.is_empty() {
            match login {
                Some(login) => {
                    warn!(account = %account.account_name, login, "Sub-account not found");
                    progress
                        .emit(format!("  ! sub-account {} not found", login))
                        .await;
                }
                None => progress.emit("  no sub-accounts".to_string()).await,
            }
            return outcome;
        }

        outcome.sub_accounts = subaccount::apply_action(
            api.as_ref(),
            &targets,
            &self.options.action,
            account.password.as_deref(),
            self.options.dry_run,
            progress,
        )
        .await;
        progress
            .emit(format!(
                "  sub-accounts ({}): {} succeeded, {} failed",
                self.options.action, outcome.sub_accounts.succeeded, outcome.sub_accounts.failed
            ))
            .await;

        outcome
    }
}
