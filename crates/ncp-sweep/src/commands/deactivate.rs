use crate::commands::{run_batch, run_prepared_batch};
use crate::utils::{self, Spinner};
use colored::Colorize;
use ncp_sweep_cloud::{BatchRunner, PreparedAccount, RootAccount, RunOptions, SubAccountAction};
use ncp_sweep_ncloud::NcloudFactory;
use std::path::PathBuf;

pub struct DeactivateArgs {
    pub cleanup: bool,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub login: Option<String>,
    pub yes: bool,
}

pub async fn handle(accounts: Vec<RootAccount>, args: DeactivateArgs) -> anyhow::Result<()> {
    if args.config.is_some() && !args.cleanup {
        println!("{}", "--config only applies together with --cleanup, ignoring it".yellow());
    }

    let filters = if args.cleanup {
        let filters = ncp_sweep_config::resolve_filter(args.config.as_deref())?;
        if filters.is_some() {
            println!("{}", "Resource filter loaded".blue());
        }
        filters
    } else {
        None
    };

    let options = RunOptions {
        cleanup: args.cleanup,
        filters,
        login: args.login.clone(),
        dry_run: args.dry_run,
        ..RunOptions::new(SubAccountAction::Deactivate)
    };

    println!();
    if !args.cleanup {
        println!(
            "Deactivating the sub-accounts of {} root account(s).",
            accounts.len().to_string().cyan()
        );
        if !confirmed(&args)? {
            return Ok(());
        }
        run_batch(&accounts, options).await;
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Every resource of {} root account(s) will be deleted, then their sub-accounts deactivated.",
            accounts.len()
        )
        .red()
        .bold()
    );
    println!(
        "Targets: servers, block storage, public IPs, NAS, load balancers, Cloud DB, VPC networking and more."
    );

    // Teardown acts on exactly what is shown here
    let runner = BatchRunner::new(NcloudFactory, options);
    let prepared = preview(&runner, &accounts).await;
    if !confirmed(&args)? {
        return Ok(());
    }
    run_prepared_batch(runner, &prepared).await;
    Ok(())
}

fn confirmed(args: &DeactivateArgs) -> anyhow::Result<bool> {
    if args.dry_run {
        println!("{}", "Dry run: no resource or sub-account will be changed.".yellow());
        return Ok(true);
    }
    if !args.yes && !utils::confirm("Continue?")? {
        println!("Cancelled.");
        return Ok(false);
    }
    Ok(true)
}

/// List and filter each account's resources so the user sees what is at
/// stake before confirming.
async fn preview(
    runner: &BatchRunner<NcloudFactory>,
    accounts: &[RootAccount],
) -> Vec<PreparedAccount> {
    println!();
    println!("{}", "=== Collecting resources ===".bold());

    let mut prepared = Vec::with_capacity(accounts.len());
    let mut total = 0;
    for account in accounts {
        println!();
        println!("[{}]", account.account_name.cyan());

        let spinner = Spinner::new("Listing resources...");
        let result = runner.prepare(account).await;
        spinner.clear();

        match result {
            Ok(found) => {
                for error in &found.collection_errors {
                    println!("  {}", format!("! could not list {}", error).yellow());
                }
                total += found.inventory.total_count();
                println!("  {}", found.inventory.summary_line());
                prepared.push(found);
            }
            Err(e) => {
                println!("  {}", format!("✗ {}", e).red());
                prepared.push(PreparedAccount::empty(account.clone()));
            }
        }
    }

    println!();
    println!("{} resource(s) in total", total.to_string().bold());
    prepared
}
