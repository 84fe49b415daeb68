use crate::utils::Spinner;
use colored::Colorize;
use ncp_sweep_cloud::{ApiFactory, RootAccount, SubAccount, fetch_all_sub_accounts};
use ncp_sweep_ncloud::NcloudFactory;

pub async fn handle(accounts: &[RootAccount]) -> anyhow::Result<()> {
    for account in accounts {
        println!();
        println!(
            "{}",
            format!("[Root account: {}]", account.account_name).bold()
        );

        let api = match NcloudFactory.connect(account) {
            Ok(api) => api,
            Err(e) => {
                eprintln!("  {}", format!("✗ {}", e).red());
                continue;
            }
        };

        let spinner = Spinner::new("Fetching sub-accounts...");
        let result = fetch_all_sub_accounts(api.as_ref()).await;
        spinner.clear();

        match result {
            Ok(subs) if subs.is_empty() => {
                println!("  {}", "No sub-accounts".dimmed());
            }
            Ok(subs) => print_table(&subs),
            Err(e) => {
                tracing::warn!(
                    account = %account.account_name,
                    error = %e,
                    "Failed to list sub-accounts"
                );
                eprintln!("  {}", format!("✗ {}", e).red());
            }
        }
    }

    Ok(())
}

fn print_table(subs: &[SubAccount]) {
    println!(
        "{}",
        format!(
            "  {:<12} {:<20} {:<20} {:<28} {:<9} {:<8} {:<4}",
            "ID", "LOGIN", "NAME", "EMAIL", "STATUS", "CONSOLE", "API"
        )
        .bold()
    );
    println!("  {}", "─".repeat(107).dimmed());

    for sub in subs {
        let status = if sub.active {
            format!("{:<9}", "active").green()
        } else {
            format!("{:<9}", "inactive").red()
        };
        println!(
            "  {:<12} {} {:<20} {:<28} {} {:<8} {:<4}",
            sub.id,
            format!("{:<20}", sub.login_id).cyan(),
            sub.name,
            sub.email,
            status,
            access_mark(sub.can_console_access),
            access_mark(sub.can_api_gateway_access)
        );
    }

    println!();
    println!("  {} sub-account(s)", subs.len());
}

fn access_mark(allowed: bool) -> &'static str {
    if allowed { "O" } else { "X" }
}
