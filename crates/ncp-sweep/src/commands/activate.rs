use crate::commands::run_batch;
use crate::utils;
use colored::Colorize;
use ncp_sweep_cloud::{RootAccount, RunOptions, SubAccountAction};

pub async fn handle(
    accounts: Vec<RootAccount>,
    password: Option<String>,
    login: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => Some(password),
        None if needs_fallback_password(&accounts) => {
            let entered = utils::prompt_password(
                "Password for accounts whose row has none (empty = let NCP generate one): ",
            )?;
            if entered.is_empty() {
                println!("{}", "Passwords will be generated by NCP and printed below.".yellow());
                None
            } else {
                Some(entered)
            }
        }
        None => None,
    };

    println!();
    println!(
        "Activating and resetting passwords for the sub-accounts of {} root account(s).",
        accounts.len().to_string().cyan()
    );
    if !yes && !utils::confirm("Continue?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let options = RunOptions {
        login,
        ..RunOptions::new(SubAccountAction::Activate { password })
    };
    run_batch(&accounts, options).await;
    Ok(())
}

/// True when some row has no password of its own.
fn needs_fallback_password(accounts: &[RootAccount]) -> bool {
    accounts.iter().any(|account| account.password.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_fallback_password() {
        let with = RootAccount::new("a", "ak", "sk").with_password("pw");
        let without = RootAccount::new("b", "ak", "sk");

        assert!(!needs_fallback_password(std::slice::from_ref(&with)));
        assert!(needs_fallback_password(&[with, without]));
        assert!(!needs_fallback_password(&[]));
    }
}
