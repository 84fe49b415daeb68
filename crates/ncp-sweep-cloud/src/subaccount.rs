//! Sub-account records, paging and the activate/deactivate workflow

use crate::api::SubAccountApi;
use crate::error::Result;
use crate::progress::ProgressSink;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::{debug, warn};

pub const PAGE_SIZE: u32 = 100;

/// A scoped identity under a root account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubAccount {
    #[serde(rename = "subAccountId", deserialize_with = "string_or_number")]
    pub id: String,
    pub login_id: String,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub can_console_access: bool,
    pub can_api_gateway_access: bool,
}

/// The API serves ids as strings on some endpoints and numbers on others.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
        Missing(()),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
        Id::Missing(()) => String::new(),
    })
}

/// One page of the sub-account listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubAccountPage {
    #[serde(alias = "content")]
    pub items: Vec<SubAccount>,
    #[serde(rename = "totalItems", alias = "totalRows")]
    pub total_items: usize,
}

/// Body of a sub-account update. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_console_access: Option<bool>,
}

impl SubAccountUpdate {
    pub fn set_active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }
}

/// Body of a password reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub need_password_generate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl PasswordReset {
    pub fn explicit(password: impl Into<String>) -> Self {
        Self {
            need_password_generate: false,
            new_password: Some(password.into()),
        }
    }

    pub fn generated() -> Self {
        Self {
            need_password_generate: true,
            new_password: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordResetOutcome {
    pub success: bool,
    pub generated_password: Option<String>,
}

/// Fetch every sub-account, page by page.
///
/// Stops once the collected count reaches the reported total or a page comes
/// back empty, so an inconsistent total cannot loop forever.
pub async fn fetch_all<A>(api: &A) -> Result<Vec<SubAccount>>
where
    A: SubAccountApi + ?Sized,
{
    let mut all = Vec::new();
    let mut page = 0;

    loop {
        let batch = api.list_sub_accounts(page, PAGE_SIZE).await?;
        let received = batch.items.len();
        all.extend(batch.items);
        debug!(page, received, total = batch.total_items, "Fetched sub-account page");

        if received == 0 || all.len() >= batch.total_items {
            break;
        }
        page += 1;
    }

    Ok(all)
}

/// What to do with the targeted sub-accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubAccountAction {
    /// Report each sub-account's state without changing anything.
    List,
    /// Suspend login. Already inactive accounts are skipped.
    Deactivate,
    /// Enable login and reset the password.
    ///
    /// `password` is the run-wide fallback used when the account row has
    /// none; with neither, the provider generates one.
    Activate { password: Option<String> },
}

impl fmt::Display for SubAccountAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubAccountAction::List => f.write_str("list"),
            SubAccountAction::Deactivate => f.write_str("deactivate"),
            SubAccountAction::Activate { .. } => f.write_str("activate"),
        }
    }
}

/// Success/failure counts for sub-account updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAccountTally {
    pub succeeded: usize,
    pub failed: usize,
    /// Already in the desired state; also counted in `succeeded`.
    pub skipped: usize,
}

impl SubAccountTally {
    pub fn merge(&mut self, other: &SubAccountTally) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Pick the sub-accounts an action applies to.
///
/// With a login, only exact matches on `login_id`; otherwise everything.
pub fn select_targets<'a>(accounts: &'a [SubAccount], login: Option<&str>) -> Vec<&'a SubAccount> {
    match login {
        Some(login) => accounts.iter().filter(|s| s.login_id == login).collect(),
        None => accounts.iter().collect(),
    }
}

/// Apply `action` to each target, reporting one line per sub-account.
pub async fn apply_action<A>(
    api: &A,
    targets: &[&SubAccount],
    action: &SubAccountAction,
    account_password: Option<&str>,
    dry_run: bool,
    progress: &dyn ProgressSink,
) -> SubAccountTally
where
    A: SubAccountApi + ?Sized,
{
    let mut tally = SubAccountTally::default();

    for sub in targets {
        match action {
            SubAccountAction::List => {
                let state = if sub.active { "active" } else { "inactive" };
                progress
                    .emit(format!("  · {} ({}) {}", sub.login_id, sub.name, state))
                    .await;
            }
            SubAccountAction::Deactivate => {
                deactivate(api, sub, dry_run, progress, &mut tally).await;
            }
            SubAccountAction::Activate { password } => {
                let password = account_password.or(password.as_deref());
                activate(api, sub, password, dry_run, progress, &mut tally).await;
            }
        }
    }

    tally
}

async fn deactivate<A>(
    api: &A,
    sub: &SubAccount,
    dry_run: bool,
    progress: &dyn ProgressSink,
    tally: &mut SubAccountTally,
) where
    A: SubAccountApi + ?Sized,
{
    if !sub.active {
        tally.succeeded += 1;
        tally.skipped += 1;
        progress
            .emit(format!("  - {} already inactive, skipped", sub.login_id))
            .await;
        return;
    }

    if dry_run {
        progress
            .emit(format!("  · would deactivate {}", sub.login_id))
            .await;
        return;
    }

    match api
        .update_sub_account(&sub.id, &SubAccountUpdate::set_active(false))
        .await
    {
        Ok(()) => {
            tally.succeeded += 1;
            progress.emit(format!("  ✓ deactivated {}", sub.login_id)).await;
        }
        Err(e) => {
            tally.failed += 1;
            warn!(login = %sub.login_id, error = %e, "Failed to deactivate sub-account");
            progress
                .emit(format!("  ✗ deactivate {} failed: {}", sub.login_id, e))
                .await;
        }
    }
}

async fn activate<A>(
    api: &A,
    sub: &SubAccount,
    password: Option<&str>,
    dry_run: bool,
    progress: &dyn ProgressSink,
    tally: &mut SubAccountTally,
) where
    A: SubAccountApi + ?Sized,
{
    if dry_run {
        progress
            .emit(format!("  · would activate {} and reset its password", sub.login_id))
            .await;
        return;
    }

    if !sub.active {
        if let Err(e) = api
            .update_sub_account(&sub.id, &SubAccountUpdate::set_active(true))
            .await
        {
            tally.failed += 1;
            warn!(login = %sub.login_id, error = %e, "Failed to activate sub-account");
            progress
                .emit(format!("  ✗ activate {} failed: {}", sub.login_id, e))
                .await;
            return;
        }
    }

    let request = match password {
        Some(p) => PasswordReset::explicit(p),
        None => PasswordReset::generated(),
    };

    match api.reset_password(&sub.id, &request).await {
        Ok(outcome) => {
            tally.succeeded += 1;
            let line = match outcome.generated_password.filter(|p| !p.is_empty()) {
                Some(generated) => format!(
                    "  ✓ activated {} (generated password: {})",
                    sub.login_id, generated
                ),
                None => format!("  ✓ activated {} (password reset)", sub.login_id),
            };
            progress.emit(line).await;
        }
        Err(e) => {
            tally.failed += 1;
            warn!(login = %sub.login_id, error = %e, "Failed to reset sub-account password");
            progress
                .emit(format!("  ✗ password reset for {} failed: {}", sub.login_id, e))
                .await;
        }
    }
}
