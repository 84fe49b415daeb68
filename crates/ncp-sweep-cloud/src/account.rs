//! Root account credentials

use std::fmt;

/// One row of the credential sheet.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RootAccount {
    pub account_name: String,
    pub access_key: String,
    pub secret_key: String,
    /// Only this sub-account login is touched when set.
    pub target_sub_username: Option<String>,
    /// Password to set when activating sub-accounts of this account.
    pub password: Option<String>,
}

impl RootAccount {
    pub fn new(
        account_name: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            target_sub_username: None,
            password: None,
        }
    }

    pub fn with_target(mut self, login: impl Into<String>) -> Self {
        self.target_sub_username = Some(login.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

// Keeps secrets out of logs and panic messages.
impl fmt::Debug for RootAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootAccount")
            .field("account_name", &self.account_name)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("target_sub_username", &self.target_sub_username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
