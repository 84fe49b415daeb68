//! Root account credentials from a spreadsheet
//!
//! The first sheet holds one header row followed by one row per root
//! account. Header names are matched loosely so both English and Korean
//! templates work.

use crate::error::{ConfigError, Result};
use calamine::{Data, Reader, open_workbook_auto};
use ncp_sweep_cloud::RootAccount;
use std::path::Path;
use tracing::warn;

/// Column positions found in the header row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Columns {
    account_name: Option<usize>,
    access_key: Option<usize>,
    secret_key: Option<usize>,
    login: Option<usize>,
    password: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Self {
        let mut columns = Columns::default();

        for (i, cell) in header.iter().enumerate() {
            let normalized = cell.trim().to_lowercase();
            let has = |needle: &str| normalized.contains(needle);

            if has("account") && has("name") {
                columns.account_name = Some(i);
            } else if matches!(normalized.as_str(), "name" | "계정명" | "계정이름" | "계정 이름") {
                columns.account_name.get_or_insert(i);
            } else if has("access") && has("key") {
                columns.access_key = Some(i);
            } else if has("secret") && has("key") {
                columns.secret_key = Some(i);
            } else if has("iam") || matches!(normalized.as_str(), "id" | "아이디" | "loginid") {
                columns.login = Some(i);
            } else if matches!(normalized.as_str(), "password" | "pw" | "비밀번호" | "비번") {
                columns.password = Some(i);
            }
        }

        columns
    }
}

fn cell(row: &[String], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Turn already-extracted rows (header first) into root accounts.
///
/// Rows missing an access or secret key are skipped with a warning. A row
/// without a name becomes `Account-<n>`, counting data rows from 1.
pub fn parse_rows(rows: &[Vec<String>]) -> Result<Vec<RootAccount>> {
    let Some((header, data)) = rows.split_first() else {
        return Err(ConfigError::NotEnoughRows);
    };
    if data.is_empty() {
        return Err(ConfigError::NotEnoughRows);
    }

    let columns = Columns::from_header(header);
    if columns.access_key.is_none() {
        return Err(ConfigError::MissingColumn("AccessKey"));
    }
    if columns.secret_key.is_none() {
        return Err(ConfigError::MissingColumn("SecretKey"));
    }

    let mut accounts = Vec::new();
    for (i, row) in data.iter().enumerate() {
        let line = i + 2;
        let access_key = cell(row, columns.access_key);
        let secret_key = cell(row, columns.secret_key);

        if access_key.is_empty() || secret_key.is_empty() {
            warn!(row = line, "AccessKey or SecretKey is empty, skipping row");
            continue;
        }

        let mut name = cell(row, columns.account_name);
        if name.is_empty() {
            name = format!("Account-{}", i + 1);
        }

        let mut account = RootAccount::new(name, access_key, secret_key);
        let login = cell(row, columns.login);
        if !login.is_empty() {
            account = account.with_target(login);
        }
        let password = cell(row, columns.password);
        if !password.is_empty() {
            account = account.with_password(password);
        }
        accounts.push(account);
    }

    if accounts.is_empty() {
        return Err(ConfigError::NoValidAccounts);
    }
    Ok(accounts)
}

/// Read root accounts from the first sheet of an `.xlsx`, `.xls` or `.ods` file.
pub fn read_accounts(path: &Path) -> Result<Vec<RootAccount>> {
    let spreadsheet_error = |message: String| ConfigError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ConfigError::NoSheets)?
        .map_err(|e| spreadsheet_error(e.to_string()))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    parse_rows(&rows)
}

fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Keep only the account named `name`, or all of them when `name` is `None`.
pub fn select_accounts(accounts: Vec<RootAccount>, name: Option<&str>) -> Result<Vec<RootAccount>> {
    match name {
        None => Ok(accounts),
        Some(name) => {
            let selected: Vec<_> = accounts
                .into_iter()
                .filter(|a| a.account_name == name)
                .collect();
            if selected.is_empty() {
                Err(ConfigError::AccountNotFound(name.to_string()))
            } else {
                Ok(selected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_english_headers() {
        let accounts = parse_rows(&rows(&[
            &["AccountName", "AccessKey", "SecretKey", "IAM Username", "Password"],
            &["Lab-01", "AK1", "SK1", "student01", "Init123!"],
        ]))
        .unwrap();

        assert_eq!(accounts.len(), 1);
        let account = &accounts[0];
        assert_eq!(account.account_name, "Lab-01");
        assert_eq!(account.access_key, "AK1");
        assert_eq!(account.secret_key, "SK1");
        assert_eq!(account.target_sub_username.as_deref(), Some("student01"));
        assert_eq!(account.password.as_deref(), Some("Init123!"));
    }

    #[test]
    fn test_korean_headers_and_reordered_columns() {
        let accounts = parse_rows(&rows(&[
            &[" Secret Key ", "계정명", "아이디", "Access Key", "비밀번호"],
            &["SK", "실습-1", "user1", "AK", "pw1"],
        ]))
        .unwrap();

        assert_eq!(accounts[0].account_name, "실습-1");
        assert_eq!(accounts[0].access_key, "AK");
        assert_eq!(accounts[0].secret_key, "SK");
        assert_eq!(accounts[0].target_sub_username.as_deref(), Some("user1"));
    }

    #[test]
    fn test_account_name_column_beats_plain_name() {
        let columns = Columns::from_header(&[
            "Name".to_string(),
            "Account Name".to_string(),
            "AccessKey".to_string(),
        ]);
        assert_eq!(columns.account_name, Some(1));
    }

    #[test]
    fn test_blank_rows_are_skipped_and_names_defaulted() {
        let accounts = parse_rows(&rows(&[
            &["Name", "AccessKey", "SecretKey"],
            &["", "AK1", "SK1"],
            &["skipped", "", "SK2"],
            &["Lab-03", "AK3", "SK3"],
        ]))
        .unwrap();

        let names: Vec<_> = accounts.iter().map(|a| a.account_name.as_str()).collect();
        assert_eq!(names, vec!["Account-1", "Lab-03"]);
        assert!(accounts[0].target_sub_username.is_none());
        assert!(accounts[0].password.is_none());
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let accounts = parse_rows(&rows(&[
            &["AccountName", "AccessKey", "SecretKey", "Password"],
            &["Lab-01", "AK1", "SK1"],
        ]))
        .unwrap();
        assert!(accounts[0].password.is_none());
    }

    #[test]
    fn test_missing_secret_column() {
        let result = parse_rows(&rows(&[&["AccountName", "AccessKey"], &["a", "b"]]));
        assert!(matches!(result, Err(ConfigError::MissingColumn("SecretKey"))));
    }

    #[test]
    fn test_header_only() {
        let result = parse_rows(&rows(&[&["AccountName", "AccessKey", "SecretKey"]]));
        assert!(matches!(result, Err(ConfigError::NotEnoughRows)));
    }

    #[test]
    fn test_no_valid_rows() {
        let result = parse_rows(&rows(&[&["AccessKey", "SecretKey"], &["", ""]]));
        assert!(matches!(result, Err(ConfigError::NoValidAccounts)));
    }

    #[test]
    fn test_select_accounts() {
        let accounts = vec![
            RootAccount::new("a", "ak", "sk"),
            RootAccount::new("b", "ak", "sk"),
        ];
        assert_eq!(select_accounts(accounts.clone(), None).unwrap().len(), 2);

        let only_b = select_accounts(accounts.clone(), Some("b")).unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].account_name, "b");

        assert!(matches!(
            select_accounts(accounts, Some("c")),
            Err(ConfigError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_unreadable_file() {
        let result = read_accounts(Path::new("/nonexistent/accounts.xlsx"));
        assert!(matches!(result, Err(ConfigError::Spreadsheet { .. })));
    }
}
