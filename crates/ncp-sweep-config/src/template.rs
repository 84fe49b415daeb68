//! Blank credential workbook for new users

use crate::error::{ConfigError, Result};
use rust_xlsxwriter::Workbook;
use std::path::Path;

pub const TEMPLATE_FILE_NAME: &str = "accounts_template.xlsx";

const SHEET_NAME: &str = "Accounts";
const COLUMN_WIDTH: f64 = 30.0;
const HEADERS: [&str; 5] = [
    "AccountName",
    "AccessKey",
    "SecretKey",
    "IAM Username",
    "Password",
];
const SAMPLE_ROWS: [[&str; 5]; 2] = [
    [
        "Student-01",
        "YOUR_ACCESS_KEY_HERE_1",
        "YOUR_SECRET_KEY_HERE_1",
        "student-id-01",
        "InitialPassword123!",
    ],
    [
        "Student-02",
        "YOUR_ACCESS_KEY_HERE_2",
        "YOUR_SECRET_KEY_HERE_2",
        "student-id-02",
        "InitialPassword123!",
    ],
];

/// Write the credential template to `path`. An existing file is never replaced.
pub fn write_template(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::TemplateExists(path.to_path_buf()));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, *header)?;
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
    }

    for (row, values) in SAMPLE_ROWS.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
