use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use indicatif::{ProgressBar, ProgressStyle};
use ncp_sweep_cloud::{BatchSummary, RootAccount};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TUI_LOG_FILE: &str = "ncp-sweep-tui.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Structured logs to stderr so they never mix with progress output on stdout.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter())
        .init();
}

/// Logs to a file in the temp directory while the TUI holds the screen.
pub fn init_file_logging() {
    use std::fs::OpenOptions;

    let path = std::env::temp_dir().join(TUI_LOG_FILE);
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter(env_filter())
            .with_ansi(false)
            .init();
    }
}

/// Read the credential spreadsheet and narrow it to `--account` if given.
pub fn load_accounts(file: &Path, account: Option<&str>) -> anyhow::Result<Vec<RootAccount>> {
    let accounts = ncp_sweep_config::read_accounts(file)?;
    let accounts = ncp_sweep_config::select_accounts(accounts, account)?;
    tracing::debug!(count = accounts.len(), file = %file.display(), "Loaded root accounts");
    Ok(accounts)
}

/// Ask a y/N question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} (y/N): ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prompt for a password without echoing it.
///
/// Falls back to a plain line read when stdin is not a terminal.
pub fn prompt_password(prompt: &str) -> anyhow::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim().to_string());
    }

    terminal::enable_raw_mode()?;
    let result = read_hidden_line();
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn read_hidden_line() -> anyhow::Result<String> {
    let mut input = String::new();
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Enter => return Ok(input),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    anyhow::bail!("Password entry cancelled");
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
        }
    }
}

/// Spinner shown while waiting on the API.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { progress_bar: pb }
    }

    /// Remove the spinner line so the next output starts clean.
    pub fn clear(&self) {
        self.progress_bar.finish_and_clear();
    }
}

/// How a progress line should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTone {
    Heading,
    Success,
    Failure,
    Warning,
    Muted,
    Plain,
}

impl LineTone {
    pub fn of(line: &str) -> Self {
        let trimmed = line.trim_start();
        match trimmed.chars().next() {
            Some('━') | Some('▶') => LineTone::Heading,
            Some('✓') => LineTone::Success,
            Some('✗') => LineTone::Failure,
            Some('!') | Some('■') => LineTone::Warning,
            Some('·') | Some('…') | Some('-') => LineTone::Muted,
            _ if trimmed.starts_with("Done.") => LineTone::Heading,
            _ => LineTone::Plain,
        }
    }
}

/// Print one progress line from the batch runner.
pub fn print_progress_line(line: &str) {
    let styled = match LineTone::of(line) {
        LineTone::Heading => line.cyan().bold(),
        LineTone::Success => line.green(),
        LineTone::Failure => line.red(),
        LineTone::Warning => line.yellow(),
        LineTone::Muted => line.dimmed(),
        LineTone::Plain => line.normal(),
    };
    println!("{}", styled);
}

/// Final per-account table and totals.
pub fn print_summary(summary: &BatchSummary) {
    println!();
    println!(
        "{}",
        format!(
            "{:<24} {:>10} {:>10} {:>10} {:>10}",
            "ACCOUNT", "DELETED", "FAILED", "SUB OK", "SUB FAIL"
        )
        .bold()
    );
    println!("{}", "─".repeat(68).dimmed());

    for outcome in &summary.accounts {
        let (deleted, failed) = outcome
            .teardown
            .map(|t| (t.succeeded.to_string(), t.failed.to_string()))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        let row = format!(
            "{:<24} {:>10} {:>10} {:>10} {:>10}",
            outcome.account_name,
            deleted,
            failed,
            outcome.sub_accounts.succeeded,
            outcome.sub_accounts.failed
        );
        match &outcome.skipped {
            Some(reason) => println!(
                "{}  {}",
                row.yellow(),
                format!("skipped: {}", reason).dimmed()
            ),
            None => println!("{}", row),
        }
    }

    println!();
    let line = summary.summary_line();
    if summary.cancelled {
        println!("{}", line.yellow().bold());
    } else {
        println!("{}", line.green().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_tone() {
        assert_eq!(LineTone::of("━━ lab-01 ━━"), LineTone::Heading);
        assert_eq!(LineTone::of("▶ Servers: 2"), LineTone::Heading);
        assert_eq!(LineTone::of("■ cancelled, remaining phases skipped"), LineTone::Warning);
        assert_eq!(LineTone::of("  ✓ deactivated student01"), LineTone::Success);
        assert_eq!(LineTone::of("  ✗ deactivate student01 failed: HTTP 500"), LineTone::Failure);
        assert_eq!(LineTone::of("  ! could not list servers"), LineTone::Warning);
        assert_eq!(LineTone::of("  · would delete vpc"), LineTone::Muted);
        assert_eq!(LineTone::of("  … waiting 30s for servers to stop"), LineTone::Muted);
        assert_eq!(LineTone::of("Done. 1 account(s)"), LineTone::Heading);
        assert_eq!(LineTone::of("  found: nothing"), LineTone::Plain);
        assert_eq!(LineTone::of(""), LineTone::Plain);
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_load_accounts_from_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("accounts.xlsx");
        ncp_sweep_config::write_template(&path).unwrap();

        let all = load_accounts(&path, None).unwrap();
        assert_eq!(all.len(), 2);

        let one = load_accounts(&path, Some("Student-02")).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].account_name, "Student-02");

        assert!(load_accounts(&path, Some("nobody")).is_err());
    }
}
