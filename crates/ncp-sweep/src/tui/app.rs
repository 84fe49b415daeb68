//! Screen state and key handling, independent of rendering

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ncp_sweep_cloud::{BatchSummary, RootAccount};

/// Text the user must type before a cleanup run starts.
pub const SAFETY_PHRASE: &str = "REAL DELETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SelectAccounts,
    Confirm,
    SafetyCheck,
    Running,
    Done,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Start,
    Cancel,
}

pub struct App {
    pub accounts: Vec<RootAccount>,
    pub selected: Vec<bool>,
    pub cursor: usize,
    pub screen: Screen,
    pub cleanup: bool,
    pub has_filters: bool,
    pub safety_input: String,
    pub notice: Option<String>,
    pub log: Vec<String>,
    /// Lines scrolled up from the bottom of the log.
    pub scroll: usize,
    pub cancelling: bool,
    pub summary: Option<BatchSummary>,
}

impl App {
    pub fn new(accounts: Vec<RootAccount>, has_filters: bool) -> Self {
        let selected = vec![false; accounts.len()];
        Self {
            accounts,
            selected,
            cursor: 0,
            screen: Screen::SelectAccounts,
            cleanup: false,
            has_filters,
            safety_input: String::new(),
            notice: None,
            log: Vec::new(),
            scroll: 0,
            cancelling: false,
            summary: None,
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    pub fn selected_accounts(&self) -> Vec<RootAccount> {
        self.accounts
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(account, _)| account.clone())
            .collect()
    }

    pub fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.scroll > 0 {
            // Keep the viewport still while the user reads older lines
            self.scroll += 1;
        }
    }

    pub fn finish(&mut self, summary: BatchSummary) {
        self.summary = Some(summary);
        self.screen = Screen::Done;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c {
            return match self.screen {
                Screen::Running => {
                    self.cancelling = true;
                    Command::Cancel
                }
                _ => Command::Quit,
            };
        }

        match self.screen {
            Screen::SelectAccounts => self.on_select_key(key.code),
            Screen::Confirm => self.on_confirm_key(key.code),
            Screen::SafetyCheck => self.on_safety_key(key.code),
            Screen::Running => {
                self.on_scroll_key(key.code);
                Command::None
            }
            Screen::Done => match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => Command::Quit,
                code => {
                    self.on_scroll_key(code);
                    Command::None
                }
            },
        }
    }

    fn on_select_key(&mut self, code: KeyCode) -> Command {
        self.notice = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Command::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.accounts.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') => {
                if let Some(selected) = self.selected.get_mut(self.cursor) {
                    *selected = !*selected;
                }
            }
            KeyCode::Char('a') => {
                let all = self.selected.iter().all(|s| *s);
                self.selected.iter_mut().for_each(|s| *s = !all);
            }
            KeyCode::Enter => {
                if self.selected_count() == 0 {
                    self.notice = Some("Select at least one account with Space".to_string());
                } else {
                    self.screen = Screen::Confirm;
                }
            }
            _ => {}
        }
        Command::None
    }

    fn on_confirm_key(&mut self, code: KeyCode) -> Command {
        match code {
            KeyCode::Char('q') => Command::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.cleanup = !self.cleanup;
                Command::None
            }
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => {
                self.screen = Screen::SelectAccounts;
                Command::None
            }
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if self.cleanup {
                    self.safety_input.clear();
                    self.notice = None;
                    self.screen = Screen::SafetyCheck;
                    Command::None
                } else {
                    self.start()
                }
            }
            _ => Command::None,
        }
    }

    fn on_safety_key(&mut self, code: KeyCode) -> Command {
        match code {
            KeyCode::Esc => {
                self.notice = None;
                self.screen = Screen::Confirm;
                Command::None
            }
            KeyCode::Enter => {
                if self.safety_input == SAFETY_PHRASE {
                    self.notice = None;
                    self.start()
                } else {
                    self.notice = Some(format!("Type {} exactly to continue", SAFETY_PHRASE));
                    self.safety_input.clear();
                    Command::None
                }
            }
            KeyCode::Backspace => {
                self.safety_input.pop();
                Command::None
            }
            KeyCode::Char(c) => {
                self.safety_input.push(c);
                Command::None
            }
            _ => Command::None,
        }
    }

    fn on_scroll_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.scroll + 1 < self.log.len() {
                    self.scroll += 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::End | KeyCode::Char('G') => self.scroll = 0,
            _ => {}
        }
    }

    fn start(&mut self) -> Command {
        self.screen = Screen::Running;
        self.log.clear();
        self.scroll = 0;
        Command::Start
    }
}
