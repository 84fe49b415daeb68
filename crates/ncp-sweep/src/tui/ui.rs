use super::app::{App, SAFETY_PHRASE, Screen};
use crate::utils::LineTone;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_content(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let step = match app.screen {
        Screen::SelectAccounts => "Select accounts",
        Screen::Confirm => "Confirm",
        Screen::SafetyCheck => "Safety check",
        Screen::Running => "Running",
        Screen::Done => "Done",
    };
    let title = Paragraph::new(format!("ncp-sweep · {}", step))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn draw_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::SelectAccounts => draw_account_selection(frame, area, app),
        Screen::Confirm => draw_confirmation(frame, area, app),
        Screen::SafetyCheck => draw_safety_check(frame, area, app),
        Screen::Running | Screen::Done => draw_log(frame, area, app),
    }
}

fn draw_account_selection(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .accounts
        .iter()
        .zip(&app.selected)
        .map(|(account, selected)| {
            let mark = if *selected { "[x]" } else { "[ ]" };
            let target = account
                .target_sub_username
                .as_deref()
                .map(|login| format!("  → {}", login))
                .unwrap_or_default();
            let style = if *selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {}", mark, account.account_name), style),
                Span::styled(target, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let title = format!(
        "Root accounts ({} of {} selected)",
        app.selected_count(),
        app.accounts.len()
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_confirmation(frame: &mut Frame, area: Rect, app: &App) {
    let (cleanup_label, cleanup_style) = if app.cleanup {
        (
            "ON  - every resource will be deleted first",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        ("OFF - sub-accounts only", Style::default().fg(Color::Green))
    };
    let filter_label = if app.has_filters {
        "filter file loaded"
    } else {
        "none"
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Deactivate the sub-accounts of the selected accounts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Accounts: "),
            Span::styled(
                app.selected_count().to_string(),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::raw("Cleanup:  "),
            Span::styled(cleanup_label, cleanup_style),
        ]),
    ];
    if app.cleanup {
        lines.push(Line::from(vec![
            Span::raw("Filter:   "),
            Span::styled(filter_label, Style::default().fg(Color::Cyan)),
        ]));
    }
    lines.push(Line::from(""));
    for account in app.selected_accounts() {
        lines.push(Line::from(format!("  • {}", account.account_name)));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    frame.render_widget(paragraph, area);
}

fn draw_safety_check(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⚠ This cannot be undone!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Resources of {} account(s) will be deleted for good.",
            app.selected_count()
        )),
        Line::from(format!("Type \"{}\" and press Enter.", SAFETY_PHRASE)),
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(
                app.safety_input.as_str(),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    ];
    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Safety check"));
    frame.render_widget(paragraph, area);
}

fn draw_log(frame: &mut Frame, area: Rect, app: &App) {
    // Borders take two rows
    let height = area.height.saturating_sub(2) as usize;
    let end = app.log.len().saturating_sub(app.scroll);
    let start = end.saturating_sub(height);

    let lines: Vec<Line> = app.log[start..end]
        .iter()
        .map(|line| Line::from(Span::styled(line.as_str(), tone_style(LineTone::of(line)))))
        .collect();

    let title = match (&app.summary, app.cancelling) {
        (Some(summary), _) => summary.summary_line(),
        (None, true) => "Cancelling...".to_string(),
        (None, false) => "Progress".to_string(),
    };
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn tone_style(tone: LineTone) -> Style {
    match tone {
        LineTone::Heading => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        LineTone::Success => Style::default().fg(Color::Green),
        LineTone::Failure => Style::default().fg(Color::Red),
        LineTone::Warning => Style::default().fg(Color::Yellow),
        LineTone::Muted => Style::default().fg(Color::Gray),
        LineTone::Plain => Style::default(),
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.screen {
        Screen::SelectAccounts => match &app.notice {
            Some(notice) => notice.clone(),
            None => "↑/↓: move | Space: select | a: all | Enter: next | q: quit".to_string(),
        },
        Screen::Confirm => "y/Enter: start | c: toggle cleanup | b/Esc: back | q: quit".to_string(),
        Screen::SafetyCheck => "Enter: confirm | Esc: back".to_string(),
        Screen::Running => "↑/↓: scroll | End: follow | Ctrl-C: cancel".to_string(),
        Screen::Done => "↑/↓: scroll | q/Enter: quit".to_string(),
    };

    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
