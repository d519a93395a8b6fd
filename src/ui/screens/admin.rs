//! The role-gated admin landing screen.
//!
//! Rendering consults the same gate the app loop applies: content is drawn
//! only on `Allow`, so privileged panels cannot flash while state is still
//! resolving or before a redirect lands.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::guard::{self, GuardOutcome};

use super::super::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match guard::admin_gate(&app.auth, &app.role) {
        GuardOutcome::Allow => render_panel(frame, app, area),
        GuardOutcome::Wait | GuardOutcome::Redirect(_) => render_placeholder(frame, area),
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("Loading...", styles::muted_style())),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_panel(frame: &mut Frame, app: &App, area: Rect) {
    let email = app
        .auth
        .identity
        .as_ref()
        .map(|id| id.email.clone())
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Welcome panel
            Constraint::Length(5), // Stat cards
            Constraint::Min(1),    // Hints
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            "Welcome to the admin panel",
            styles::heading_style(),
        )),
        Line::from(Span::styled(
            "You are signed in as an administrator.",
            styles::muted_style(),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(true))
            .title(Span::styled(" Admin ", styles::title_style())),
    );
    frame.render_widget(welcome, chunks[0]);

    render_stat_cards(frame, &email, chunks[1]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("[h] ", styles::hint_key_style()),
        Span::styled("back to site   ", styles::hint_desc_style()),
        Span::styled("[s] ", styles::hint_key_style()),
        Span::styled("sign out   ", styles::hint_desc_style()),
        Span::styled("[q] ", styles::hint_key_style()),
        Span::styled("quit", styles::hint_desc_style()),
    ]));
    frame.render_widget(hints, chunks[2]);
}

fn render_stat_cards(frame: &mut Frame, email: &str, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    stat_card(frame, cards[0], "Status", "Active", styles::success_style());
    stat_card(frame, cards[1], "Role", "Admin", styles::title_style());
    stat_card(frame, cards[2], "Email", email, styles::field_style());
}

fn stat_card(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    value_style: ratatui::style::Style,
) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled(label.to_string(), styles::muted_style())),
        Line::from(Span::styled(value.to_string(), value_style)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(card, area);
}
