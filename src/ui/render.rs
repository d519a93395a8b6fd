use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, NoticeKind};
use crate::guard::Route;

use super::screens::{admin, auth, home};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Home => home::render(frame, app, area),
        Route::SignIn => auth::render(frame, app, area),
        Route::Admin => admin::render(frame, app, area),
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  Pressroom / {}", app.route.title());
    let session = session_label(app);

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + session.len() as u16 + 2) as usize,
        )),
        Span::styled(session, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

/// The header's session region: ellipsis while resolving, the signed-in
/// email with a sign-out hint, or a sign-in hint.
fn session_label(app: &App) -> String {
    if app.auth.loading {
        "...".to_string()
    } else if let Some(ref identity) = app.auth.identity {
        format!("{}  [s] sign out", identity.email)
    } else {
        "[a] sign in".to_string()
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref notice) = app.notice {
        let style = match notice.kind {
            NoticeKind::Success => styles::success_style(),
            NoticeKind::Error => styles::error_style(),
        };
        Line::from(vec![
            Span::styled(format!(" {}: ", notice.title), style),
            Span::raw(notice.body.clone()),
        ])
    } else {
        let hint = match app.route {
            Route::SignIn => " Tab moves focus, Enter submits",
            Route::Home | Route::Admin => "",
        };
        Line::from(Span::styled(hint, styles::muted_style()))
    };

    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}
