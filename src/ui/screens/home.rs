//! The public landing screen.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

use super::super::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("P R E S S R O O M", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Notes, essays, and the occasional launch.",
            styles::heading_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "New writing lands here first - subscribe from the site",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "to get it in your inbox.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(""),
    ];

    if app.auth.loading {
        lines.push(Line::from(Span::styled("...", styles::muted_style())));
    } else if let Some(ref identity) = app.auth.identity {
        lines.push(Line::from(vec![
            Span::styled("Signed in as ", styles::muted_style()),
            Span::styled(identity.display_name().to_string(), styles::heading_style()),
        ]));
        lines.push(Line::from(""));
        lines.push(hint_line(&[("d", "admin panel"), ("s", "sign out"), ("q", "quit")]));
    } else {
        lines.push(hint_line(&[("a", "sign in"), ("q", "quit")]));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("   ", styles::muted_style()));
        }
        spans.push(Span::styled(format!("[{}] ", key), styles::hint_key_style()));
        spans.push(Span::styled((*desc).to_string(), styles::hint_desc_style()));
    }
    Line::from(spans)
}
