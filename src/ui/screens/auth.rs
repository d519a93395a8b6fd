//! The combined sign-in / sign-up form screen.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, FormFocus};
use crate::auth::Mode;

use super::super::styles;

/// Interior width of the form panel
const PANEL_WIDTH: u16 = 52;

/// Visible width of a text field
const FIELD_WIDTH: usize = 28;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;

    let mut lines = vec![
        Line::from(Span::styled("P R E S S R O O M", styles::title_style())),
        Line::from(Span::styled(form.mode.heading(), styles::muted_style())),
        Line::from(""),
    ];

    if form.mode == Mode::SignUp {
        push_field(
            &mut lines,
            "Name    ",
            &form.full_name,
            false,
            app.form_focus == FormFocus::FullName,
        );
        push_error(&mut lines, &form.errors.full_name);
    }

    push_field(
        &mut lines,
        "Email   ",
        &form.email,
        false,
        app.form_focus == FormFocus::Email,
    );
    push_error(&mut lines, &form.errors.email);

    push_field(
        &mut lines,
        "Password",
        &form.password,
        true,
        app.form_focus == FormFocus::Password,
    );
    push_error(&mut lines, &form.errors.password);

    lines.push(Line::from(""));
    lines.push(submit_line(app));
    lines.push(Line::from(""));
    lines.push(toggle_line(app));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Esc back to site",
        styles::muted_style(),
    )));

    let height = lines.len() as u16 + 2;
    let panel = centered_rect_fixed(PANEL_WIDTH, height, area);

    frame.render_widget(Clear, panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

/// Render a label + bracketed input field, with a cursor when focused
fn push_field(lines: &mut Vec<Line<'_>>, label: &str, value: &str, masked: bool, focused: bool) {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };

    let shown: String = if masked {
        "*".repeat(value.chars().count().min(FIELD_WIDTH))
    } else {
        // Keep the tail visible when the value outgrows the field
        let chars: Vec<char> = value.chars().collect();
        let skip = chars.len().saturating_sub(FIELD_WIDTH);
        chars[skip..].iter().collect()
    };
    let display = format!("{:<width$}", shown, width = FIELD_WIDTH);
    let cursor = if focused { "▌" } else { "" };

    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{}: [", label), styles::muted_style()),
        Span::styled(format!("{}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ]));
}

/// Render the inline validation message for a field, if any
fn push_error(lines: &mut Vec<Line<'_>>, error: &Option<String>) {
    if let Some(message) = error {
        lines.push(Line::from(Span::styled(
            format!("            {}", message),
            styles::error_style(),
        )));
    }
}

fn submit_line(app: &App) -> Line<'static> {
    let focused = app.form_focus == FormFocus::Submit;
    let style = if focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };

    let label = if app.form.submitting {
        "  Please wait...  ".to_string()
    } else if focused {
        format!(" ▶ {} ◀ ", app.form.mode.submit_label())
    } else {
        format!("   {}   ", app.form.mode.submit_label())
    };

    Line::from(vec![
        Span::raw("            ["),
        Span::styled(label, style),
        Span::raw("]"),
    ])
}

fn toggle_line(app: &App) -> Line<'static> {
    let focused = app.form_focus == FormFocus::Toggle;
    let style = if focused {
        styles::selected_style()
    } else {
        styles::muted_style()
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(app.form.mode.toggle_label().to_string(), style),
    ])
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
