//! Keyboard input handling for the TUI.
//!
//! This module translates keyboard events into application state changes.
//! Quitting is signalled through `App::quitting`, checked by the main loop.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_email_char, can_add_name_char, can_add_password_char, App, FormFocus,
};
use crate::auth::Mode;
use crate::guard::Route;

/// Handle a keyboard event for the current screen
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match app.route {
        Route::SignIn => handle_auth_input(app, key).await,
        Route::Home => handle_home_input(app, key).await,
        Route::Admin => handle_admin_input(app, key).await,
    }
}

async fn handle_home_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => app.quitting = true,
        KeyCode::Char('a') => {
            if !app.auth.is_signed_in() {
                app.navigate(Route::SignIn);
            }
        }
        KeyCode::Char('d') => {
            // The guard sends signed-out or non-admin users back
            app.navigate(Route::Admin);
        }
        KeyCode::Char('s') => {
            if app.auth.is_signed_in() {
                app.sign_out().await;
            }
        }
        _ => {}
    }
    Ok(())
}

async fn handle_admin_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => app.quitting = true,
        KeyCode::Char('h') | KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Char('s') => app.sign_out().await,
        _ => {}
    }
    Ok(())
}

async fn handle_auth_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Down | KeyCode::Tab => {
            app.form_focus = app.form_focus.next(app.form.mode);
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.form_focus = app.form_focus.prev(app.form.mode);
        }
        KeyCode::Enter => {
            match app.form_focus {
                // Enter on a field advances to the next one
                FormFocus::FullName => app.form_focus = FormFocus::Email,
                FormFocus::Email => app.form_focus = FormFocus::Password,
                FormFocus::Password => app.form_focus = FormFocus::Submit,
                FormFocus::Submit => app.submit_auth_form().await,
                FormFocus::Toggle => toggle_mode(app),
            }
        }
        KeyCode::Backspace => match app.form_focus {
            FormFocus::FullName => {
                app.form.full_name.pop();
            }
            FormFocus::Email => {
                app.form.email.pop();
            }
            FormFocus::Password => {
                app.form.password.pop();
            }
            FormFocus::Submit | FormFocus::Toggle => {}
        },
        KeyCode::Char(c) => match app.form_focus {
            FormFocus::FullName => {
                if can_add_name_char(app.form.full_name.len(), c) {
                    app.form.full_name.push(c);
                }
            }
            FormFocus::Email => {
                if can_add_email_char(app.form.email.len(), c) {
                    app.form.email.push(c);
                }
            }
            FormFocus::Password => {
                if can_add_password_char(app.form.password.len(), c) {
                    app.form.password.push(c);
                }
            }
            FormFocus::Submit | FormFocus::Toggle => {}
        },
        _ => {}
    }
    Ok(())
}

/// Flip sign-in/sign-up and move focus to the first field of the new mode
fn toggle_mode(app: &mut App) {
    if app.form.submitting {
        return;
    }
    app.form.toggle_mode();
    app.form_focus = match app.form.mode {
        Mode::SignUp => FormFocus::FullName,
        Mode::SignIn => FormFocus::Email,
    };
}
