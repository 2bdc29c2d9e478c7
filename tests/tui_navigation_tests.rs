use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use polaris::gate::{Credential, SessionGate, SessionState};
use polaris::report::SECTIONS;
use polaris::tui::app::{Action, App, AppMode, LoginField};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

const DELAY: Duration = Duration::from_millis(1500);

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut App, text: &str, now: Instant) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)), now);
    }
}

fn app() -> App {
    App::new(SessionGate::new(Box::new(Credential::default()), DELAY))
}

/// Sign in through the keyboard and wait out the delay.
fn signed_in(start: Instant) -> App {
    let mut app = app();
    app.set_viewport(80, 20);
    type_text(&mut app, "digital-era", start);
    app.handle_key(key(KeyCode::Tab), start);
    type_text(&mut app, "digital_era@sina.com", start);
    app.handle_key(key(KeyCode::Enter), start);
    app.tick(start + DELAY);
    app
}

#[test]
fn test_keyboard_sign_in_flow() {
    let start = Instant::now();
    let mut app = app();

    type_text(&mut app, "digital-era", start);
    assert_eq!(app.identifier(), "digital-era");
    app.handle_key(key(KeyCode::Tab), start);
    assert_eq!(app.focus(), LoginField::Verifier);
    type_text(&mut app, "digital_era@sina.com", start);
    app.handle_key(key(KeyCode::Enter), start);
    assert_eq!(app.session_state(), SessionState::Authenticating);

    // Still on the login screen until the delay elapses
    app.tick(start + DELAY / 2);
    assert_eq!(app.mode(), AppMode::Login);

    app.tick(start + DELAY);
    assert_eq!(app.mode(), AppMode::Report);
    assert_eq!(app.user(), Some("digital-era"));
    assert_eq!(app.active_section(), Some(SECTIONS[0].id));
}

#[test]
fn test_fields_locked_while_verifying() {
    let start = Instant::now();
    let mut app = app();
    type_text(&mut app, "digital-era", start);
    app.handle_key(key(KeyCode::Enter), start);

    type_text(&mut app, "xyz", start);
    app.handle_key(key(KeyCode::Backspace), start);
    assert_eq!(app.identifier(), "digital-era");
}

#[test]
fn test_failed_sign_in_shows_error_and_clears_verifier() {
    let start = Instant::now();
    let mut app = app();
    app.set_identifier("digital-era");
    app.set_verifier_input("DIGITAL_ERA@SINA.COM");
    app.submit(start);
    app.tick(start + DELAY);

    assert_eq!(app.mode(), AppMode::Login);
    assert!(app.login_error().is_some());
    assert_eq!(app.identifier(), "digital-era");
    assert!(app.verifier_input().is_empty());
}

#[test]
fn test_number_keys_jump_to_sections() {
    let start = Instant::now();
    let mut app = signed_in(start);

    for (i, section) in SECTIONS.iter().enumerate().rev() {
        let digit = char::from(b'1' + u8::try_from(i).unwrap());
        app.handle_key(key(KeyCode::Char(digit)), start);
        for _ in 0..1000 {
            app.tick(start + DELAY);
        }
        assert_eq!(app.active_section(), Some(section.id));
    }
}

#[test]
fn test_next_and_previous_section() {
    let start = Instant::now();
    let mut app = signed_in(start);

    assert!(app.handle_action(Action::NextSection));
    while app.view().is_some_and(|v| v.is_animating()) {
        app.tick(start + DELAY);
    }
    assert_eq!(app.active_section(), Some(SECTIONS[1].id));

    assert!(app.handle_action(Action::PreviousSection));
    while app.view().is_some_and(|v| v.is_animating()) {
        app.tick(start + DELAY);
    }
    assert_eq!(app.active_section(), Some(SECTIONS[0].id));

    // Nothing before the first section
    assert!(!app.handle_action(Action::PreviousSection));
}

#[test]
fn test_logout_returns_to_login_and_drops_view() {
    let start = Instant::now();
    let mut app = signed_in(start);
    app.handle_key(key(KeyCode::Char('o')), start);

    assert_eq!(app.mode(), AppMode::Login);
    assert_eq!(app.session_state(), SessionState::Unauthenticated);
    assert!(app.view().is_none());
    assert!(app.active_section().is_none());
    assert!(app.identifier().is_empty());

    // Scroll input after logout has nothing to act on
    app.scroll_rows(50);
    assert!(app.active_section().is_none());
}

#[test]
fn test_logout_during_verification_discards_result() {
    let start = Instant::now();
    let mut app = app();
    app.set_identifier("digital-era");
    app.set_verifier_input("digital_era@sina.com");
    app.submit(start);
    app.logout();

    app.tick(start + DELAY * 2);
    assert_eq!(app.mode(), AppMode::Login);
    assert_eq!(app.session_state(), SessionState::Unauthenticated);
}

#[test]
fn test_help_overlay_and_quit() {
    let start = Instant::now();
    let mut app = signed_in(start);

    app.handle_key(key(KeyCode::Char('?')), start);
    assert_eq!(app.mode(), AppMode::Help);
    app.handle_key(key(KeyCode::Char('j')), start);
    assert_eq!(app.mode(), AppMode::Report);

    app.handle_key(key(KeyCode::Char('q')), start);
    assert!(app.should_quit());
}

#[test]
fn test_render_report_shows_active_tab() {
    let start = Instant::now();
    let mut app = signed_in(start).with_accessibility(true, true);
    app.handle_action(Action::JumpToSection(3));
    while app.view().is_some_and(|v| v.is_animating()) {
        app.tick(start + DELAY);
    }

    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| polaris::tui::render(frame, &app))
        .unwrap();

    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();
    assert!(text.contains("PROJECT POLARIS"));
    assert!(text.contains("*3 Logic"));
}
