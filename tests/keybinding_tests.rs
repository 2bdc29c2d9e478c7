use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use polaris::tui::app::Action;
use polaris::tui::keybindings::{KeyBindings, KeybindingError, KeybindingProfile};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

#[test]
fn test_every_profile_can_quit_and_navigate_sections() {
    for profile in KeybindingProfile::all() {
        let bindings = KeyBindings::from_profile(*profile);
        for action in [
            Action::Quit,
            Action::Logout,
            Action::NextSection,
            Action::PreviousSection,
            Action::ScrollDown,
            Action::ScrollUp,
            Action::ShowHelp,
        ] {
            assert!(
                !bindings.keys_for_action(&action).is_empty(),
                "{profile} has no key for {action:?}"
            );
        }
        for n in 1..=5u8 {
            let digit = char::from(b'0' + n);
            assert_eq!(
                bindings.resolve(&press(KeyCode::Char(digit))),
                Some(Action::JumpToSection(n))
            );
        }
    }
}

#[test]
fn test_universal_accepts_vim_and_arrows() {
    let bindings = KeyBindings::from_profile(KeybindingProfile::Universal);
    assert_eq!(bindings.resolve(&press(KeyCode::Char('j'))), Some(Action::ScrollDown));
    assert_eq!(bindings.resolve(&press(KeyCode::Down)), Some(Action::ScrollDown));
    assert_eq!(bindings.resolve(&press(KeyCode::Tab)), Some(Action::NextSection));
    assert_eq!(
        bindings.resolve(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
        Some(Action::PreviousSection)
    );
}

#[test]
fn test_vim_profile_has_no_arrows() {
    let bindings = KeyBindings::from_profile(KeybindingProfile::Vim);
    assert_eq!(bindings.resolve(&press(KeyCode::Down)), None);
    assert_eq!(bindings.resolve(&ctrl('d')), Some(Action::PageDown));
}

#[test]
fn test_standard_profile_has_no_letters_for_scrolling() {
    let bindings = KeyBindings::from_profile(KeybindingProfile::Standard);
    assert_eq!(bindings.resolve(&press(KeyCode::Char('j'))), None);
    assert_eq!(bindings.resolve(&ctrl('q')), Some(Action::Quit));
}

#[test]
fn test_release_events_do_not_resolve() {
    let bindings = KeyBindings::default();
    let mut key = press(KeyCode::Char('q'));
    key.kind = KeyEventKind::Release;
    assert_eq!(bindings.resolve(&key), None);
}

#[test]
fn test_custom_binding_steals_key() {
    let mut custom = HashMap::new();
    custom.insert("logout".to_string(), vec!["q".to_string()]);
    let bindings =
        KeyBindings::from_profile_with_custom(KeybindingProfile::Universal, &custom).unwrap();

    assert_eq!(bindings.resolve(&press(KeyCode::Char('q'))), Some(Action::Logout));
    // Ctrl+c still quits
    assert_eq!(bindings.resolve(&ctrl('c')), Some(Action::Quit));
}

#[test]
fn test_custom_binding_action_name_forms() {
    for name in ["next_section", "next-section", "Next Section"] {
        let mut custom = HashMap::new();
        custom.insert(name.to_string(), vec!["Enter".to_string()]);
        let bindings =
            KeyBindings::from_profile_with_custom(KeybindingProfile::Standard, &custom).unwrap();
        assert_eq!(
            bindings.resolve(&press(KeyCode::Enter)),
            Some(Action::NextSection),
            "{name}"
        );
    }
}

#[test]
fn test_unknown_action_suggests_close_name() {
    let mut custom = HashMap::new();
    custom.insert("logut".to_string(), vec!["x".to_string()]);
    let err = KeyBindings::from_profile_with_custom(KeybindingProfile::Universal, &custom)
        .unwrap_err();

    match &err {
        KeybindingError::InvalidAction { name, suggestion } => {
            assert_eq!(name, "logut");
            assert_eq!(*suggestion, Some("logout"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Did you mean 'logout'?"));
}

#[test]
fn test_invalid_key_spec_rejected() {
    let mut custom = HashMap::new();
    custom.insert("quit".to_string(), vec!["Hyper+Banana".to_string()]);
    let err = KeyBindings::from_profile_with_custom(KeybindingProfile::Universal, &custom)
        .unwrap_err();
    assert!(matches!(err, KeybindingError::InvalidKeySpec(_)));
}

#[test]
fn test_key_specs_round_trip_through_format() {
    for spec in ["j", "Ctrl+d", "PgDn", "F1", "Space", "Shift+Tab", "Esc"] {
        let key = KeyBindings::parse_key(spec).unwrap();
        let formatted = KeyBindings::format_key(&key);
        assert_eq!(KeyBindings::parse_key(&formatted).unwrap(), key, "{spec}");
    }
}

#[test]
fn test_profile_parse_and_display() {
    assert_eq!("vim".parse::<KeybindingProfile>().unwrap(), KeybindingProfile::Vim);
    assert_eq!("arrows".parse::<KeybindingProfile>().unwrap(), KeybindingProfile::Standard);
    assert!("emacs".parse::<KeybindingProfile>().is_err());
    assert_eq!(KeybindingProfile::Universal.to_string(), "universal");
}
