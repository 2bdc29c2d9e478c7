//! Layout and rendering with ratatui.
//!
//! # Overview
//!
//! - Sign-in panel with the classification banner, the two fields, a
//!   verifying indicator and the inline error
//! - Report screen: header (project, user, badge), section tabs that follow
//!   the scroll spy, the scrolled report text with the latency chart, footer
//! - Help overlay listing the active keybindings
//!
//! Rendering is a pure function of [`App`]. The report text is pre-wrapped
//! by [`ReportLayout`](crate::report::ReportLayout), so only the visible
//! slice of lines is turned into widgets.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Tabs,
        Wrap,
    },
    Frame,
};

use super::app::{Action, App, AppMode, LoginField};
use super::keybindings::KeyBindings;
use super::theme::Theme;
use super::view::ReportView;
use crate::gate::SessionState;
use crate::report::{BarSpec, DocLine, LineKind};

/// Box-drawing replacement for screen readers.
const ASCII_BORDER_SET: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

const HEADER_ROWS: u16 = 3;
const TABS_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 1;

fn get_border_set(ascii: bool) -> border::Set {
    if ascii {
        ASCII_BORDER_SET
    } else {
        border::ROUNDED
    }
}

fn create_block<'a>(app: &App, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(get_border_set(app.ascii_borders()))
        .border_style(Style::default().fg(app.theme().accent))
        .title(title)
}

/// Draw the whole screen.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match (app.mode(), app.view()) {
        (AppMode::Report, Some(view)) => render_report(frame, app, view, area),
        (AppMode::Help, Some(view)) => {
            render_report(frame, app, view, area);
            render_help_dialog(frame, app, area);
        }
        _ => render_login(frame, app, area),
    }
}

/// Vertical split of the report screen: header, tabs, body, footer.
fn report_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Length(TABS_ROWS),
            Constraint::Min(3),
            Constraint::Length(FOOTER_ROWS),
        ])
        .split(area)
}

/// Width and height of the report text for a terminal of `area`.
///
/// Matches what [`render`] draws: the body block minus its borders and one
/// column for the scrollbar.
#[must_use]
pub fn report_viewport(area: Rect) -> (u16, u16) {
    let body = report_chunks(area)[2];
    (
        body.width.saturating_sub(3).max(1),
        body.height.saturating_sub(2).max(1),
    )
}

// ==================== Sign-in ====================

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let panel = centered_box(56, 17, area);
    frame.render_widget(Clear, panel);

    let pending = app.session_state() == SessionState::Authenticating;
    let mask = if app.is_accessible() { '*' } else { '•' };
    let masked: String = app.verifier_input().chars().map(|_| mask).collect();

    let mut lines = vec![
        Line::from(Span::styled(
            " TOP SECRET ",
            Style::default()
                .fg(theme.inverted_fg)
                .bg(theme.danger)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            app.report().meta.project,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            "Core architecture access. Identify yourself.",
            Style::default().fg(theme.muted),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        field_line(app, LoginField::Identifier, "Identifier", app.identifier()),
        Line::from(""),
        field_line(app, LoginField::Verifier, "Verifier  ", &masked),
        Line::from(""),
    ];

    if pending {
        lines.push(
            Line::from(Span::styled(
                "Verifying credentials...",
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        );
    } else if let Some(error) = app.login_error() {
        let marker = if app.is_accessible() { "ERROR: " } else { "" };
        lines.push(
            Line::from(Span::styled(
                format!("{marker}{error}"),
                Style::default().fg(theme.danger),
            ))
            .alignment(Alignment::Center),
        );
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "Enter: sign in  Tab: switch field  Esc: quit",
            Style::default().fg(theme.muted),
        ))
        .alignment(Alignment::Center),
    );

    let panel_widget = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(create_block(app, " Sign in "));
    frame.render_widget(panel_widget, panel);
}

fn field_line<'a>(app: &App, field: LoginField, label: &'a str, value: &str) -> Line<'a> {
    let theme = app.theme();
    let focused = app.focus() == field;
    let (marker, style) = if focused {
        (
            "> ",
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(theme.text))
    };
    let caret = if focused && app.session_state() != SessionState::Authenticating {
        "_"
    } else {
        ""
    };
    Line::from(vec![
        Span::styled(marker, style),
        Span::styled(format!("{label}: "), Style::default().fg(theme.muted)),
        Span::styled(format!("{}{caret}", truncate_string(value, 32)), style),
    ])
}

// ==================== Report ====================

fn render_report(frame: &mut Frame, app: &App, view: &ReportView, area: Rect) {
    let chunks = report_chunks(area);
    render_header(frame, app, view, chunks[0]);
    render_tabs(frame, app, view, chunks[1]);
    render_body(frame, app, view, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, view: &ReportView, area: Rect) {
    let theme = app.theme();
    let meta = &view.report().meta;
    let user = app.user().unwrap_or("-");

    let line = Line::from(vec![
        Span::styled(
            format!("{} {}", meta.project, meta.version),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  |  user: ", Style::default().fg(theme.muted)),
        Span::styled(user.to_string(), Style::default().fg(theme.text)),
        Span::raw("  "),
        Span::styled(
            " TOP SECRET ",
            Style::default()
                .fg(theme.inverted_fg)
                .bg(theme.danger)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let header = Paragraph::new(line).block(create_block(app, ""));
    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, app: &App, view: &ReportView, area: Rect) {
    let theme = app.theme();
    let active = view.active_index();
    let titles: Vec<Line> = view
        .report()
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let marker = if app.is_accessible() && i == active {
                "*"
            } else {
                ""
            };
            Line::from(format!("{marker}{} {}", i + 1, section.label))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(active)
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.inverted_fg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|")
        .block(create_block(app, " Sections "));
    frame.render_widget(tabs, area);
}

fn render_body(frame: &mut Frame, app: &App, view: &ReportView, area: Rect) {
    let theme = app.theme();
    let rows = usize::from(area.height.saturating_sub(2));
    let ascii = app.ascii_borders();

    let lines: Vec<Line> = view
        .layout()
        .lines()
        .iter()
        .skip(view.scroll())
        .take(rows)
        .map(|line| doc_line(line, &theme, ascii))
        .collect();

    let body = Paragraph::new(Text::from(lines)).block(create_block(app, ""));
    frame.render_widget(body, area);

    let mut state = ScrollbarState::new(view.max_scroll().max(1)).position(view.scroll());
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(ratatui::layout::Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut state,
    );
}

fn doc_line<'a>(line: &'a DocLine, theme: &Theme, ascii: bool) -> Line<'a> {
    let style = match &line.kind {
        LineKind::Title => Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        LineKind::Meta => Style::default().fg(theme.danger),
        LineKind::Heading => Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Subheading => Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD),
        LineKind::Body => Style::default().fg(theme.text),
        LineKind::Muted => Style::default().fg(theme.muted),
        LineKind::Accent => Style::default().fg(theme.success),
        LineKind::Rule => Style::default().fg(theme.muted),
        LineKind::Blank => Style::default(),
        LineKind::Bar(bar) => return bar_line(bar, theme, ascii),
    };
    Line::from(Span::styled(line.text.as_str(), style))
}

/// One chart bar: label, colored fill, threshold marker, caption.
fn bar_line<'a>(bar: &BarSpec, theme: &Theme, ascii: bool) -> Line<'a> {
    if ascii {
        return Line::from(Span::styled(bar.to_plain(), Style::default().fg(theme.text)));
    }

    let fill = theme.chart_color(bar.color);
    let filled = bar.value.min(bar.axis_max) as usize;
    let mut rest = String::new();
    for col in bar.value..bar.axis_max {
        rest.push(if col == bar.threshold { '│' } else { '·' });
    }

    Line::from(vec![
        Span::styled(format!("{:<6}", bar.label), Style::default().fg(theme.text)),
        Span::styled("█".repeat(filled), Style::default().fg(fill)),
        Span::styled(rest, Style::default().fg(theme.muted)),
        Span::styled(
            format!(" {}ms", bar.value),
            Style::default().fg(theme.highlight),
        ),
        Span::styled(format!("  {}", bar.caption), Style::default().fg(theme.muted)),
    ])
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let bindings = app.keybindings();
    let mut spans = Vec::new();
    for (action, label) in [
        (Action::ScrollDown, "scroll"),
        (Action::NextSection, "next"),
        (Action::PreviousSection, "prev"),
        (Action::ShowHelp, "help"),
        (Action::Logout, "sign out"),
        (Action::Quit, "quit"),
    ] {
        let key = bindings.key_hint(&action);
        if key.is_empty() {
            continue;
        }
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(theme.inverted_fg).bg(theme.accent),
        ));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(theme.muted),
        ));
    }
    spans.push(Span::styled(
        "1-5 jump",
        Style::default().fg(theme.muted),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ==================== Help ====================

/// Actions listed in the help overlay, in display order.
const HELP_ACTIONS: &[Action] = &[
    Action::ScrollDown,
    Action::ScrollUp,
    Action::PageDown,
    Action::PageUp,
    Action::GoToTop,
    Action::GoToBottom,
    Action::NextSection,
    Action::PreviousSection,
    Action::JumpToSection(1),
    Action::JumpToSection(5),
    Action::ToggleTheme,
    Action::ShowHelp,
    Action::Logout,
    Action::Quit,
];

fn render_help_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let dialog = centered_rect(70, 80, area);
    frame.render_widget(Clear, dialog);

    let bindings = app.keybindings();
    let mut lines = vec![
        Line::from(Span::styled(
            "Keybinding Reference",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Profile: ", Style::default().fg(theme.muted)),
            Span::styled(
                bindings.profile().display_name(),
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];
    lines.extend(help_lines(bindings, &theme));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    let help = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(create_block(app, " Help "));
    frame.render_widget(help, dialog);
}

fn help_lines(bindings: &KeyBindings, theme: &Theme) -> Vec<Line<'static>> {
    HELP_ACTIONS
        .iter()
        .map(|action| {
            let keys: Vec<String> = bindings
                .keys_for_action(action)
                .iter()
                .map(KeyBindings::format_key)
                .collect();
            let keys = if keys.is_empty() {
                "-".to_string()
            } else {
                keys.join(", ")
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<22}", truncate_string(&keys, 22)),
                    Style::default().fg(theme.highlight),
                ),
                Span::styled(action.description(), Style::default().fg(theme.text)),
            ])
        })
        .collect()
}

// ==================== Helpers ====================

/// Truncate to at most `max_len` characters, ending in "..." when cut.
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `width` x `height` box centered in `area`, shrunk to fit.
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
