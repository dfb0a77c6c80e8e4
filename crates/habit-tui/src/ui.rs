use habit_session::{Message, Sender, Stage, StepStatus};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, INPUT_PLACEHOLDER};

const ACCENT: Color = Color::Magenta;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Side nav + chat
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    draw_header(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(30)])
        .split(chunks[1]);

    draw_side_nav(f, app, body[0]);
    draw_chat(f, app, body[1]);
    draw_input(f, app, chunks[2]);
    draw_status_bar(f, chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let stage = app.snapshot.stage;
    let header_text = Line::from(vec![
        Span::styled(" ∞ ", Style::default().fg(ACCENT)),
        Span::styled(
            "Consistency30",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::White),
        ),
        Span::styled("  |  ", Style::default().fg(Color::Gray)),
        Span::styled("Goal Setting Chat", Style::default().fg(Color::Cyan)),
        Span::styled("  |  ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("Step {}/{}", stage.number(), Stage::COUNT),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        if app.snapshot.awaiting_reply {
            Span::styled("  ◐ Coach is typing...", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        },
    ]);

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Left);

    f.render_widget(header, area);
}

fn draw_side_nav(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Steps
            Constraint::Length(3), // Progress
            Constraint::Length(4), // Current goal
        ])
        .split(area);

    let current = app.snapshot.stage;
    let mut lines = Vec::new();
    for stage in Stage::ALL {
        let status = stage.status_relative_to(current);
        let (marker, style) = match status {
            StepStatus::Completed => ("✓", Style::default().fg(Color::Green)),
            StepStatus::Active => (
                "●",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            StepStatus::Upcoming => ("○", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("F{} ", stage.number()), Style::default().fg(Color::DarkGray)),
            Span::styled(stage.label(), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {}", stage.description()),
            Style::default().fg(Color::Gray),
        )));
    }

    let steps = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Setup Progress")
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(steps, chunks[0]);

    let percent = current.progress_percent();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(ACCENT).bg(Color::Black))
        .percent(u16::from(percent))
        .label(format!("{}%", percent));
    f.render_widget(gauge, chunks[1]);

    let goal = Paragraph::new(current.goal_preview())
        .block(Block::default().borders(Borders::ALL).title("Current Goal"))
        .wrap(Wrap { trim: true });
    f.render_widget(goal, chunks[2]);
}

fn draw_chat(f: &mut Frame, app: &mut App, area: Rect) {
    let chip_height = if app.chips_visible() { 5 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),           // Welcome card
            Constraint::Min(5),              // Messages
            Constraint::Length(chip_height), // Quick chips
        ])
        .split(area);

    draw_welcome(f, chunks[0]);
    draw_messages(f, app, chunks[1]);
    if app.chips_visible() {
        draw_chips(f, app, chunks[2]);
    }
}

fn draw_welcome(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "🚀 Welcome to Goal Setting!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your AI coach will guide you through creating a personalized habit plan.  ⏱ 2-3 minutes",
            Style::default().fg(Color::Gray),
        )),
    ];
    let card = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();

    for msg in &app.snapshot.transcript {
        lines.extend(format_message(msg, inner_width));
        lines.push(Line::raw(""));
    }

    if app.snapshot.awaiting_reply {
        let dots = ".".repeat((app.ticks % 4) as usize);
        lines.push(Line::from(vec![
            Span::styled("🤖 AI Assistant ", Style::default().fg(Color::Green)),
            Span::styled(format!("is typing{}", dots), Style::default().fg(Color::Yellow)),
        ]));
    }

    // Keep the newest lines in view unless the user scrolled up
    let visible_height = area.height.saturating_sub(2) as usize;
    let bottom = lines.len().saturating_sub(visible_height);
    app.set_max_scroll(bottom);
    let top = bottom - app.scroll_offset;

    let title = format!("Messages ({})", app.snapshot.transcript.len());
    let messages = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .scroll((top.min(u16::MAX as usize) as u16, 0));

    f.render_widget(messages, area);
}

fn format_message(msg: &Message, width: usize) -> Vec<Line<'static>> {
    let (name, style) = match msg.sender() {
        Sender::User => ("👤 You", Style::default().fg(Color::Cyan)),
        Sender::Assistant => ("🤖 AI Assistant", Style::default().fg(Color::Green)),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(name, style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", msg.timestamp()),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    for row in wrap_text(msg.text(), width.saturating_sub(3).max(10)) {
        lines.push(Line::from(Span::styled(format!("   {}", row), Style::default())));
    }
    lines
}

fn draw_chips(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (idx, chip) in app.session.suggestions().iter().enumerate() {
        let style = if idx == app.chip_cursor {
            Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", chip), style));
        spans.push(Span::raw(" "));
    }

    let chips = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Try one of these common goals (Tab to move, Ctrl+P to pick)"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(chips, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.input.is_empty() {
        (INPUT_PLACEHOLDER.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (app.input.clone(), Style::default().fg(Color::White))
    };

    let (title, border) = if app.input_enabled() {
        ("Message (Enter to send)", Color::Blue)
    } else {
        ("Message (waiting for your coach...)", Color::DarkGray)
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(input, area);

    if app.input_enabled() {
        let cursor_x = area.x + 1 + app.input.width() as u16;
        f.set_cursor(cursor_x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

fn draw_status_bar(f: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" send  "),
        Span::styled("Tab/Shift-Tab", Style::default().fg(Color::Cyan)),
        Span::raw(" chips  "),
        Span::styled("Ctrl+P", Style::default().fg(Color::Cyan)),
        Span::raw(" pick  "),
        Span::styled("F1-F4", Style::default().fg(Color::Cyan)),
        Span::raw(" step  "),
        Span::styled("↑↓ PgUp PgDn", Style::default().fg(Color::Cyan)),
        Span::raw(" scroll  "),
        Span::styled("Esc/Ctrl+C", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(help).style(Style::default().fg(Color::Gray)), area);
}

/// Greedy word wrap by display width; words longer than `width` get a row
/// of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for paragraph in text.lines() {
        let mut row = String::new();
        for word in paragraph.split_whitespace() {
            if !row.is_empty() && row.width() + 1 + word.width() > width {
                rows.push(std::mem::take(&mut row));
            }
            if !row.is_empty() {
                row.push(' ');
            }
            row.push_str(word);
        }
        rows.push(row);
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let rows = wrap_text("Consistency is key! Would you like to start", 16);
        assert_eq!(rows, vec!["Consistency is", "key! Would you", "like to start"]);
        assert!(rows.iter().all(|r| r.width() <= 16));
    }

    #[test]
    fn test_wrap_long_word() {
        let rows = wrap_text("a extraordinarily b", 5);
        assert_eq!(rows, vec!["a", "extraordinarily", "b"]);
    }

    #[tokio::test]
    async fn test_scroll_clamped_to_transcript() {
        use habit_session::GoalSessionSimulator;
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = App::new(GoalSessionSimulator::builder().seed(8).build());
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        for _ in 0..50 {
            app.scroll_page_up();
        }
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let top = app.scroll_offset;
        assert!(top < 50);

        // one press down moves the view as soon as it is at the top
        app.scroll_page_up();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        assert_eq!(app.scroll_offset, top);
        if top > 0 {
            app.scroll_down();
            assert_eq!(app.scroll_offset, top - 1);
        }
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
