use std::io;
use chrono::Local;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    prelude::{Span, Text},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::models::post::{Post, PostKind, Sentiment};
use crate::views::screen::Screen;
use crate::views::widgets::Selection;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub const KEY_HELP: &str =
    "j/k move  enter open  a author  l like  f follow  n new  c reply  b repost  o quote  r refresh  v timeline  s mood  esc back  q quit";

pub fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

pub fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()
}

/// Hands the terminal to `f` (an external editor) and takes it back after.
pub fn suspend<T>(terminal: &mut Tui, f: impl FnOnce() -> T) -> io::Result<T> {
    restore_terminal(terminal)?;
    let out = f();
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture)?;
    terminal.clear()?;
    Ok(out)
}

fn sentiment_marker(sentiment: Option<Sentiment>) -> Span<'static> {
    match sentiment {
        Some(Sentiment::Positive) => Span::styled("+", Style::default().fg(Color::Green)),
        Some(Sentiment::Negative) => Span::styled("-", Style::default().fg(Color::Magenta)),
        Some(Sentiment::Neutral) => Span::styled("~", Style::default().fg(Color::DarkGray)),
        _ => Span::raw(" "),
    }
}

fn post_lines(post: &Post) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    if post.kind == PostKind::Repost {
        lines.push(Line::from(Span::styled(
            format!("⟲ {} reposted", post.author.display_name),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let when = post.created_at.with_timezone(&Local).format("%H:%M %h-%d-%Y");
    let mut header = vec![
        sentiment_marker(post.sentiment),
        Span::raw(" "),
        Span::styled(
            post.author.display_name.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" @{} · {}", post.author.handle, when)),
    ];
    if post.kind == PostKind::Reply {
        header.push(Span::styled(" · reply", Style::default().fg(Color::DarkGray)));
    }
    lines.push(Line::from(header));

    if let Some(text) = post.text.as_deref().filter(|t| !t.is_empty()) {
        lines.extend(Text::raw(text).lines);
    }

    if let Some(original) = post.original.as_deref() {
        let quoted = Style::default().fg(Color::Gray);
        lines.push(Line::from(Span::styled(
            format!("  │ {} @{}", original.author.display_name, original.author.handle),
            quoted.add_modifier(Modifier::BOLD),
        )));
        for line in original.body().lines() {
            lines.push(Line::from(Span::styled(format!("  │ {}", line), quoted)));
        }
    }

    let heart = if post.is_liked { "♥" } else { "♡" };
    lines.push(Line::from(Span::styled(
        format!("{} {}", heart, post.likes_count),
        Style::default().fg(if post.is_liked { Color::Red } else { Color::DarkGray }),
    )));
    lines.push(Line::from(""));
    lines
}

pub fn render_screen<B: Backend>(
    f: &mut Frame<B>,
    screen: &Screen,
    selection: &mut Selection,
    status: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.size());

    let block = Block::default().title(screen.title()).borders(Borders::ALL);

    match screen {
        Screen::NotFound(message) => {
            let body = Paragraph::new(message.as_str())
                .block(block)
                .wrap(Wrap { trim: true });
            f.render_widget(body, chunks[0]);
        }
        _ => {
            let posts = screen.posts();
            let items: Vec<ListItem> = if posts.is_empty() {
                vec![ListItem::new("No posts yet.")]
            } else {
                posts.iter().map(|post| ListItem::new(post_lines(post))).collect()
            };
            selection.clamp(posts.len());

            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(Color::Gray)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_stateful_widget(list, chunks[0], &mut selection.state);
        }
    }

    let footer = Paragraph::new(Line::from(Span::styled(status, Style::default().fg(Color::Yellow))));
    f.render_widget(footer, chunks[1]);
}
