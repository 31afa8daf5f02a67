use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use wordo::stats::{StatsAggregate, TopWord};

use crate::App;

/// Narrowest the word column gets, so the header fits
const MIN_WORD_WIDTH: u16 = 6;

/// Pure presenter for one high score row
pub fn present_row(rank: usize, top: &TopWord) -> Row<'static> {
    let score_color = if top.score >= 30 {
        Color::Green
    } else if top.score >= 10 {
        Color::Yellow
    } else {
        Color::Gray
    };

    Row::new(vec![
        Cell::from(format!("{rank:>2}.")),
        Cell::from(top.word.to_uppercase()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(top.score.to_string()).style(Style::default().fg(score_color)),
        Cell::from(top.date.to_string()),
    ])
}

/// Width needed by the longest word in the table
pub fn word_column_width(stats: &StatsAggregate) -> u16 {
    stats
        .top_words
        .iter()
        .map(|t| t.word.width() as u16)
        .max()
        .unwrap_or(0)
        .max(MIN_WORD_WIDTH)
}

fn summary_lines(stats: &StatsAggregate) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Cyan);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let pair = |name: &str, v: String| {
        Line::from(vec![
            Span::styled(format!("{name:<20}"), label),
            Span::styled(v, value),
        ])
    };

    let mut lines = vec![
        pair("Total Games Played", stats.games_played.to_string()),
        pair("Lifetime Points", stats.lifetime_points.to_string()),
        pair("Longest Streak", format!("{} days", stats.current_streak)),
        pair("Total Attempts", stats.total_attempts.to_string()),
    ];
    if let Some(best) = stats.best_day {
        lines.push(pair("Best Day", format!("{} ({} points)", best.date, best.points)));
    }
    if let Some(last) = stats.last_played {
        lines.push(pair("Last Played", last.to_string()));
    }
    lines
}

/// Render the lifetime stats screen
pub fn render_stats(app: &App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(8), // summary
            Constraint::Min(0),    // high scores
            Constraint::Length(2), // instructions
        ])
        .split(area);

    let Some(ref stats) = app.stats else {
        let no_data = Paragraph::new("No stats loaded.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[0]);
        return;
    };

    let summary = Paragraph::new(summary_lines(stats)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Stats")
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(summary, chunks[0]);

    if stats.top_words.is_empty() {
        let no_data = Paragraph::new("No words yet. Play a day to fill the high score table.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        // borders + header
        let table_height = chunks[1].height.saturating_sub(3) as usize;
        let max_scroll = stats.top_words.len().saturating_sub(table_height);
        let offset = app.stats_scroll.min(max_scroll);

        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from("Word"),
            Cell::from("Points"),
            Cell::from("Date"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = stats
            .top_words
            .iter()
            .enumerate()
            .skip(offset)
            .take(table_height)
            .map(|(i, top)| present_row(i + 1, top))
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(word_column_width(stats)),
            Constraint::Length(8),
            Constraint::Min(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("High Scores"))
            .column_spacing(2);
        f.render_widget(table, chunks[1]);
    }

    let instructions = Paragraph::new("(↑/↓) scroll  (tab) back  (esc) quit")
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}
