pub mod screen;
pub mod stats_view;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use wordo::{game::Mode, session::Phase, MAX_ATTEMPTS};

use crate::{App, Tone};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub fn tone_style(tone: Tone) -> Style {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    match tone {
        Tone::Good => bold_style.fg(Color::Green),
        Tone::Bad => bold_style.fg(Color::Red),
        Tone::Warning => bold_style.fg(Color::Yellow),
        Tone::Info => bold_style.fg(Color::Cyan),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let state = game.state();

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let tile_style = Style::default()
            .patch(bold_style)
            .fg(Color::Black)
            .bg(Color::Yellow);
        let magenta_style = Style::default().fg(Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // padding
                Constraint::Length(1), // letters
                Constraint::Length(1), // padding
                Constraint::Length(3), // input
                Constraint::Length(1), // message
                Constraint::Length(1), // score line
                Constraint::Min(3),    // accepted words
                Constraint::Length(1), // legend
            ])
            .split(area);

        let title = match game.mode() {
            Mode::Daily => format!("WOOOOORDO  {}", game.date()),
            Mode::Practice => "WOOOOORDO  practice".to_string(),
        };
        Paragraph::new(Span::styled(title, magenta_style.add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let mut tiles = Vec::new();
        for c in game.pool().letters() {
            tiles.push(Span::styled(
                format!(" {} ", c.to_ascii_uppercase()),
                tile_style,
            ));
            tiles.push(Span::raw(" "));
        }
        tiles.pop();
        Paragraph::new(Line::from(tiles))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let exhausted = state.phase() == Phase::Exhausted;
        let input_line = if exhausted {
            Line::from(Span::styled(
                "No attempts left today. Come back tomorrow!",
                Style::default().patch(bold_style).fg(Color::Yellow),
            ))
        } else {
            Line::from(vec![
                Span::styled(self.input.as_str().to_uppercase(), bold_style),
                Span::styled("_", dim_style.add_modifier(Modifier::SLOW_BLINK)),
            ])
        };
        Paragraph::new(input_line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Word"))
            .render(chunks[4], buf);

        if let Some(ref msg) = self.message {
            Paragraph::new(Span::styled(msg.text.clone(), tone_style(msg.tone)))
                .alignment(Alignment::Center)
                .render(chunks[5], buf);
        } else if game.is_unsaved() {
            Paragraph::new(Span::styled(
                "Progress not saved yet",
                tone_style(Tone::Warning),
            ))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
        }

        let best = state
            .best_word()
            .map(|b| format!("{} ({})", b.word.to_uppercase(), b.score))
            .unwrap_or_else(|| "-".to_string());
        Paragraph::new(Span::styled(
            format!(
                "Score {}   Attempts {}/{}   Best {}",
                state.total_points(),
                state.attempts(),
                MAX_ATTEMPTS,
                best
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

        let words: Vec<Line> = state
            .words()
            .iter()
            .map(|w| {
                Line::from(vec![
                    Span::styled(format!("{:<16}", w.word.to_uppercase()), bold_style),
                    Span::styled(format!("{:>4} pts", w.score), dim_style),
                ])
            })
            .collect();
        Paragraph::new(words)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP).title("Submitted"))
            .render(chunks[7], buf);

        let legend = Paragraph::new(Span::styled(
            "(enter) submit / (tab) stats / (esc) quit",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        legend.render(chunks[8], buf);
    }
}
