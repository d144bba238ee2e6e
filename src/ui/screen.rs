use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::session::{GameResult, Outcome, SessionSnapshot};
use crate::settings::{DifficultyLevel, Preset, Presets, SchulteSettings};
use crate::ui::layout::BoardLayout;
use crate::util::format_elapsed;

/// Difficulty picker and instructions shown before a table is dealt
pub struct IdleScreen<'a> {
    pub level: DifficultyLevel,
    pub settings: &'a SchulteSettings,
    pub presets: &'a Presets<SchulteSettings>,
    pub loaded: bool,
}

impl Widget for IdleScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let cells = self.settings.grid_size.cell_count();

        let mut lines = vec![
            Line::from(Span::styled(
                format!("Find the numbers from 1 to {cells} in order, as fast as you can."),
                bold,
            )),
            Line::default(),
        ];

        // avoid flashing defaults before the saved choice is known
        if self.loaded {
            for (key, preset) in Preset::ALL.iter().enumerate() {
                let level = DifficultyLevel::from(*preset);
                let size = self.presets.get(*preset).grid_size.get();
                let text = format!("({}) {} {size}×{size}", key + 1, level.label());
                let style = if level == self.level {
                    Style::default().fg(Color::Cyan).patch(bold)
                } else {
                    dim
                };
                lines.push(Line::from(Span::styled(text, style)));
            }
            let size = self.settings.grid_size.get();
            let custom_style = if self.level == DifficultyLevel::Custom {
                Style::default().fg(Color::Cyan).patch(bold)
            } else {
                dim
            };
            lines.push(Line::from(Span::styled(
                format!("(+/-) {} {size}×{size}", DifficultyLevel::Custom.label()),
                custom_style,
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// The board in play
pub struct PlayingScreen<'a> {
    pub snapshot: &'a SessionSnapshot,
    pub layout: BoardLayout,
    pub cursor: usize,
}

impl Widget for PlayingScreen<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);

        for (index, &value) in self.snapshot.board.iter().enumerate() {
            let rect = self.layout.cell_rect(index);
            if rect.is_empty() {
                continue;
            }

            let mut style = match self.snapshot.feedback {
                Some(fb) if fb.value == value => match fb.outcome {
                    Outcome::Correct => Style::default().fg(Color::Green).patch(bold),
                    Outcome::Incorrect => Style::default().fg(Color::Red).patch(bold),
                },
                _ => Style::default(),
            };
            if index == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let label = Paragraph::new(Span::styled(value.to_string(), style))
                .alignment(Alignment::Center);
            if self.layout.is_boxed() {
                let border_style = match self.snapshot.feedback {
                    Some(fb) if fb.value == value => style.remove_modifier(Modifier::REVERSED),
                    _ => Style::default().fg(Color::DarkGray),
                };
                label
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(border_style),
                    )
                    .render(rect, buf);
            } else {
                label.render(rect, buf);
            }
        }
    }
}

/// Final figures of a completed table
pub struct ResultScreen {
    pub result: GameResult,
}

impl Widget for ResultScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let size = self.result.grid_size.get();
        let lines = vec![
            Line::from(Span::styled(
                format!("Done: {size}×{size}"),
                Style::default().fg(Color::Green).patch(bold),
            )),
            Line::default(),
            Line::from(Span::styled(
                format!("Mistakes: {}", self.result.mistakes),
                bold,
            )),
            Line::from(Span::styled(
                format!("Time: {}", format_elapsed(self.result.elapsed)),
                bold,
            )),
        ];

        let height = lines.len() as u16;
        let top = area.y + area.height.saturating_sub(height) / 2;
        let centered = Rect::new(area.x, top, area.width, height.min(area.height));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(centered, buf);
    }
}
