pub mod layout;
pub mod screen;

use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::clock::Clock;
use crate::session::{PhaseKind, SessionSnapshot};
use crate::storage::Storage;
use crate::ui::layout::{screen_chunks, BoardLayout};
use crate::ui::screen::{IdleScreen, PlayingScreen, ResultScreen};
use crate::util::format_elapsed;
use crate::App;

impl<S: Storage, C: Clock + Clone, R: Rng> Widget for &App<S, C, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.session.snapshot();
        let [header, body, footer] = screen_chunks(area);

        render_header(&snapshot, self.settings.level().label(), header, buf);

        match snapshot.phase {
            PhaseKind::Idle => IdleScreen {
                level: self.settings.level(),
                settings: self.settings.settings(),
                presets: self.settings.presets(),
                loaded: self.settings.is_loaded(),
            }
            .render(body, buf),
            PhaseKind::Playing => PlayingScreen {
                snapshot: &snapshot,
                layout: BoardLayout::compute(body, snapshot.grid_size),
                cursor: self.cursor,
            }
            .render(body, buf),
            PhaseKind::Result => {
                if let Some(result) = snapshot.result {
                    ResultScreen { result }.render(body, buf);
                }
            }
        }

        let legend = match snapshot.phase {
            PhaseKind::Idle => "(enter) start / (1-3) preset / (+/-) size / (esc)ape",
            PhaseKind::Playing => "(arrows) move / (space) select / (g)ive up / (esc)ape",
            PhaseKind::Result => "(r)etry / (esc)ape",
        };
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(footer, buf);
    }
}

fn render_header(snapshot: &SessionSnapshot, level: &str, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let size = snapshot.grid_size.get();

    let status = match snapshot.phase {
        PhaseKind::Idle => Line::from(Span::styled(
            format!("{level} {size}×{size}"),
            Style::default().add_modifier(Modifier::DIM),
        )),
        PhaseKind::Playing => Line::from(vec![
            Span::raw("Next: "),
            Span::styled(
                snapshot
                    .current_target
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                Style::default().fg(Color::Blue).patch(bold),
            ),
            Span::raw("   Mistakes: "),
            Span::styled(
                snapshot.mistakes.to_string(),
                Style::default().fg(Color::Red).patch(bold),
            ),
            Span::raw("   Time: "),
            Span::styled(format_elapsed(snapshot.elapsed), bold),
        ]),
        PhaseKind::Result => Line::default(),
    };

    Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "Schulte Table",
            Style::default().fg(Color::Cyan).patch(bold),
        )),
        status,
    ])
    .alignment(Alignment::Center)
    .render(area, buf);
}
