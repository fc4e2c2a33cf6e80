use ratatui::layout::Rect;
use ratatui::prelude::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::AppState;

/// Top banner: centered wordmark over a separating bottom border. The border
/// picks up the accent color while a submission is in flight.
pub fn draw_banner(f: &mut Frame, area: Rect, state: &AppState) {
    let border = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(if state.status_text.is_some() {
            crate::theme::Theme::default().accent
        } else {
            crate::theme::Theme::default().muted
        }));
    let inner = border.inner(area);
    let lines = vec![
        Line::from(Span::styled(
            "TICKET TUI",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "screening ticket purchase",
            crate::theme::text_muted(),
        )),
    ];
    let p = Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(p, inner);
    f.render_widget(border, area);
}
