// Snackbar notification bar.
// One-line transient message with a dismiss hint.

use ratatui::{prelude::*, widgets::*};

use crate::app::Notification;

/// Draw the notification across the given row.
pub fn draw_snackbar(frame: &mut Frame, notification: &Notification, area: Rect) {
    frame.render_widget(Clear, area);

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", notification.message),
            Style::default().fg(Color::White),
        ),
        Span::styled(" Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Dismiss ", Style::default().fg(Color::DarkGray)),
    ]);

    let widget = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(widget, area);
}
