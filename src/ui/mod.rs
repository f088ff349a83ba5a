// UI module for rendering the TUI.
// Title bar, agency list, notification bar and status line.

mod agencies;
mod snackbar;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let notification_height = if app.notification.is_some() { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                   // Title bar
            Constraint::Min(1),                      // Agencies
            Constraint::Length(notification_height), // Snackbar
            Constraint::Length(1),                   // Status bar
        ])
        .split(frame.area());

    draw_title(frame, chunks[0]);
    agencies::render_agencies(frame, &app.agencies, app.loading, chunks[1]);

    if let Some(notification) = &app.notification {
        snackbar::draw_snackbar(frame, notification, chunks[2]);
    }

    draw_status_bar(frame, app, chunks[3]);
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![Span::styled(
        " LA Metro transit agencies",
        Style::default().fg(Color::White),
    )]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" kickstart ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(title, area);
}

/// Key hints on the left, loading indicator on the right.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" Esc "),
        Span::styled("Dismiss", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    if app.loading {
        hints.push(Span::styled(
            "  ⏳ Syncing...",
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
