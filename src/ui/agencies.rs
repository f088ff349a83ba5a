// Agency list rendering.
// Shows the latest store snapshot with loading and empty states.

use ratatui::{prelude::*, widgets::*};

use crate::api::Agency;

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the agencies table contents.
pub fn render_agencies(frame: &mut Frame, agencies: &[Agency], loading: bool, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Agencies ({}) ", agencies.len()));

    if agencies.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if loading {
            render_loading(frame, inner, "Fetching agencies");
        } else {
            render_empty(frame, inner, "No agencies cached yet");
        }
        return;
    }

    let id_width = agencies.iter().map(|a| a.id.len()).max().unwrap_or(0);

    let items: Vec<ListItem> = agencies
        .iter()
        .map(|agency| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", agency.id, width = id_width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(agency.name.as_str(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
