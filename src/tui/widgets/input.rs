use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::state::AppState;

pub fn render_input_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let width = usize::from(area.width.saturating_sub(2)).max(1);
    let cursor = state.input.cursor_position();
    // Scroll horizontally so the cursor stays inside the pane
    let offset = cursor.saturating_sub(width - 1);

    let input = Paragraph::new(state.input.content())
        .style(Style::default().fg(Color::Yellow))
        .scroll((0, u16::try_from(offset).unwrap_or(u16::MAX)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Input (/ evaluates Lua, C-c twice quits)"),
        );
    f.render_widget(input, area);

    let column = u16::try_from(cursor - offset).unwrap_or(0);
    f.set_cursor(area.x + 1 + column, area.y + 1);
}
