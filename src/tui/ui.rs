use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::{
    state::AppState,
    widgets::{input::render_input_panel, output::render_output_panel},
};
use crate::core::Console;

pub fn draw_ui(f: &mut Frame, state: &mut AppState, console: &Console) {
    let size = f.size();
    state.terminal_size = (size.width, size.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Output
            Constraint::Length(3), // Input line
        ])
        .split(size);

    render_output_panel(f, chunks[0], state, console);
    render_input_panel(f, chunks[1], state);
}
