use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{core::Console, tui::state::AppState};

pub fn render_output_panel(f: &mut Frame, area: Rect, state: &mut AppState, console: &Console) {
    let visible = usize::from(area.height.saturating_sub(2));
    let lines: Vec<&str> = console.output().lines().collect();
    state.clamp_scroll(lines.len(), visible);

    let end = lines.len() - state.scroll;
    let start = end.saturating_sub(visible);
    let text: Vec<Line> = lines[start..end].iter().map(|line| Line::from(*line)).collect();

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(panel_title(console.current_target().as_deref(), state.scroll)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}

fn panel_title(target: Option<&str>, scroll: usize) -> String {
    let mut title = match target {
        Some(target) => format!("Output - {}", target),
        None => "Output - not connected".to_string(),
    };
    if scroll > 0 {
        title.push_str(&format!(" [+{}]", scroll));
    }
    title
}
