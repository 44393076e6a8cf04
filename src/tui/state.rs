use super::input::InputBuffer;

/// UI-owned view state. The output itself lives in the console.
#[derive(Debug)]
pub struct AppState {
    pub input: InputBuffer,
    /// Lines scrolled back from the bottom of the output; zero follows new output
    pub scroll: usize,
    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            input: InputBuffer::new(history_limit),
            scroll: 0,
            terminal_size: (80, 24),
        }
    }

    /// Output rows visible between the pane borders and the input pane.
    pub fn page_size(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(5)).max(1)
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_add(self.page_size());
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(self.page_size());
    }

    /// Keep the offset within the output that exists.
    pub fn clamp_scroll(&mut self, total_lines: usize, visible: usize) {
        self.scroll = self.scroll.min(total_lines.saturating_sub(visible));
    }

    pub fn follow_output(&mut self) {
        self.scroll = 0;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(100)
    }
}
