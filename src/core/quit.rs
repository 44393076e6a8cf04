use std::time::{Duration, Instant};

pub const DEFAULT_QUIT_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitDecision {
    /// First gesture, or one arriving after the window elapsed.
    Warn,
    /// Second gesture within the window.
    Quit,
}

/// Two-press confirmation for the interrupt gesture.
///
/// Tracks a single timestamp; a press outside the window re-arms it.
#[derive(Debug, Clone)]
pub struct QuitGuard {
    window: Duration,
    last_press: Option<Instant>,
}

impl QuitGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
        }
    }

    pub fn press(&mut self, now: Instant) -> QuitDecision {
        match self.last_press {
            Some(last) if now.saturating_duration_since(last) < self.window => QuitDecision::Quit,
            _ => {
                self.last_press = Some(now);
                QuitDecision::Warn
            }
        }
    }

    pub fn warning(&self) -> String {
        format!("Press C-c again within {} to quit", format_window(self.window))
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for QuitGuard {
    fn default() -> Self {
        Self::new(DEFAULT_QUIT_WINDOW)
    }
}

fn format_window(window: Duration) -> String {
    if window.subsec_millis() == 0 {
        format!("{}s", window.as_secs())
    } else {
        format!("{}ms", window.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_second_press_quits() {
        let mut guard = QuitGuard::default();
        let start = Instant::now();

        assert_eq!(guard.press(start), QuitDecision::Warn);
        assert_eq!(guard.press(start + Duration::from_millis(200)), QuitDecision::Quit);
    }

    #[test]
    fn test_slow_second_press_warns_again() {
        let mut guard = QuitGuard::default();
        let start = Instant::now();

        assert_eq!(guard.press(start), QuitDecision::Warn);
        assert_eq!(guard.press(start + Duration::from_millis(1500)), QuitDecision::Warn);
        // The re-issued warning opened a fresh window
        assert_eq!(guard.press(start + Duration::from_millis(1700)), QuitDecision::Quit);
    }

    #[test]
    fn test_warning_text() {
        assert_eq!(QuitGuard::default().warning(), "Press C-c again within 1s to quit");
        assert_eq!(
            QuitGuard::new(Duration::from_millis(1500)).warning(),
            "Press C-c again within 1500ms to quit"
        );
    }
}
