use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use super::{
    event::{map_key, KeyAction},
    state::AppState,
    ui::draw_ui,
};
use crate::{
    core::{
        output_channel, Connector, ConnectionSlot, Console, HostOps, LineDispatcher, OutputSink, QuitDecision,
        QuitGuard, ScriptBridge,
    },
    domain::{
        config::NetConConfig,
        error::{NetConError, NetConResult},
    },
};

type ConsoleTerminal = Terminal<CrosstermBackend<io::Stdout>>;

pub struct App {
    state: AppState,
    terminal: ConsoleTerminal,
    should_quit: bool,
    tick_rate: Duration,
    console: Console,
    dispatcher: LineDispatcher,
    quit_guard: QuitGuard,
    slot: Arc<ConnectionSlot>,
    sink: OutputSink,
    restored: bool,
}

impl App {
    pub fn new(config: &NetConConfig) -> NetConResult<Self> {
        // Script environment first so a failure leaves the terminal untouched
        let slot = Arc::new(ConnectionSlot::new());
        let (sink, events) = output_channel();
        let connector = Connector::from_config(Arc::clone(&slot), sink.clone(), config);
        let scripting = ScriptBridge::new(HostOps::new(connector), sink.clone())?;
        let dispatcher = LineDispatcher::new(Arc::clone(&slot), scripting, sink.clone())
            .with_local_echo(config.global.local_echo);
        let console = Console::new(events, Arc::clone(&slot), config.global.scrollback_lines);

        let terminal = setup_terminal()?;

        Ok(Self {
            state: AppState::new(config.global.input_history),
            terminal,
            should_quit: false,
            tick_rate: config.global.tick_rate(),
            console,
            dispatcher,
            quit_guard: QuitGuard::new(config.global.quit_window()),
            slot,
            sink,
            restored: false,
        })
    }

    /// Run until the quit gesture is confirmed, optionally dialing `initial_target` first.
    pub async fn run(&mut self, initial_target: Option<&str>) -> NetConResult<()> {
        self.sink
            .notice("Type /connect(\"host:port\") to open a connection; lines without / are sent to it");

        if let Some(target) = initial_target {
            self.draw()?;
            let result = self.dispatcher.scripting().host().connect(target).await;
            self.sink.notice(result.to_string());
        }

        loop {
            self.console.drain();
            self.draw()?;

            if self.should_quit {
                break;
            }

            if event::poll(self.tick_rate).map_err(|e| NetConError::Terminal(e.to_string()))? {
                match event::read().map_err(|e| NetConError::Terminal(e.to_string()))? {
                    Event::Key(key) => self.handle_key_event(key).await,
                    Event::Resize(width, height) => {
                        self.state.terminal_size = (width, height);
                    }
                    _ => {}
                }
            }
        }

        info!("Quit confirmed");
        self.close();
        Ok(())
    }

    async fn handle_key_event(&mut self, key: KeyEvent) {
        match map_key(key) {
            Some(KeyAction::Submit) => {
                let line = self.state.input.content().to_string();
                let outcome = self.dispatcher.submit(&line).await;
                debug!("Submitted line: {:?}", outcome);
                self.state.input.commit();
                self.state.follow_output();
            }
            Some(KeyAction::Interrupt) => match self.quit_guard.press(Instant::now()) {
                QuitDecision::Warn => {
                    self.sink.notice(self.quit_guard.warning());
                }
                QuitDecision::Quit => self.should_quit = true,
            },
            Some(KeyAction::ScrollUp) => self.state.scroll_up(),
            Some(KeyAction::ScrollDown) => self.state.scroll_down(),
            Some(KeyAction::Edit(key)) => {
                self.state.input.handle_key(key);
            }
            None => {}
        }
    }

    fn draw(&mut self) -> NetConResult<()> {
        let state = &mut self.state;
        let console = &self.console;
        self.terminal
            .draw(|f| draw_ui(f, state, console))
            .map_err(|e| NetConError::Terminal(e.to_string()))?;
        Ok(())
    }

    /// Close the current connection and hand the terminal back.
    pub fn close(&mut self) {
        if let Some(connection) = self.slot.clear() {
            info!("Closed connection to {} on exit", connection.target());
        }
        self.restore_terminal();
    }

    fn restore_terminal(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.close();
    }
}

fn setup_terminal() -> NetConResult<ConsoleTerminal> {
    enable_raw_mode().map_err(|e| NetConError::Terminal(e.to_string()))?;

    let mut stdout = io::stdout();
    let terminal = execute!(stdout, EnterAlternateScreen)
        .and_then(|_| Terminal::new(CrosstermBackend::new(stdout)));

    terminal.map_err(|e| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        NetConError::Terminal(e.to_string())
    })
}
