mod view;

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::game::{DirectionalKeys, KeyTracker};
use crate::net::NetworkClient;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    keys: KeyTracker,
    enhanced_keyboard: bool,
    should_quit: bool,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        // Release events are only reported with the enhancement flags.
        let enhanced_keyboard = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keyboard {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            keys: KeyTracker::new(),
            enhanced_keyboard,
            should_quit: false,
        })
    }

    pub fn run(&mut self, client: &mut NetworkClient) -> anyhow::Result<()> {
        let frame_budget = client.config().frame_duration();
        let mut last_frame = Instant::now();

        while !self.should_quit {
            let frame_start = Instant::now();
            let dt = frame_start.duration_since(last_frame).as_secs_f32();
            last_frame = frame_start;

            self.drain_terminal_events(frame_start)?;

            let input = self.keys.held_at(frame_start).motion();
            if let Err(e) = client.update(dt, input) {
                log::error!("Network update error: {}", e);
            }

            self.terminal.draw(|frame| view::render(frame, client))?;

            if let Some(remaining) = frame_budget.checked_sub(frame_start.elapsed()) {
                thread::sleep(remaining);
            }
        }

        Ok(())
    }

    fn drain_terminal_events(&mut self, now: Instant) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, now);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'));
        if quit && key.kind == KeyEventKind::Press {
            self.should_quit = true;
            return;
        }

        let Some(direction) = DirectionalKeys::from_key_code(key.code) else {
            return;
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.keys.press(direction, now),
            KeyEventKind::Release => self.keys.release(direction),
        }
    }

    pub fn restore_terminal(&mut self) -> io::Result<()> {
        if self.enhanced_keyboard {
            execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
            self.enhanced_keyboard = false;
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

pub fn run(client: &mut NetworkClient) -> anyhow::Result<()> {
    let mut tui = Tui::new()?;
    let result = tui.run(client);
    tui.restore_terminal()?;
    result
}
