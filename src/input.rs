// Keyboard input: raw terminal guard and a bounded-timeout key poller
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// Bytes a raw terminal sends first for the non-character keys
const BYTE_ESC: u8 = 0x1b;
const BYTE_DEL: u8 = 0x7f;

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A single keystroke
    Key(u8),
    /// No keystroke within the timeout
    Timeout,
    /// Ctrl+C; raw mode turns off SIGINT so it arrives as a key
    Interrupt,
}

/// Source of keystrokes for the control loop
///
/// `poll` must return within `timeout`. Errors are fatal to the loop.
pub trait InputSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<InputEvent>;
}

/// Puts the terminal in raw mode for as long as it is alive
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        debug!("Terminal raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match disable_raw_mode() {
            Ok(()) => debug!("Terminal mode restored"),
            Err(e) => warn!("Failed to restore terminal mode: {}", e),
        }
    }
}

/// Reads keystrokes from the terminal through crossterm
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<InputEvent> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(InputEvent::Timeout);
            }

            // Resize, focus, mouse and key release events are not keystrokes
            if let Event::Key(key) = event::read()? {
                if let Some(input) = key_to_input(key) {
                    return Ok(input);
                }
            }

            if remaining.is_zero() {
                return Ok(InputEvent::Timeout);
            }
        }
    }
}

/// Convert a crossterm key event to the byte a raw terminal would deliver
///
/// Returns `None` for key releases.
pub fn key_to_input(key: KeyEvent) -> Option<InputEvent> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let byte = match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => return Some(InputEvent::Interrupt),
        KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => (c as u8) & 0x1f,
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            c.encode_utf8(&mut buf).as_bytes()[0]
        }
        KeyCode::Enter => b'\r',
        KeyCode::Tab | KeyCode::BackTab => b'\t',
        KeyCode::Backspace => BYTE_DEL,
        // Esc, arrows, function keys: escape sequences start with ESC
        _ => BYTE_ESC,
    };
    Some(InputEvent::Key(byte))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_shifted_chars() {
        assert_eq!(
            key_to_input(press(KeyCode::Char('w'), KeyModifiers::NONE)),
            Some(InputEvent::Key(b'w'))
        );
        assert_eq!(
            key_to_input(press(KeyCode::Char('W'), KeyModifiers::SHIFT)),
            Some(InputEvent::Key(b'W'))
        );
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        assert_eq!(
            key_to_input(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Interrupt)
        );
    }

    #[test]
    fn test_other_ctrl_keys_are_control_bytes() {
        assert_eq!(
            key_to_input(press(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(InputEvent::Key(0x04))
        );
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(
            key_to_input(press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(InputEvent::Key(b'\r'))
        );
        assert_eq!(
            key_to_input(press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(InputEvent::Key(BYTE_DEL))
        );
        assert_eq!(
            key_to_input(press(KeyCode::Up, KeyModifiers::NONE)),
            Some(InputEvent::Key(BYTE_ESC))
        );
        assert_eq!(
            key_to_input(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(InputEvent::Key(BYTE_ESC))
        );
    }

    #[test]
    fn test_non_ascii_uses_first_utf8_byte() {
        assert_eq!(
            key_to_input(press(KeyCode::Char('é'), KeyModifiers::NONE)),
            Some(InputEvent::Key(0xc3))
        );
    }

    #[test]
    fn test_release_ignored() {
        let mut key = press(KeyCode::Char('w'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(key_to_input(key), None);

        key.kind = KeyEventKind::Repeat;
        assert_eq!(key_to_input(key), Some(InputEvent::Key(b'w')));
    }

    #[test]
    fn test_scripted_input_falls_back_to_timeout() {
        use mocks::ScriptedInput;

        let mut input = ScriptedInput::keys(b"w");
        assert_eq!(input.poll(Duration::ZERO).unwrap(), InputEvent::Key(b'w'));
        assert_eq!(input.poll(Duration::ZERO).unwrap(), InputEvent::Timeout);
        assert_eq!(input.remaining(), 0);
    }
}
