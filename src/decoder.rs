//! Raw terminal bytes to key events.
//!
//! Arrow and function keys arrive as multi-byte escape sequences; a lone ESC
//! keypress arrives as a single `0x1b` with nothing after it. The only way to
//! tell them apart is a bounded second read: if no byte follows ESC within
//! `ESC_FOLLOWUP_TIMEOUT`, it was a real Escape. The timeout is deliberately
//! generous: too short and slow terminals misreport standalone ESC as the
//! start of an arrow sequence, which surfaced as phantom back-navigation.

use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

/// How long to wait for the byte after ESC before deciding it stood alone.
pub const ESC_FOLLOWUP_TIMEOUT: Duration = Duration::from_millis(45);

/// One decoded keypress (or the absence of one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Space,
    Backspace,
    Home,
    End,
    Delete,
    Char(char),
    Number(u8),
    /// No byte arrived within the caller's wait; drives periodic refresh.
    Timeout,
    /// Bytes we consumed but could not map. Never fatal.
    Unknown(Vec<u8>),
}

/// Blocking byte reader with a bounded wait. `Ok(None)` means the timeout
/// elapsed with nothing to read.
pub trait ByteSource {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Reads stdin one byte at a time via `poll(2)`.
pub struct StdinSource {
    fd: RawFd,
}

impl StdinSource {
    pub fn new() -> Self {
        Self { fd: libc::STDIN_FILENO }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
        // SAFETY: pfd points at a valid pollfd for the duration of the call.
        let ready = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            // EINTR (e.g. SIGWINCH) wakes the loop like a timeout would.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        // SAFETY: buf is a valid 1-byte buffer owned by this frame.
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, 1) };
        match n {
            1 => Ok(Some(buf[0])),
            0 => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while the menu was open",
            )),
            _ => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}

/// Stateless decoder; all timing comes from the byte source.
pub struct KeyDecoder {
    esc_timeout: Duration,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self {
            esc_timeout: ESC_FOLLOWUP_TIMEOUT,
        }
    }

    /// Read and decode one key event. Blocks at most `first_timeout` for the
    /// first byte, then at most `esc_timeout` per continuation byte.
    pub fn read_event(
        &self,
        source: &mut dyn ByteSource,
        first_timeout: Duration,
    ) -> io::Result<KeyEvent> {
        let byte = match source.read_byte(first_timeout)? {
            Some(byte) => byte,
            None => return Ok(KeyEvent::Timeout),
        };

        match byte {
            0x1b => self.decode_escape(source),
            b'\r' | b'\n' => Ok(KeyEvent::Enter),
            0x7f | 0x08 => Ok(KeyEvent::Backspace),
            b' ' => Ok(KeyEvent::Space),
            b'0'..=b'9' => Ok(KeyEvent::Number(byte - b'0')),
            byte if byte.is_ascii_alphabetic() => Ok(KeyEvent::Char(byte as char)),
            other => Ok(KeyEvent::Unknown(vec![other])),
        }
    }

    fn decode_escape(&self, source: &mut dyn ByteSource) -> io::Result<KeyEvent> {
        let second = match source.read_byte(self.esc_timeout)? {
            Some(byte) => byte,
            // Nothing followed: the user pressed Escape itself.
            None => return Ok(KeyEvent::Escape),
        };

        match second {
            b'[' => self.decode_csi(source),
            b'O' => self.decode_ss3(source),
            other => Ok(KeyEvent::Unknown(vec![0x1b, other])),
        }
    }

    /// CSI sequences: `ESC [` then optional digit/`;` parameters, then a
    /// final byte. Parameters are skipped so `ESC [ 1 ; 5 A` still reads as
    /// Up, matching how modified arrows arrive from most emulators.
    fn decode_csi(&self, source: &mut dyn ByteSource) -> io::Result<KeyEvent> {
        let mut consumed = vec![0x1b, b'['];
        loop {
            let byte = match source.read_byte(self.esc_timeout)? {
                Some(byte) => byte,
                None => return Ok(KeyEvent::Unknown(consumed)),
            };
            consumed.push(byte);

            if let Some(event) = map_csi_final(byte, &consumed) {
                return Ok(event);
            }
            if byte.is_ascii_digit() || byte == b';' {
                continue;
            }
            // Any other final byte ends the sequence unrecognized.
            return Ok(KeyEvent::Unknown(consumed));
        }
    }

    fn decode_ss3(&self, source: &mut dyn ByteSource) -> io::Result<KeyEvent> {
        let byte = match source.read_byte(self.esc_timeout)? {
            Some(byte) => byte,
            None => return Ok(KeyEvent::Unknown(vec![0x1b, b'O'])),
        };
        let event = match byte {
            b'A' => KeyEvent::Up,
            b'B' => KeyEvent::Down,
            b'C' => KeyEvent::Right,
            b'D' => KeyEvent::Left,
            b'H' => KeyEvent::Home,
            b'F' => KeyEvent::End,
            other => KeyEvent::Unknown(vec![0x1b, b'O', other]),
        };
        Ok(event)
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn map_csi_final(byte: u8, consumed: &[u8]) -> Option<KeyEvent> {
    match byte {
        b'A' => Some(KeyEvent::Up),
        b'B' => Some(KeyEvent::Down),
        b'C' => Some(KeyEvent::Right),
        b'D' => Some(KeyEvent::Left),
        b'H' => Some(KeyEvent::Home),
        b'F' => Some(KeyEvent::End),
        // `ESC [ 3 ~` is Delete; other tilde sequences stay unknown.
        b'~' if consumed == [0x1b, b'[', b'3', b'~'] => Some(KeyEvent::Delete),
        _ => None,
    }
}
