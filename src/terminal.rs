use crate::surface::braille::{CELL_HEIGHT, CELL_WIDTH};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

const FALLBACK_SIZE: (u16, u16) = (80, 24);

// Raw mode, alternate screen and a hidden cursor for as long as it lives.
// Owns the frame writer so nothing can be written after the screen is handed back.
pub struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalGuard<W> {
    pub fn acquire(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Self::enter(out, true)
    }

    fn enter(out: W, raw_mode: bool) -> io::Result<Self> {
        // From here on drop undoes whatever got set up
        let mut guard = TerminalGuard { out, raw_mode };
        execute!(guard.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        info!("terminal acquired");
        Ok(guard)
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
        info!("terminal restored");
    }
}

// Flag raised by SIGINT, SIGTERM or SIGHUP instead of the default kill, so the
// run loop can stop and let the guard restore the terminal.
pub fn install_shutdown_flag() -> io::Result<Arc<AtomicBool>> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&flag))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&flag))?;
    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGHUP, Arc::clone(&flag))?;
    Ok(flag)
}

// Terminal size in character cells, 80x24 when it can't be queried
pub fn cell_size() -> (u16, u16) {
    terminal::size().unwrap_or_else(|err| {
        warn!("could not query terminal size ({}), using {}x{}", err, FALLBACK_SIZE.0, FALLBACK_SIZE.1);
        FALLBACK_SIZE
    })
}

pub fn canvas_size(cols: u16, rows: u16) -> (usize, usize) {
    (cols as usize * CELL_WIDTH, rows as usize * CELL_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::Ordering;

    const HIDE: &str = "\x1b[?25l";
    const SHOW: &str = "\x1b[?25h";
    const ENTER_ALT: &str = "\x1b[?1049h";
    const LEAVE_ALT: &str = "\x1b[?1049l";

    // Shared byte sink that outlives the guard writing into it
    #[derive(Clone, Default)]
    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Sink {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn draw_frames(sink: &Sink, frames: usize, fail_at: Option<usize>) -> io::Result<()> {
        let mut guard = TerminalGuard::enter(sink.clone(), false)?;
        for n in 0..frames {
            if fail_at == Some(n) {
                return Err(io::Error::other("frame failed"));
            }
            guard.writer().write_all(b"\x1b[Hframe")?;
        }
        Ok(())
    }

    #[test]
    fn cursor_is_hidden_and_shown_once_on_normal_exit() {
        let sink = Sink::default();
        draw_frames(&sink, 3, None).unwrap();

        let text = sink.text();
        assert_eq!(text.matches(HIDE).count(), 1);
        assert_eq!(text.matches(SHOW).count(), 1);
        assert_eq!(text.matches(ENTER_ALT).count(), 1);
        assert_eq!(text.matches(LEAVE_ALT).count(), 1);
        assert!(text.find(HIDE) < text.find("frame"));
        assert!(text.rfind("frame") < text.find(SHOW));
    }

    #[test]
    fn cursor_is_shown_once_when_a_frame_errors() {
        let sink = Sink::default();
        assert!(draw_frames(&sink, 3, Some(1)).is_err());

        let text = sink.text();
        assert_eq!(text.matches("frame").count(), 1);
        assert_eq!(text.matches(HIDE).count(), 1);
        assert_eq!(text.matches(SHOW).count(), 1);
        assert_eq!(text.matches(LEAVE_ALT).count(), 1);
        assert!(text.ends_with(LEAVE_ALT));
    }

    #[cfg(unix)]
    #[test]
    fn termination_signals_raise_the_flag() {
        let flag = install_shutdown_flag().unwrap();
        assert!(!flag.load(Ordering::SeqCst));

        signal_hook::low_level::raise(signal_hook::consts::SIGINT).unwrap();
        assert!(flag.load(Ordering::SeqCst));

        flag.store(false, Ordering::SeqCst);
        signal_hook::low_level::raise(signal_hook::consts::SIGTERM).unwrap();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn canvas_packs_two_by_four_pixels_per_cell() {
        assert_eq!(canvas_size(80, 24), (160, 96));
        assert_eq!(canvas_size(1, 1), (2, 4));
        assert_eq!(canvas_size(0, 0), (0, 0));
    }

    #[test]
    fn fallback_is_a_classic_terminal() {
        assert_eq!(canvas_size(FALLBACK_SIZE.0, FALLBACK_SIZE.1), (160, 96));
    }
}
