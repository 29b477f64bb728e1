//! Display sinks for rendered frames

use crate::raster::Frame;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{self, ClearType},
};
use std::fs;
use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Anything that can show a finished frame
pub trait DisplaySink {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;

    /// Whether the viewer asked to stop; checked once per frame
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Ctrl-C or Ctrl-D
///
/// Raw mode swallows the terminal's own interrupt signal, so the loop has to
/// notice these keys itself and return, which lets `Drop` restore the terminal.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

/// Terminal display handler with buffered output
pub struct TerminalDisplay {
    buffer: BufWriter<Stdout>,
}

impl TerminalDisplay {
    /// Enter raw mode, clear the screen and hide the cursor
    pub fn new() -> io::Result<Self> {
        let mut stdout = stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::Clear(ClearType::All), cursor::Hide)?;

        Ok(Self {
            buffer: BufWriter::new(stdout),
        })
    }

    /// Warn when the terminal cannot hold a full frame
    pub fn check_fits(&self, width: usize, height: usize) {
        match terminal::size() {
            Ok((cols, rows)) if (cols as usize) < width || (rows as usize) < height => {
                tracing::warn!(
                    terminal = %format!("{}x{}", cols, rows),
                    frame = %format!("{}x{}", width, height),
                    "Terminal is smaller than the frame; output will wrap"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Could not query terminal size"),
        }
    }
}

impl DisplaySink for TerminalDisplay {
    /// Write the frame row by row, positioning the cursor for each row
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        // Raw mode: a bare newline does not return the carriage
        for (y, row) in frame.rows().enumerate() {
            queue!(self.buffer, cursor::MoveTo(0, y as u16))?;
            let line: String = row.iter().collect();
            self.buffer.write_all(line.as_bytes())?;
        }
        self.buffer.flush()
    }

    /// Drain pending input without blocking, stopping on an interrupt key
    fn should_stop(&mut self) -> bool {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if is_interrupt(&key) => return true,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "Failed to read terminal event");
                        return false;
                    }
                },
                Ok(false) => return false,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to poll terminal events");
                    return false;
                }
            }
        }
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = self.buffer.flush();
        let height = terminal::size().map(|(_, rows)| rows).unwrap_or(0);
        let _ = execute!(stdout(), cursor::MoveTo(0, height.saturating_sub(1)), cursor::Show);
        println!();
    }
}

/// Writes each frame to `frame_NNN.txt` inside a directory
pub struct FrameDump {
    dir: PathBuf,
    next: usize,
}

impl FrameDump {
    /// Create the directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, next: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written so far
    pub fn written(&self) -> usize {
        self.next
    }

    fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{:03}.txt", index))
    }
}

impl DisplaySink for FrameDump {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let path = self.path_for(self.next);
        fs::write(&path, frame.to_string())?;
        tracing::debug!(path = %path.display(), "Wrote frame");
        self.next += 1;
        Ok(())
    }
}
