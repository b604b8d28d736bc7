//! Terminal output.
//!
//! - `log!` prints a line with a colored module prefix
//! - `debug!` prints only under `--verbose`
//! - [`PageProgress`] keeps one build progress line updated in place
//!
//! ```ignore
//! log!("build"; "rendering {} pages", count);
//!
//! let progress = PageProgress::new(files.len(), true);
//! progress.tick(Tick::Rendered);
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Set by `--verbose`.
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// A progress line is on screen and has no trailing newline.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("serve"; "http://{}", addr);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only under `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();

    // The next tick redraws the progress line below this message.
    if PROGRESS_ACTIVE.load(Ordering::SeqCst) {
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold().to_string(),
        "build" | "render" => prefix.bright_green().bold().to_string(),
        "error" | "warning" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Rendered,
    /// Record still being written.
    Pending,
    Failed,
}

/// Build progress: `[build] pages 42/69 (1 pending, 2 failed)`.
///
/// Counts are kept even when hidden, so the build reads its totals from
/// here. Redraws use `try_lock` and are skipped while another thread draws.
pub struct PageProgress {
    total: usize,
    rendered: AtomicUsize,
    pending: AtomicUsize,
    failed: AtomicUsize,
    visible: bool,
    draw: Mutex<()>,
}

impl PageProgress {
    pub fn new(total: usize, visible: bool) -> Self {
        let progress = Self {
            total,
            rendered: AtomicUsize::new(0),
            pending: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            visible: visible && total > 0,
            draw: Mutex::new(()),
        };
        if progress.visible {
            PROGRESS_ACTIVE.store(true, Ordering::SeqCst);
            progress.redraw(false);
        }
        progress
    }

    pub fn tick(&self, tick: Tick) {
        let counter = match tick {
            Tick::Rendered => &self.rendered,
            Tick::Pending => &self.pending,
            Tick::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if self.visible && let Some(_guard) = self.draw.try_lock() {
            self.redraw(false);
        }
    }

    pub fn rendered(&self) -> usize {
        self.rendered.load(Ordering::Relaxed)
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    fn line(&self) -> String {
        let pending = self.pending();
        let failed = self.failed.load(Ordering::Relaxed);
        let done = self.rendered() + pending + failed;

        let mut line = format!("pages {done}/{}", self.total);
        let notes: Vec<String> = [(pending, "pending"), (failed, "failed")]
            .into_iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, what)| format!("{n} {what}"))
            .collect();
        if !notes.is_empty() {
            line.push_str(&format!(" ({})", notes.join(", ")));
        }
        line
    }

    fn redraw(&self, last: bool) {
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} {}", colorize_prefix("build"), self.line()).ok();
        if last {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();
    }

    /// Leave the final line on screen.
    pub fn finish(self) {
        if self.visible {
            let _guard = self.draw.lock();
            self.redraw(true);
            PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for PageProgress {
    fn drop(&mut self) {
        // Dropped without `finish`: clear the partial line.
        if self.visible && PROGRESS_ACTIVE.swap(false, Ordering::SeqCst) {
            let mut stdout = stdout().lock();
            execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
            stdout.flush().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_notes() {
        let progress = PageProgress::new(4, false);
        progress.tick(Tick::Rendered);
        progress.tick(Tick::Rendered);
        assert_eq!(progress.line(), "pages 2/4");

        progress.tick(Tick::Failed);
        assert_eq!(progress.line(), "pages 3/4 (1 failed)");
        progress.tick(Tick::Pending);
        assert_eq!(progress.line(), "pages 4/4 (1 pending, 1 failed)");
        assert_eq!((progress.rendered(), progress.pending()), (2, 1));
    }

    #[test]
    fn test_prefix_keeps_module_name() {
        assert!(colorize_prefix("serve").contains("[serve]"));
        assert!(colorize_prefix("Code").contains("[Code]"));
    }
}
