//! Where usage text goes and what happens after a usage error.

use std::fmt;
use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Wrap width used when the sink cannot report one.
pub const FALLBACK_WIDTH: usize = 80;

/// Exit code used by the default error action.
pub const USAGE_EXIT_CODE: i32 = -1;

/// A text sink for usage and error output.
pub trait Output: Send + Sync {
    fn write_text(&self, text: &str);

    /// Column count of the sink, if it is a terminal.
    fn width(&self) -> Option<usize> {
        None
    }
}

/// Writes to the process stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn write_text(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // Nothing sensible to do if stdout is gone.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn width(&self) -> Option<usize> {
        if !std::io::stdout().is_terminal() {
            return None;
        }
        crossterm::terminal::size()
            .ok()
            .map(|(columns, _)| usize::from(columns))
            .filter(|columns| *columns > 0)
    }
}

/// Collects output in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferOutput {
    buffer: Arc<Mutex<String>>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the collected text and clear the buffer.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Output for BufferOutput {
    fn write_text(&self, text: &str) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }
}

type ErrorAction = Arc<dyn Fn() + Send + Sync>;

/// Output sink, error action and wrap width of a definition.
///
/// The default writes to stdout, wraps at the terminal width (or
/// [`FALLBACK_WIDTH`]), and exits the process with [`USAGE_EXIT_CODE`] after a
/// usage error.
#[derive(Clone)]
pub struct Configuration {
    output: Arc<dyn Output>,
    on_error: ErrorAction,
    width: Option<usize>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            output: Arc::new(StdoutOutput),
            on_error: Arc::new(|| std::process::exit(USAGE_EXIT_CODE)),
            width: None,
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: impl Output + 'static) -> Self {
        self.output = Arc::new(output);
        self
    }

    pub fn with_shared_output(mut self, output: Arc<dyn Output>) -> Self {
        self.output = output;
        self
    }

    /// Replace the action run after a usage error.
    ///
    /// If the action returns, the run returns `Err(Error::Usage)`.
    pub fn with_error_action(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_error = Arc::new(action);
        self
    }

    /// Pin the wrap width instead of asking the sink.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn output(&self) -> &dyn Output {
        self.output.as_ref()
    }

    pub fn width(&self) -> usize {
        self.width
            .or_else(|| self.output.width())
            .unwrap_or(FALLBACK_WIDTH)
    }

    pub(crate) fn invoke_error_action(&self) {
        (self.on_error)();
    }
}
