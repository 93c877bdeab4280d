use crate::sink::EventSink;

use super::severity::Severity;

bitflags::bitflags! {
    /// Log categories attached to each callback by the database driver.
    ///
    /// Opaque to decoding; only the fallback path looks at them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Category: u64 {
        const ERRORS = 1 << 0;
        const MESSAGES = 1 << 1;
        const ROWS = 1 << 2;
        const SQL = 1 << 3;
        const PARAMS = 1 << 4;
        const TRANSACTION = 1 << 5;
        const DEBUG = 1 << 6;
        const RETRIES = 1 << 7;
    }
}

impl Category {
    /// Lookup by lowercase name (`errors`, `messages`, ...).
    pub fn from_lowercase_name(name: &str) -> Option<Self> {
        Self::from_name(&name.to_ascii_uppercase())
    }
}

/// Handles messages that carry no recognized `level:` prefix.
pub trait Fallback: Send + Sync {
    fn log(&self, sink: &dyn EventSink, category: Category, msg: &str);
}

impl<F> Fallback for F
where
    F: Fn(&dyn EventSink, Category, &str) + Send + Sync,
{
    fn log(&self, sink: &dyn EventSink, category: Category, msg: &str) {
        self(sink, category, msg)
    }
}

/// Logs the untouched message at a fixed level when its category intersects
/// `mask`; drops it otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFallback {
    pub mask: Category,
    pub level: Severity,
}

impl Default for StandardFallback {
    /// Server errors become warnings, everything else is dropped.
    fn default() -> Self {
        Self {
            mask: Category::ERRORS,
            level: Severity::Warning,
        }
    }
}

impl Fallback for StandardFallback {
    fn log(&self, sink: &dyn EventSink, category: Category, msg: &str) {
        if self.mask.intersects(category) {
            sink.emit(self.level, None, msg);
        }
    }
}
