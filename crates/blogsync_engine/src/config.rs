//! Configuration for the engine.

/// Default number of posts per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Configuration for the repository and pagination controller.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Posts requested per page. Never zero.
    pub page_size: u32,
    /// Write-back events kept for polling.
    pub write_back_history: usize,
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            write_back_history: 256,
        }
    }

    /// Sets the page size. Zero is raised to one.
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sets how many write-back events are kept.
    #[must_use]
    pub fn with_write_back_history(mut self, max: usize) -> Self {
        self.write_back_history = max;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
