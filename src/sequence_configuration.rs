//! Configuration types for sequence operations

/// Configuration for the worker thread started by a channel bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Worker threads are named `{thread_name_prefix}-{n}`
    pub thread_name_prefix: String,
    /// Stack size for the worker; `None` keeps the platform default
    pub stack_size: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "lazy-stream-bridge".to_string(),
            stack_size: None,
        }
    }
}

impl BridgeConfig {
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// Configuration for line-oriented input adapters (files, readers, stdin)
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Capacity of the buffered reader wrapped around files
    pub buffer_capacity: usize,
    /// Drop lines that are empty once the line ending is removed
    pub skip_empty_lines: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 8192,
            skip_empty_lines: false,
        }
    }
}
