pub mod config;
pub mod grading;
pub mod output;
pub mod stderr_buffer;
pub mod tui;
