//! Console - 操作员界面
//!
//! 面向操作员的文本走 println!，日志走 tracing，两者互不混用

pub mod input;
pub mod interactive;
pub mod prompt;

pub use input::ConsoleInput;
pub use interactive::{parse_command, run_interactive, ConsoleCommand};
pub use prompt::{ConsolePrompt, FixedReadingStatus};
