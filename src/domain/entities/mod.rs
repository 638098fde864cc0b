pub mod audit;
pub mod cache;
pub mod file_info;
pub mod tree;

pub use audit::{AuditLog, LogEntry, LogLevel, TIMESTAMP_FORMAT};
pub use cache::{is_blank, ResponseCache};
pub use file_info::{FileInfo, FileMeta, DIR_MODE, FILE_MODE};
pub use tree::{read_window, Access, NodeSpec, SyntheticTree};
