use serde::Serialize;

/// Mode reported for synthetic files
pub const FILE_MODE: u32 = 0o644;

/// Mode reported for the root directory
pub const DIR_MODE: u32 = 0o755;

/// Constant metadata attached to every entry of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMeta {
    /// Owning plugin name
    pub name: String,
    /// "file" or "directory"
    pub kind: String,
    pub content: String,
}

/// Stat record for a synthetic path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mode: u32,
    /// Unix seconds, taken when the record is built
    pub mod_time: i64,
    pub is_dir: bool,
    pub meta: FileMeta,
}

impl FileInfo {
    pub fn file(owner: &str, name: impl Into<String>, size: u64) -> Self {
        Self::build(owner, name.into(), size, false)
    }

    pub fn directory(owner: &str, name: impl Into<String>) -> Self {
        Self::build(owner, name.into(), 0, true)
    }

    fn build(owner: &str, name: String, size: u64, is_dir: bool) -> Self {
        let kind = if is_dir { "directory" } else { "file" };
        Self {
            name,
            size,
            mode: if is_dir { DIR_MODE } else { FILE_MODE },
            mod_time: chrono::Utc::now().timestamp(),
            is_dir,
            meta: FileMeta {
                name: owner.to_string(),
                kind: kind.to_string(),
                content: "{}".to_string(),
            },
        }
    }
}
