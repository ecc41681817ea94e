//! JSON 输出到文件

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use zmb_core::{MapBuilderError, Result};

/// 以美化 JSON 写入 `path` (Unix 下权限为 0640)
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(MapBuilderError::config("output file path cannot be empty"));
    }

    let body = serde_json::to_vec_pretty(value)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o640);
    }

    let mut file = options.open(path)?;
    file.write_all(&body)?;
    file.write_all(b"\n")?;

    tracing::debug!(path = %path.display(), bytes = body.len(), "output written");
    Ok(())
}
