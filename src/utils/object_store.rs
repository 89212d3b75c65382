//! 资料文件的本地对象存储路径
//!
//! 对象键形如 `<student_id>/<unix_ms>-<安全文件名>`，始终位于上传目录之内。

use std::path::{Component, Path, PathBuf};

/// 取扩展名（含点号，小写）
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

/// 文件名只保留字母、数字、点、下划线和连字符，其余替换为下划线
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut sanitized = String::with_capacity(base.len());
    let mut last_was_sep = false;
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') {
            sanitized.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            sanitized.push('_');
            last_was_sep = true;
        }
    }

    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn object_key(student_id: i64, uploaded_at_ms: i64, file_name: &str) -> String {
    format!(
        "{student_id}/{uploaded_at_ms}-{}",
        sanitize_file_name(file_name)
    )
}

/// 将对象键解析为上传目录下的路径，拒绝绝对路径与 `..`
pub fn resolve_object_path(upload_dir: &str, key: &str) -> Option<PathBuf> {
    let key_path = Path::new(key);
    if key.is_empty()
        || !key_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(Path::new(upload_dir).join(key_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Report.PDF").as_deref(), Some(".pdf"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(file_extension("README"), None);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Week 1 notes.pdf"), "Week_1_notes.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\math (v2).docx"), "math_v2_.docx");
        assert_eq!(sanitize_file_name("数学.pdf"), "_.pdf");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[test]
    fn test_object_key_layout() {
        assert_eq!(
            object_key(12, 1_700_000_000_123, "My Notes.pdf"),
            "12/1700000000123-My_Notes.pdf"
        );
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        assert_eq!(
            resolve_object_path("uploads", "3/1-a.pdf"),
            Some(PathBuf::from("uploads/3/1-a.pdf"))
        );
        assert!(resolve_object_path("uploads", "../secret").is_none());
        assert!(resolve_object_path("uploads", "/etc/passwd").is_none());
        assert!(resolve_object_path("uploads", "").is_none());
    }
}
