//! 上传文件的内容签名校验

/// 扩展名与文件头签名对照
struct Signature {
    extensions: &'static [&'static str],
    check: fn(&[u8]) -> bool,
}

const ZIP_HEADER: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
const OLE_HEADER: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const SIGNATURES: &[Signature] = &[
    Signature {
        extensions: &[".pdf"],
        check: |d| d.starts_with(b"%PDF"),
    },
    Signature {
        extensions: &[".png"],
        check: |d| d.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
    },
    Signature {
        extensions: &[".jpg", ".jpeg"],
        check: |d| d.starts_with(&[0xFF, 0xD8, 0xFF]),
    },
    Signature {
        extensions: &[".gif"],
        check: |d| d.starts_with(b"GIF87a") || d.starts_with(b"GIF89a"),
    },
    Signature {
        extensions: &[".webp"],
        check: |d| d.len() >= 12 && &d[0..4] == b"RIFF" && &d[8..12] == b"WEBP",
    },
    // 旧版 Office（OLE 复合文档）
    Signature {
        extensions: &[".doc", ".xls", ".ppt"],
        check: |d| d.starts_with(OLE_HEADER),
    },
    // OOXML 与 zip 同为 zip 容器
    Signature {
        extensions: &[".docx", ".xlsx", ".pptx", ".zip"],
        check: |d| d.starts_with(ZIP_HEADER),
    },
    // 纯文本不校验文件头，但拒绝二进制内容
    Signature {
        extensions: &[".txt", ".md", ".csv"],
        check: |d| !d.contains(&0),
    },
];

/// 校验文件开头的字节是否与扩展名相符，未知扩展名一律拒绝
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    let extension = extension.to_lowercase();
    SIGNATURES
        .iter()
        .find(|sig| sig.extensions.contains(&extension.as_str()))
        .is_some_and(|sig| (sig.check)(data))
}

/// 根据扩展名推断 Content-Type
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        ".pdf" => "application/pdf",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".ppt" => "application/vnd.ms-powerpoint",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".zip" => "application/zip",
        ".txt" => "text/plain; charset=utf-8",
        ".md" => "text/markdown; charset=utf-8",
        ".csv" => "text/csv; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_and_images() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n", ".pdf"));
        assert!(validate_magic_bytes(b"%PDF-1.4", ".PDF"));
        assert!(!validate_magic_bytes(b"GIF89a", ".pdf"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
        assert!(validate_magic_bytes(b"RIFF\x00\x00\x00\x00WEBPVP8 ", ".webp"));
    }

    #[test]
    fn test_office_containers() {
        let zip = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip, ".docx"));
        assert!(validate_magic_bytes(&zip, ".zip"));
        assert!(!validate_magic_bytes(&zip, ".doc"));
    }

    #[test]
    fn test_text_rejects_binary() {
        assert!(validate_magic_bytes(b"name,score\nAnn,90\n", ".csv"));
        assert!(!validate_magic_bytes(b"MZ\x00\x90", ".txt"));
    }

    #[test]
    fn test_empty_or_unknown() {
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"#!/bin/sh", ".sh"));
    }

    #[test]
    fn test_content_type_lookup() {
        assert_eq!(content_type_for(".PDF"), "application/pdf");
        assert_eq!(content_type_for(".bin"), "application/octet-stream");
    }
}
