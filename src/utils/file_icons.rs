// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges
//! Phosphor file-icon mapping for staged attachments.
//!
//! Works on the attachment's declared content type and its normalized
//! extension (lowercase, leading dot), so the host list can pick an icon
//! without touching the encoded payload.

/// Return a Phosphor file icon matching the content type or extension.
pub fn icon_for(content_type: &str, extension: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();

    if mime.starts_with("image/") {
        return match ext.as_str() {
            "png" => egui_phosphor::regular::FILE_PNG,
            "jpg" | "jpeg" => egui_phosphor::regular::FILE_JPG,
            "svg" => egui_phosphor::regular::FILE_SVG,
            _ => egui_phosphor::regular::FILE_IMAGE,
        };
    }
    if mime.starts_with("video/") {
        return egui_phosphor::regular::FILE_VIDEO;
    }
    if mime.starts_with("audio/") {
        return egui_phosphor::regular::FILE_AUDIO;
    }

    match (mime.as_str(), ext.as_str()) {
        ("application/pdf", _) | (_, "pdf") => egui_phosphor::regular::FILE_PDF,
        ("text/csv", _) | (_, "csv") => egui_phosphor::regular::FILE_CSV,
        (_, "doc" | "docx") => egui_phosphor::regular::FILE_DOC,
        (_, "xls" | "xlsx") => egui_phosphor::regular::FILE_XLS,
        (_, "ppt" | "pptx") => egui_phosphor::regular::FILE_PPT,
        ("application/json" | "application/xml" | "text/xml", _) | (_, "json" | "xml") => {
            egui_phosphor::regular::FILE_CODE
        }
        ("text/html", _) | (_, "html" | "htm") => egui_phosphor::regular::FILE_HTML,
        ("text/markdown", _) | (_, "md") => egui_phosphor::regular::FILE_MD,
        (m, e) if is_archive(m, e) => egui_phosphor::regular::FILE_ARCHIVE,
        (_, "txt") => egui_phosphor::regular::FILE_TXT,
        (m, _) if m.starts_with("text/") => egui_phosphor::regular::FILE_TXT,
        _ => egui_phosphor::regular::FILE,
    }
}

fn is_archive(mime: &str, ext: &str) -> bool {
    matches!(
        mime,
        "application/zip"
            | "application/gzip"
            | "application/x-7z-compressed"
            | "application/x-rar-compressed"
            | "application/x-tar"
    ) || matches!(ext, "zip" | "gz" | "tgz" | "7z" | "rar" | "tar" | "xz" | "bz2")
}

#[cfg(test)]
mod tests {
    use super::icon_for;

    #[test]
    fn picks_icon_by_content_type_first() {
        assert_eq!(
            icon_for("image/png", ".png"),
            egui_phosphor::regular::FILE_PNG
        );
        assert_eq!(
            icon_for("application/pdf", ".bin"),
            egui_phosphor::regular::FILE_PDF
        );
    }

    #[test]
    fn falls_back_to_extension_and_generic_icon() {
        assert_eq!(
            icon_for("application/octet-stream", ".zip"),
            egui_phosphor::regular::FILE_ARCHIVE
        );
        assert_eq!(
            icon_for("application/octet-stream", ".weird"),
            egui_phosphor::regular::FILE
        );
    }
}
