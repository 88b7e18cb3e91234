// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Attachment domain model and the ordered set handed to the host (UI-agnostic).

use serde::{Deserialize, Serialize};

/// Encoded file ready for the host. Field names are the host-facing schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    /// Lowercased extension including the leading dot, or empty when the name has none.
    pub extension: String,
    pub declared_content_type: String,
    /// Standard base64 payload without any `data:` prefix.
    pub encoded_content: String,
}

impl Attachment {
    pub fn new(name: String, declared_content_type: String, encoded_content: String) -> Self {
        let extension = extension_of(&name);
        Self {
            name,
            extension,
            declared_content_type,
            encoded_content,
        }
    }
}

/// Lowercased substring after the last `.`, prefixed with `.`.
///
/// Names without a dot yield an empty extension.
pub fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_ascii_lowercase()),
        None => String::new(),
    }
}

/// Ordered attachments with unique names, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentSet {
    items: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.items.iter().any(|a| a.name == name)
    }

    /// Copy of this set with `additions` appended in order.
    ///
    /// Additions whose name is already present are skipped so the set never
    /// holds two attachments with the same name.
    pub fn appended(&self, additions: Vec<Attachment>) -> Self {
        let mut set = self.clone();
        for attachment in additions {
            if !set.contains_name(&attachment.name) {
                set.items.push(attachment);
            }
        }
        set
    }

    /// Copy of this set without the element at `index`, plus the removed element.
    ///
    /// # Panics
    ///
    /// Panics when `index >= self.len()`.
    pub fn without(&self, index: usize) -> (Self, Attachment) {
        let mut items = self.items.clone();
        let removed = items.remove(index);
        (Self { items }, removed)
    }

    /// Host-facing JSON snapshot of the set.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::{Attachment, AttachmentSet, extension_of};

    fn att(name: &str) -> Attachment {
        Attachment::new(name.into(), "application/pdf".into(), "QQ==".into())
    }

    #[test]
    fn extension_is_lowercased_with_leading_dot() {
        assert_eq!(extension_of("Report.PDF"), ".pdf");
        assert_eq!(extension_of("archive.tar.GZ"), ".gz");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn appended_keeps_order_and_skips_existing_names() {
        let set = AttachmentSet::new().appended(vec![att("a.pdf"), att("b.pdf")]);
        let set = set.appended(vec![att("c.pdf"), att("a.pdf")]);

        let names: Vec<_> = set.items().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn without_preserves_relative_order() {
        let set = AttachmentSet::new().appended(vec![att("a.pdf"), att("b.pdf"), att("c.pdf")]);

        let (rest, removed) = set.without(1);

        assert_eq!(removed.name, "b.pdf");
        let names: Vec<_> = rest.items().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "c.pdf"]);
        assert_eq!(set.len(), 3, "source snapshot is untouched");
    }

    #[test]
    #[should_panic]
    fn without_out_of_range_panics() {
        let _ = AttachmentSet::new().without(0);
    }

    #[test]
    fn json_uses_host_field_names() {
        let set = AttachmentSet::new().appended(vec![att("a.PDF")]);

        let json = set.to_json().unwrap();

        assert_eq!(
            json,
            r#"[{"name":"a.PDF","extension":".pdf","declaredContentType":"application/pdf","encodedContent":"QQ=="}]"#
        );
    }

    #[test]
    fn dotless_name_serializes_with_empty_extension() {
        let set = AttachmentSet::new().appended(vec![Attachment::new(
            "Makefile".into(),
            "text/plain".into(),
            "YWxs".into(),
        )]);

        assert_eq!(
            set.to_json().unwrap(),
            r#"[{"name":"Makefile","extension":"","declaredContentType":"text/plain","encodedContent":"YWxs"}]"#
        );
    }
}
