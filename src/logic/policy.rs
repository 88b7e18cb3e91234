// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Type/size admissibility of a single file.

use crate::error::{Result, StagingError};
use crate::models::attachment::extension_of;
use crate::models::{AllowedTypes, PolicySpec};

/// True when the file passes both the type and the size dimension of `policy`.
pub fn is_admissible(name: &str, declared_content_type: &str, size: u64, policy: &PolicySpec) -> bool {
    check_file(name, declared_content_type, size, policy).is_ok()
}

/// Check one file, reporting which dimension failed. Type is checked first.
pub fn check_file(
    name: &str,
    declared_content_type: &str,
    size: u64,
    policy: &PolicySpec,
) -> Result<()> {
    if !type_matches(name, declared_content_type, &policy.allowed()) {
        return Err(StagingError::TypeRejected { name: name.into() });
    }
    if size > policy.max_file_size_bytes {
        return Err(StagingError::SizeRejected {
            name: name.into(),
            limit: policy.max_file_size_bytes,
        });
    }
    Ok(())
}

/// Match by extension, exact content type, or `group/*` content-type pattern.
pub fn type_matches(name: &str, declared_content_type: &str, allowed: &AllowedTypes) -> bool {
    if matches!(allowed, AllowedTypes::Any) {
        return true;
    }

    let extension = extension_of(name);
    if !extension.is_empty() && allowed.contains(&extension) {
        return true;
    }

    let mime = declared_content_type.trim().to_ascii_lowercase();
    if mime.is_empty() {
        return false;
    }
    if allowed.contains(&mime) {
        return true;
    }
    match mime.split_once('/') {
        Some((group, _)) => allowed.contains(&format!("{group}/*")),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{check_file, is_admissible};
    use crate::error::StagingError;
    use crate::models::PolicySpec;

    fn policy(types: &str) -> PolicySpec {
        PolicySpec::new(types, 5, 1000)
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_admissible("Report.PDF", "", 10, &policy("pdf")));
        assert!(is_admissible("report.pdf", "", 10, &policy(".PDF")));
        assert!(!is_admissible("report.txt", "text/plain", 10, &policy(".pdf")));
    }

    #[test]
    fn mime_exact_and_group_patterns_match() {
        assert!(is_admissible("scan.bin", "image/png", 10, &policy("image/*")));
        assert!(is_admissible("notes", "Text/Plain", 10, &policy("text/plain")));
        assert!(!is_admissible("clip.mp4", "video/mp4", 10, &policy("image/*")));
    }

    #[test]
    fn empty_policy_only_checks_size() {
        assert!(is_admissible("anything.xyz", "", 1000, &policy("")));
        assert!(!is_admissible("anything.xyz", "", 1001, &policy("")));
    }

    #[test]
    fn list_of_empty_entries_admits_almost_nothing() {
        assert!(!is_admissible("a.pdf", "application/pdf", 10, &policy(",")));
        assert!(!is_admissible("README", "text/plain", 10, &policy(" , ")));
        assert!(is_admissible("draft.", "", 10, &policy(",")));
    }

    #[test]
    fn type_failure_wins_over_size_failure() {
        let err = check_file("huge.exe", "application/x-msdownload", 5000, &policy(".pdf"))
            .unwrap_err();

        assert_eq!(
            err,
            StagingError::TypeRejected {
                name: "huge.exe".into()
            }
        );
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(check_file("a.pdf", "application/pdf", 1000, &policy(".pdf")).is_ok());
        assert_eq!(
            check_file("a.pdf", "application/pdf", 1001, &policy(".pdf")).unwrap_err(),
            StagingError::SizeRejected {
                name: "a.pdf".into(),
                limit: 1000
            }
        );
    }

    proptest! {
        // Neither extension nor MIME type matches -> rejected by type.
        #[test]
        fn unmatched_type_is_always_rejected(stem in "[a-z]{1,8}", size in 0u64..2000) {
            let name = format!("{stem}.zzq");
            let err = check_file(&name, "application/x-zzq", size, &policy(".pdf, image/*"))
                .unwrap_err();
            prop_assert_eq!(err, StagingError::TypeRejected { name });
        }

        #[test]
        fn wildcard_admits_any_type_within_size(stem in "[a-z]{1,8}", ext in "[a-z]{1,4}", size in 0u64..=1000) {
            let name = format!("{stem}.{ext}");
            prop_assert!(is_admissible(&name, "application/octet-stream", size, &policy("*")));
        }
    }
}
