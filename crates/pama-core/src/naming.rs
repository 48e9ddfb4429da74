//! Patch and project naming
//!
//! Derives patch tags and project names from email subjects such as
//! `[PATCH aerc v3 2/3] notmuch: fix query`, and generates unique names.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use regex::Regex;
use uuid::Uuid;

/// Version used when a subject carries no `vN` token.
const DEFAULT_VERSION: &str = "v1";

static PROJECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(RFC|DRAFT|[Dd]raft)*\s*(PATCH|[Pp]atch)\s+([^\s\]]+)\s*[vV]*[0-9/]*\s*\] ")
        .unwrap()
});

/// Propose patch tags for a batch of email subjects.
///
/// Each bracketed subject yields `<word after the bracket>_<version>`.
/// Subjects without brackets, and tags that collide with `existing`, are
/// skipped. The result is deduplicated and sorted.
pub fn propose_patch_names<E, S>(existing: &[E], subjects: &[S]) -> Vec<String>
where
    E: AsRef<str>,
    S: AsRef<str>,
{
    let mut names = BTreeSet::new();
    for subject in subjects {
        let Some((tag, version)) = parse_subject(subject.as_ref()) else {
            continue;
        };
        if tag.is_empty() {
            continue;
        }
        let version = version.unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let name = format!("{tag}_{version}").replace(' ', "");
        if existing.iter().any(|e| e.as_ref() == name) {
            continue;
        }
        names.insert(name);
    }
    names.into_iter().collect()
}

/// Split a subject into its raw tag and optional lowercase version token.
fn parse_subject(subject: &str) -> Option<(String, Option<String>)> {
    let start = subject.find('[')?;
    let rest = &subject[start + 1..];
    let end = rest.find(']')?;

    let version = rest[..end]
        .split_whitespace()
        .map(str::to_lowercase)
        .find(|token| is_version(token));

    let tag = rest[end + 1..]
        .trim()
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != ':')
        .collect();

    Some((tag, version))
}

fn is_version(token: &str) -> bool {
    token
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Project name from a patch subject like `[RFC PATCH aerc v2 1/3] ...`.
pub fn project_from_subject(subject: &str) -> Option<&str> {
    PROJECT_PATTERN
        .captures(subject)
        .and_then(|caps| caps.get(3))
        .map(|m| m.as_str())
}

/// Short random url-safe token from 4 random bytes.
pub fn random_suffix() -> String {
    let uuid = Uuid::new_v4();
    URL_SAFE_NO_PAD.encode(&uuid.as_bytes()[..4])
}

/// Append a random suffix to `name`.
pub fn make_unique(name: &str) -> String {
    format!("{name}_{}", random_suffix())
}

/// Name of a worktree project split from `project` for `tag`.
pub fn worktree_name(project: &str, tag: &str) -> String {
    [project, "worktree", tag, &random_suffix()].join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_suffix_is_six_urlsafe_chars() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn make_unique_keeps_prefix() {
        let name = make_unique("notmuch_v3");
        assert!(name.starts_with("notmuch_v3_"));
        assert_ne!(make_unique("notmuch_v3"), name);
    }

    #[test]
    fn worktree_name_layout() {
        let name = worktree_name("aerc", "notmuch_v3");
        assert!(name.starts_with("aerc_worktree_notmuch_v3_"));
        assert_eq!(name.len(), "aerc_worktree_notmuch_v3_".len() + 6);
    }

    #[test]
    fn bare_v_is_not_a_version() {
        assert!(!is_version("v"));
        assert!(is_version("v12"));
        assert!(!is_version("v1a"));
    }
}
