//! Image reference and identifier helpers.

/// Number of characters shown for short container and image IDs.
pub const SHORT_ID_LEN: usize = 12;

/// Split an image reference into repository and tag.
///
/// The tag is whatever follows the last `:` after the final `/`, so a
/// registry port (`localhost:5000/app`) is not mistaken for a tag. Digest
/// references (`app@sha256:...`) have no tag.
pub fn split_repo_tag(reference: &str) -> (&str, Option<&str>) {
    if reference.contains('@') {
        return (reference, None);
    }
    let name_start = reference.rfind('/').map(|i| i + 1).unwrap_or(0);
    match reference[name_start..].rfind(':') {
        Some(i) => {
            let split = name_start + i;
            (&reference[..split], Some(&reference[split + 1..]))
        }
        None => (reference, None),
    }
}

/// First 12 characters of a container ID.
pub fn short_container_id(id: &str) -> &str {
    truncate(id, SHORT_ID_LEN)
}

/// Last `:`-separated segment of an image digest, truncated to 12 characters.
pub fn short_image_id(id: &str) -> &str {
    let digest = id.rsplit(':').next().unwrap_or(id);
    truncate(digest, SHORT_ID_LEN)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_tag() {
        assert_eq!(split_repo_tag("app:v1"), ("app", Some("v1")));
        assert_eq!(split_repo_tag("ubuntu"), ("ubuntu", None));
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        assert_eq!(split_repo_tag("localhost:5000/app"), ("localhost:5000/app", None));
        assert_eq!(
            split_repo_tag("localhost:5000/team/app:2.1"),
            ("localhost:5000/team/app", Some("2.1"))
        );
    }

    #[test]
    fn digest_reference_has_no_tag() {
        let r = "alpine@sha256:0123456789abcdef";
        assert_eq!(split_repo_tag(r), (r, None));
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_container_id("4f66ad9a0b2e8f3c1d"), "4f66ad9a0b2e");
        assert_eq!(short_container_id("abc"), "abc");
        assert_eq!(
            short_image_id("sha256:9c7a54a9a43cca047013b82af109fe963fde787f63f9e016fdc3384500c2823d"),
            "9c7a54a9a43c"
        );
        assert_eq!(short_image_id("deadbeef"), "deadbeef");
    }
}
