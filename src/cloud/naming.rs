//! Organization naming rules and deterministic name derivation

pub const MAX_ORGANIZATION_NAME_LEN: usize = 50;

/// Checks an organization name; returns the reason it is rejected
pub fn organization_name_problem(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("Organization name cannot be empty".to_string());
    }
    if name.len() > MAX_ORGANIZATION_NAME_LEN {
        return Some(format!(
            "Organization name cannot be longer than {} characters",
            MAX_ORGANIZATION_NAME_LEN
        ));
    }
    if let Some(c) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Some(format!(
            "Organization name cannot contain '{}'; use letters, digits and hyphens",
            c
        ));
    }
    let first_last = [name.chars().next(), name.chars().last()];
    if first_last
        .iter()
        .flatten()
        .any(|c| !c.is_ascii_alphanumeric())
    {
        return Some("Organization name must start and end with a letter or digit".to_string());
    }
    None
}

/// Candidate organization name for a user with no organizations.
///
/// Pure function of its inputs: `<user>-<repository>` with disallowed
/// characters removed, hyphens collapsed and the result cut to the maximum length.
pub fn derive_organization_name(user_local_part: &str, repository_name: &str) -> String {
    let raw = format!("{}-{}", user_local_part.trim(), repository_name.trim());

    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = match c {
            '/' | '_' | '.' | ' ' => '-',
            c => c,
        };
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if c == '-' && !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    let mut slug: String = slug.chars().take(MAX_ORGANIZATION_NAME_LEN).collect();
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(organization_name_problem("contoso"), None);
        assert_eq!(organization_name_problem("jane-doe-shop42"), None);
    }

    #[test]
    fn test_invalid_names() {
        assert!(organization_name_problem("").is_some());
        assert!(organization_name_problem("-contoso").is_some());
        assert!(organization_name_problem("contoso-").is_some());
        assert!(organization_name_problem("con toso").is_some());
        assert!(organization_name_problem(&"a".repeat(51)).is_some());
    }

    #[test]
    fn test_derive_is_deterministic() {
        let first = derive_organization_name("jane.doe", "shop");
        let second = derive_organization_name("jane.doe", "shop");
        assert_eq!(first, second);
        assert_eq!(first, "jane-doe-shop");
    }

    #[test]
    fn test_derive_strips_invalid_characters() {
        assert_eq!(derive_organization_name("_jane", "my_repo!"), "jane-my-repo");
        assert_eq!(derive_organization_name("", "shop"), "shop");
    }

    #[test]
    fn test_derive_truncates() {
        let name = derive_organization_name(&"u".repeat(40), &"r".repeat(40));
        assert_eq!(name.len(), MAX_ORGANIZATION_NAME_LEN);
        assert_eq!(organization_name_problem(&name), None);
    }

    #[test]
    fn test_derive_can_produce_rejected_name() {
        // Non-ASCII user names slug away to nothing useful
        let name = derive_organization_name("日本", "");
        assert!(organization_name_problem(&name).is_some());
    }
}
