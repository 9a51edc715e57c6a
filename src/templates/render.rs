//! `{{ key }}` placeholder substitution
//!
//! Placeholders prefixed with `$` (`${{ ... }}`) belong to the target pipeline
//! language and are left untouched.

use anyhow::{bail, Result};
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\$?)\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
    })
}

/// Replaces every placeholder with its value; fails listing the keys that have none
pub fn render_placeholders(body: &str, values: &[(&str, String)]) -> Result<String> {
    let mut missing = BTreeSet::new();

    let rendered = placeholder_regex().replace_all(body, |caps: &Captures| {
        if !caps[1].is_empty() {
            return caps[0].to_string();
        }
        let key = &caps[2];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => value.clone(),
            None => {
                missing.insert(key.to_string());
                caps[0].to_string()
            }
        }
    });

    if !missing.is_empty() {
        let keys: Vec<_> = missing.into_iter().collect();
        bail!("Template references values that are not known yet: {}", keys.join(", "));
    }
    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<(&'static str, String)> {
        vec![
            ("branch", "main".to_string()),
            ("serviceConnection", "AZURE_CREDENTIALS_AB12C".to_string()),
        ]
    }

    #[test]
    fn test_replaces_with_flexible_spacing() {
        let out = render_placeholders("on: [{{branch}}] or {{  branch }}", &values()).unwrap();
        assert_eq!(out, "on: [main] or main");
    }

    #[test]
    fn test_leaves_workflow_expressions() {
        let out = render_placeholders(
            "creds: ${{ secrets.{{ serviceConnection }} }} sha: ${{ github }}",
            &values(),
        )
        .unwrap();
        assert_eq!(
            out,
            "creds: ${{ secrets.AZURE_CREDENTIALS_AB12C }} sha: ${{ github }}"
        );
    }

    #[test]
    fn test_missing_values_reported() {
        let err = render_placeholders("{{ resourceName }} {{ branch }} {{ subscriptionId }}", &values())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Template references values that are not known yet: resourceName, subscriptionId"
        );
    }
}
