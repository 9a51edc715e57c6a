use std::fmt;

pub const RUN_SUFFIX_LEN: usize = 5;

/// Random tag that keeps generated names distinct across runs.
///
/// Created once at process start and handed to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunSuffix(String);

impl RunSuffix {
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        Self(simple.chars().take(RUN_SUFFIX_LEN).collect())
    }

    /// Fixed suffix; `None` unless `value` is exactly five lowercase letters or digits
    pub fn fixed(value: &str) -> Option<Self> {
        let valid = value.len() == RUN_SUFFIX_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase());
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shape() {
        let suffix = RunSuffix::generate();
        assert_eq!(suffix.as_str().len(), RUN_SUFFIX_LEN);
        assert!(RunSuffix::fixed(suffix.as_str()).is_some());
    }

    #[test]
    fn test_fixed_validation() {
        assert!(RunSuffix::fixed("ab12c").is_some());
        assert!(RunSuffix::fixed("AB12C").is_none());
        assert!(RunSuffix::fixed("ab12").is_none());
        assert!(RunSuffix::fixed("ab-12").is_none());
    }
}
