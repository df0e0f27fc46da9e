use crate::extension::{normalize_extension, normalize_filter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Immutable per-run configuration. Build it once with the `with_*` methods,
/// which normalize their input, then hand it to the engine by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOptions {
    pub prefix: String,
    pub suffix: String,
    pub add_number: bool,
    /// Lowercase, without the leading dot.
    pub new_extension: Option<String>,
    pub pattern: Option<String>,
    pub recursive: bool,
    /// Lowercase extensions without dots. `None` disables filtering.
    pub extension_filter: Option<BTreeSet<String>>,
    pub dry_run: bool,
    pub sanitize: bool,
}

impl RenameOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_numbering(mut self, add_number: bool) -> Self {
        self.add_number = add_number;
        self
    }

    pub fn with_new_extension(mut self, ext: &str) -> Self {
        self.new_extension = normalize_extension(ext);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.pattern = (!pattern.is_empty()).then_some(pattern);
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_extension_filter<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extension_filter = normalize_filter(extensions);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_normalize_extension_inputs() {
        let options = RenameOptions::default()
            .with_new_extension(".JPEG")
            .with_extension_filter([".JPG", "png", ""]);
        assert_eq!(options.new_extension.as_deref(), Some("jpeg"));
        let filter = options.extension_filter.expect("filter");
        assert!(filter.contains("jpg"));
        assert!(filter.contains("png"));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn empty_values_mean_absent() {
        let options = RenameOptions::default()
            .with_new_extension("")
            .with_pattern("")
            .with_extension_filter(Vec::<String>::new());
        assert!(options.new_extension.is_none());
        assert!(options.pattern.is_none());
        assert!(options.extension_filter.is_none());
    }
}
