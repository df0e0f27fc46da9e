use std::collections::BTreeSet;
use std::path::Path;

/// Splits a file name into stem and extension. The extension keeps its
/// leading dot; dotfiles like `.bashrc` and names ending in a bare dot have
/// no extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => name.split_at(pos),
        _ => (name, ""),
    }
}

/// Lowercases and strips leading dots. Empty input means "no extension".
pub fn normalize_extension(raw: &str) -> Option<String> {
    let ext = raw.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Normalizes each entry and drops empty ones. Returns `None` when nothing
/// usable remains, which disables filtering.
pub fn normalize_filter<I, S>(items: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: BTreeSet<String> = items
        .into_iter()
        .filter_map(|item| normalize_extension(item.as_ref()))
        .collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/// Case-insensitive membership test against an already-normalized filter.
pub fn matches_filter(path: &Path, filter: Option<&BTreeSet<String>>) -> bool {
    let Some(filter) = filter else {
        return true;
    };

    let name = path
        .file_name()
        .map(|v| v.to_string_lossy())
        .unwrap_or_default();
    let (_, ext) = split_name(&name);
    normalize_extension(ext)
        .map(|ext| filter.contains(&ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_uses_last_dot() {
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("photo.JPG"), ("photo", ".JPG"));
    }

    #[test]
    fn split_name_handles_missing_extension() {
        assert_eq!(split_name("README"), ("README", ""));
        assert_eq!(split_name(".bashrc"), (".bashrc", ""));
        assert_eq!(split_name("trailing."), ("trailing.", ""));
        assert_eq!(split_name(""), ("", ""));
    }

    #[test]
    fn normalize_extension_strips_dots_and_lowercases() {
        assert_eq!(normalize_extension(".JPG"), Some("jpg".to_string()));
        assert_eq!(normalize_extension("..Png"), Some("png".to_string()));
        assert_eq!(normalize_extension("."), None);
        assert_eq!(normalize_extension(""), None);
    }

    #[test]
    fn filter_parsing_drops_empty_entries() {
        let filter = normalize_filter(".jpg, PNG,,".split(',')).expect("filter");
        assert_eq!(
            filter.into_iter().collect::<Vec<_>>(),
            vec!["jpg".to_string(), "png".to_string()]
        );
        assert!(normalize_filter(",".split(',')).is_none());
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let filter = normalize_filter(["jpg", "png"]);
        assert!(matches_filter(Path::new("a.jpg"), filter.as_ref()));
        assert!(matches_filter(Path::new("c.PNG"), filter.as_ref()));
        assert!(!matches_filter(Path::new("b.txt"), filter.as_ref()));
        assert!(!matches_filter(Path::new("d"), filter.as_ref()));
    }

    #[test]
    fn missing_filter_accepts_everything() {
        assert!(matches_filter(Path::new("d"), None));
        assert!(matches_filter(Path::new("b.txt"), None));
    }
}
