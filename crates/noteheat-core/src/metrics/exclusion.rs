//! Folder exclusion rules.

/// Folder prefixes whose documents are skipped entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    folders: Vec<String>,
}

impl ExclusionRules {
    /// Parse a comma-separated folder list; blank entries are dropped.
    pub fn parse(list: &str) -> Self {
        let folders = list
            .split(',')
            .map(str::trim)
            .filter(|folder| !folder.is_empty())
            .map(str::to_string)
            .collect();
        Self { folders }
    }

    /// True when `path` is a rule or lies below one.
    pub fn excludes(&self, path: &str) -> bool {
        self.folders.iter().any(|folder| {
            path == folder
                || path
                    .strip_prefix(folder.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        let rules = ExclusionRules::parse(" Templates , ,Assets/Images,,");
        assert_eq!(rules.folders(), ["Templates", "Assets/Images"]);
        assert!(ExclusionRules::parse("  , ").is_empty());
    }

    #[test]
    fn test_prefix_boundary() {
        let rules = ExclusionRules::parse("F");
        assert!(rules.excludes("F"));
        assert!(rules.excludes("F/note.md"));
        assert!(rules.excludes("F/deep/er.md"));
        assert!(!rules.excludes("Foo"));
        assert!(!rules.excludes("Foo/note.md"));
        assert!(!rules.excludes("G/F/note.md"));
    }

    #[test]
    fn test_nested_rule() {
        let rules = ExclusionRules::parse("Assets/Images");
        assert!(rules.excludes("Assets/Images/cat.md"));
        assert!(!rules.excludes("Assets/notes.md"));
    }

    #[test]
    fn test_empty_rules_exclude_nothing() {
        let rules = ExclusionRules::default();
        assert!(!rules.excludes(""));
        assert!(!rules.excludes("anything.md"));
    }
}
