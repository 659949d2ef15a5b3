//! Default schema reference data
//!
//! The names of the classes and attributes that ship with a stock Active
//! Directory forest. Anything enumerated from a live schema that is not in
//! these sets was added by an extension (Exchange, SCCM, LAPS, in-house apps).

use once_cell::sync::Lazy;
use std::collections::HashSet;

const DEFAULT_CLASSES: &str = include_str!("../../data/default_classes.txt");
const DEFAULT_ATTRIBUTES: &str = include_str!("../../data/default_attributes.txt");

static BUILTIN: Lazy<ReferenceSet> = Lazy::new(|| {
    let set = ReferenceSet::from_names(parse_names(DEFAULT_CLASSES), parse_names(DEFAULT_ATTRIBUTES));
    tracing::trace!(
        classes = set.classes.len(),
        attributes = set.attributes.len(),
        "Loaded built-in schema reference set"
    );
    set
});

/// One name per line; blank lines and `#` comments are skipped
fn parse_names(data: &'static str) -> impl Iterator<Item = &'static str> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Default class and attribute commonNames
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    classes: HashSet<String>,
    attributes: HashSet<String>,
}

impl ReferenceSet {
    /// The reference set compiled into the binary
    pub fn builtin() -> &'static ReferenceSet {
        &BUILTIN
    }

    pub fn from_names<C, A>(classes: C, attributes: A) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership
    pub fn is_default_class(&self, common_name: &str) -> bool {
        self.classes.contains(common_name)
    }

    /// Exact, case-sensitive membership
    pub fn is_default_attribute(&self, common_name: &str) -> bool {
        self.attributes.contains(common_name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_core_schema() {
        let reference = ReferenceSet::builtin();
        assert!(reference.is_default_class("User"));
        assert!(reference.is_default_class("Group-Policy-Container"));
        assert!(reference.is_default_attribute("SAM-Account-Name"));
        assert!(reference.is_default_attribute("GPC-File-Sys-Path"));
        assert!(!reference.is_default_class("user"));
        assert!(!reference.is_default_attribute("ms-Exch-Mailbox-Guid"));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let names: Vec<_> = parse_names("# header\n\nTop\n  Person  \n#Leaf\n").collect();
        assert_eq!(names, vec!["Top", "Person"]);

        let reference = ReferenceSet::builtin();
        assert!(!reference.is_default_class("# Default Active Directory schema classes (classSchema commonName values)"));
    }

    #[test]
    fn test_builtin_sizes() {
        let reference = ReferenceSet::builtin();
        assert!(reference.class_count() > 200);
        assert!(reference.attribute_count() > 1000);
    }
}
