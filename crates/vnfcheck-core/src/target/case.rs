//! Declarative test case fields and their enumerated accessors.

use std::collections::BTreeMap;
use std::fmt;
use vnfcheck_proto::{Error, Result};

/// Named fields of a test case, for the tabular bulk-set path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Context,
    Entity,
    Property,
    Matcher,
    Value,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Context,
        Field::Entity,
        Field::Property,
        Field::Matcher,
        Field::Value,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Context => "context",
            Field::Entity => "entity",
            Field::Property => "property",
            Field::Matcher => "matcher",
            Field::Value => "value",
        }
    }

    /// Resolves a field by name; unknown names fail so fixture typos
    /// surface instead of silently dropping a column.
    pub fn from_name(name: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::Validation(format!("unknown test case field \"{name}\"")))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declarative test case: entity, property, matcher, expected value,
/// and an optional context scoping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    pub context: String,
    pub entity: String,
    pub property: String,
    pub matcher: String,
    pub value: String,
}

impl TestCase {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Context => &self.context,
            Field::Entity => &self.entity,
            Field::Property => &self.property,
            Field::Matcher => &self.matcher,
            Field::Value => &self.value,
        }
    }

    /// Sets a field, trimming surrounding whitespace, quotes, and
    /// newlines from fixture input.
    pub fn set(&mut self, field: Field, value: &str) {
        let normalized = value
            .trim_matches(|c: char| c == ' ' || c == '"' || c == '\'' || c == '\n')
            .to_string();
        match field {
            Field::Context => self.context = normalized,
            Field::Entity => self.entity = normalized,
            Field::Property => self.property = normalized,
            Field::Matcher => self.matcher = normalized,
            Field::Value => self.value = normalized,
        }
    }

    /// Bulk-set from tabular fixture entries; unknown keys fail.
    pub fn set_from_map<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in entries {
            self.set(Field::from_name(key)?, value);
        }
        Ok(())
    }

    pub fn as_map(&self) -> BTreeMap<&'static str, &str> {
        Field::ALL.into_iter().map(|f| (f.name(), self.get(f))).collect()
    }

    /// Names of required fields that are still empty.
    pub fn missing_fields(&self, required: &[Field]) -> Vec<&'static str> {
        required
            .iter()
            .filter(|f| self.get(**f).is_empty())
            .map(|f| f.name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_normalizes_fixture_input() {
        let mut case = TestCase::default();
        case.set(Field::Entity, " \"www.google.com\"\n");
        case.set(Field::Value, "'reachable'");

        assert_eq!(case.entity, "www.google.com");
        assert_eq!(case.value, "reachable");
    }

    #[test]
    fn bulk_set_round_trips_through_the_map() {
        let mut case = TestCase::default();
        case.set_from_map([
            ("entity", "www.google.com"),
            ("property", "www.google.com"),
            ("matcher", "is"),
            ("value", "reachable"),
        ])
        .unwrap();

        let map = case.as_map();
        assert_eq!(map["entity"], "www.google.com");
        assert_eq!(map["matcher"], "is");
        assert_eq!(map["context"], "");
    }

    #[test]
    fn unknown_field_names_fail() {
        let mut case = TestCase::default();
        let err = case.set_from_map([("entitty", "oops")]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_fields_reports_empty_required_fields() {
        let mut case = TestCase::default();
        case.set(Field::Entity, "80");

        let missing = case.missing_fields(&[
            Field::Entity,
            Field::Property,
            Field::Matcher,
            Field::Value,
        ]);
        assert_eq!(missing, vec!["property", "matcher", "value"]);
    }
}
