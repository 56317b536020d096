//! Field-name conventions applied between code and tree.

use std::borrow::Cow;

use heck::{AsKebabCase, AsSnakeCase, AsTitleCase, AsUpperCamelCase};

/// How field identifiers are turned into wire keys.
///
/// Words are split at case boundaries, so `someFieldName`, `aURL` and
/// `aPList` split into `some field name`, `a url` and `a p list`. Leading
/// underscores are kept as they are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NamingPolicy {
    /// Keys are used as written.
    #[default]
    Identity,
    /// `someFieldName` → `SomeFieldName`
    UpperCamelCase,
    /// `someFieldName` → `Some Field Name`
    UpperCamelCaseWithSpaces,
    /// `someFieldName` → `some_field_name`
    SnakeCase,
    /// `someFieldName` → `some-field-name`
    KebabCase,
}

impl NamingPolicy {
    /// The wire key for `field`, borrowed when nothing changes.
    pub fn apply(self, field: &str) -> Cow<'_, str> {
        let body = field.trim_start_matches('_');
        let underscores = &field[..field.len() - body.len()];
        let converted = match self {
            NamingPolicy::Identity => return Cow::Borrowed(field),
            NamingPolicy::UpperCamelCase => format!("{underscores}{}", AsUpperCamelCase(body)),
            NamingPolicy::UpperCamelCaseWithSpaces => format!("{underscores}{}", AsTitleCase(body)),
            NamingPolicy::SnakeCase => format!("{underscores}{}", AsSnakeCase(body)),
            NamingPolicy::KebabCase => format!("{underscores}{}", AsKebabCase(body)),
        };
        if converted == field {
            Cow::Borrowed(field)
        } else {
            Cow::Owned(converted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case() {
        let policy = NamingPolicy::SnakeCase;
        assert_eq!(policy.apply("someFieldName"), "some_field_name");
        assert_eq!(policy.apply("_someFieldName"), "_some_field_name");
        assert_eq!(policy.apply("aURL"), "a_url");
        assert_eq!(policy.apply("aPList"), "a_p_list");
    }

    #[test]
    fn kebab_case() {
        assert_eq!(NamingPolicy::KebabCase.apply("someFieldName"), "some-field-name");
        assert_eq!(NamingPolicy::KebabCase.apply("__private"), "__private");
    }

    #[test]
    fn upper_camel_case() {
        assert_eq!(NamingPolicy::UpperCamelCase.apply("someFieldName"), "SomeFieldName");
        assert_eq!(
            NamingPolicy::UpperCamelCaseWithSpaces.apply("someFieldName"),
            "Some Field Name"
        );
    }

    #[test]
    fn identity_and_unchanged_names_borrow() {
        assert!(matches!(NamingPolicy::Identity.apply("someFieldName"), Cow::Borrowed(_)));
        assert!(matches!(NamingPolicy::SnakeCase.apply("already_snake"), Cow::Borrowed(_)));
        assert!(matches!(NamingPolicy::SnakeCase.apply("camelCase"), Cow::Owned(_)));
    }
}
