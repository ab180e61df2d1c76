//! Identifier case conversion and singular/plural forms.

use convert_case::{Case, Casing};

use crate::golang::infer_column_type;
use crate::inflect;

/// Identifier style applied to table and column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CasePolicy {
    #[default]
    Snake,
    Camel,
    ScreamingSnake,
    Kebab,
}

impl CasePolicy {
    pub const ALL: [CasePolicy; 4] = [
        CasePolicy::Snake,
        CasePolicy::Camel,
        CasePolicy::ScreamingSnake,
        CasePolicy::Kebab,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "snake_case" => Some(Self::Snake),
            "camelCase" => Some(Self::Camel),
            "screaming_snake_case" => Some(Self::ScreamingSnake),
            "kebab_case" => Some(Self::Kebab),
            _ => None,
        }
    }

    /// Like [`CasePolicy::from_str`], but unknown names fall back to snake_case.
    pub fn from_str_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snake => "snake_case",
            Self::Camel => "camelCase",
            Self::ScreamingSnake => "screaming_snake_case",
            Self::Kebab => "kebab_case",
        }
    }
}

/// Names of every supported policy, in declaration order.
pub fn allowed_case_names() -> Vec<&'static str> {
    CasePolicy::ALL.iter().map(|c| c.as_str()).collect()
}

/// Naming capabilities the pipeline depends on.
pub trait Naming {
    fn convert_case(&self, value: &str, target: CasePolicy) -> String;

    /// Plural (`pluralize == true`) or singular form of an identifier.
    fn count_form(&self, pluralize: bool, value: &str) -> String;

    /// Storage type label for a source type name.
    fn column_type(&self, source_type: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNaming;

impl Naming for DefaultNaming {
    fn convert_case(&self, value: &str, target: CasePolicy) -> String {
        convert_case(value, target)
    }

    fn count_form(&self, pluralize: bool, value: &str) -> String {
        count_form(pluralize, value)
    }

    fn column_type(&self, source_type: &str) -> String {
        infer_column_type(source_type)
    }
}

pub fn convert_case(value: &str, target: CasePolicy) -> String {
    match target {
        CasePolicy::Snake => value.to_case(Case::Snake),
        CasePolicy::Camel => value.to_case(Case::Camel),
        CasePolicy::ScreamingSnake => value.to_case(Case::Constant),
        CasePolicy::Kebab => value.to_case(Case::Kebab),
    }
}

/// Inflect the last word of `value`, keeping its separators and letter case.
pub fn count_form(pluralize: bool, value: &str) -> String {
    let (head, last) = split_last_word(value);
    if last.is_empty() {
        return value.to_string();
    }

    let lower = last.to_lowercase();
    let inflected = if pluralize {
        inflect::pluralize(&lower)
    } else {
        inflect::singularize(&lower)
    };

    format!("{}{}", head, restore_case(last, &inflected))
}

fn split_last_word(value: &str) -> (&str, &str) {
    if let Some(pos) = value.rfind(['_', '-']) {
        return value.split_at(pos + 1);
    }

    let chars: Vec<(usize, char)> = value.char_indices().collect();
    let mut start = 0;
    for i in 1..chars.len() {
        let (offset, c) = chars[i];
        if !c.is_uppercase() {
            continue;
        }
        let prev = chars[i - 1].1;
        let next_is_lower = chars.get(i + 1).is_some_and(|(_, n)| n.is_lowercase());
        if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
            start = offset;
        }
    }

    value.split_at(start)
}

fn restore_case(original: &str, inflected: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    let all_upper = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());

    if all_upper {
        return inflected.to_uppercase();
    }

    match original.chars().next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = inflected.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => inflected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_case() {
        assert_eq!(convert_case("SomeString", CasePolicy::Snake), "some_string");
        assert_eq!(convert_case("Some_string", CasePolicy::Camel), "someString");
        assert_eq!(convert_case("SomeString", CasePolicy::ScreamingSnake), "SOME_STRING");
        assert_eq!(convert_case("SomeString", CasePolicy::Kebab), "some-string");
        assert_eq!(convert_case("UserID", CasePolicy::Snake), "user_id");
    }

    #[test]
    fn test_convert_case_identity() {
        assert_eq!(convert_case("phone_number", CasePolicy::Snake), "phone_number");
        assert_eq!(convert_case("phoneNumber", CasePolicy::Camel), "phoneNumber");
        assert_eq!(convert_case("PHONE_NUMBER", CasePolicy::ScreamingSnake), "PHONE_NUMBER");
        assert_eq!(convert_case("phone-number", CasePolicy::Kebab), "phone-number");
    }

    #[test]
    fn test_case_policy_lenient_fallback() {
        assert_eq!(CasePolicy::from_str("invalid-case"), None);
        assert_eq!(CasePolicy::from_str_lenient("invalid-case"), CasePolicy::Snake);
        assert_eq!(
            convert_case("SomeString", CasePolicy::from_str_lenient("invalid-case")),
            "some_string"
        );
        for policy in CasePolicy::ALL {
            assert_eq!(CasePolicy::from_str(policy.as_str()), Some(policy));
        }
    }

    #[test]
    fn test_count_form_plain() {
        assert_eq!(count_form(false, "example"), "example");
        assert_eq!(count_form(true, "example"), "examples");
        assert_eq!(count_form(false, "examples"), "example");
        assert_eq!(count_form(true, "examples"), "examples");
    }

    #[test]
    fn test_count_form_keeps_style() {
        assert_eq!(count_form(true, "some_example"), "some_examples");
        assert_eq!(count_form(false, "some_examples"), "some_example");
        assert_eq!(count_form(true, "someExample"), "someExamples");
        assert_eq!(count_form(false, "someExamples"), "someExample");
        assert_eq!(count_form(true, "SOME_EXAMPLE"), "SOME_EXAMPLES");
        assert_eq!(count_form(false, "SOME_EXAMPLES"), "SOME_EXAMPLE");
        assert_eq!(count_form(true, "some-example"), "some-examples");
        assert_eq!(count_form(false, "some-examples"), "some-example");
        assert_eq!(count_form(true, "PhoneNumber"), "PhoneNumbers");
        assert_eq!(count_form(true, "User"), "Users");
        assert_eq!(count_form(true, "UserCategory"), "UserCategories");
    }

    #[test]
    fn test_count_form_idempotent() {
        for word in [
            "user",
            "Address",
            "phone_number",
            "CATEGORY",
            "city-person",
            "Status",
            "Alias",
            "Gas",
            "Atlas",
            "user_zombie",
        ] {
            let plural = count_form(true, word);
            assert_eq!(count_form(true, &plural), plural, "plural of {word}");
            let singular = count_form(false, word);
            assert_eq!(count_form(false, &singular), singular, "singular of {word}");
        }
    }

    #[test]
    fn test_count_form_singular_nouns_ending_in_s() {
        assert_eq!(count_form(false, "Alias"), "Alias");
        assert_eq!(count_form(true, "Alias"), "Aliases");
        assert_eq!(count_form(false, "Gas"), "Gas");
        assert_eq!(count_form(false, "Atlas"), "Atlas");
        assert_eq!(count_form(false, "zombies"), "zombie");
        assert_eq!(count_form(false, "FuelGases"), "FuelGas");
    }

    #[test]
    fn test_split_last_word() {
        assert_eq!(split_last_word("someExample"), ("some", "Example"));
        assert_eq!(split_last_word("HTTPServer"), ("HTTP", "Server"));
        assert_eq!(split_last_word("user"), ("", "user"));
        assert_eq!(split_last_word("a_b-c"), ("a_b-", "c"));
    }

    #[test]
    fn test_default_naming_column_type() {
        assert_eq!(DefaultNaming.column_type("time.Time"), "datetime");
        assert_eq!(DefaultNaming.column_type("string"), "varchar");
    }
}
