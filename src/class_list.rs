//! Class-list flattening.
//!
//! Turns heterogeneous class inputs (single strings, slices, nested vectors,
//! optional classes, displayable values) into one ordered list of class tokens.
//! Every candidate is split on whitespace, so a stored token is never empty and
//! never contains whitespace. Order is preserved and duplicates are kept.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Ordered accumulator of class tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one candidate string. Whitespace-only candidates contribute nothing.
    pub fn push(&mut self, candidate: &str) {
        self.tokens
            .extend(candidate.split_whitespace().map(str::to_string));
    }

    /// Append any class-like input, recursing into nested sequences.
    pub fn add<C: ClassLike + ?Sized>(&mut self, input: &C) -> &mut Self {
        input.push_into(self);
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Join the tokens with single spaces.
    pub fn join(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}

/// Anything that can contribute class tokens to a [`ClassList`].
pub trait ClassLike {
    fn push_into(&self, out: &mut ClassList);
}

impl ClassLike for str {
    fn push_into(&self, out: &mut ClassList) {
        out.push(self);
    }
}

impl ClassLike for String {
    fn push_into(&self, out: &mut ClassList) {
        out.push(self);
    }
}

impl ClassLike for Cow<'_, str> {
    fn push_into(&self, out: &mut ClassList) {
        out.push(self);
    }
}

impl<T: ClassLike + ?Sized> ClassLike for &T {
    fn push_into(&self, out: &mut ClassList) {
        (**self).push_into(out);
    }
}

impl<T: ClassLike> ClassLike for [T] {
    fn push_into(&self, out: &mut ClassList) {
        for item in self {
            item.push_into(out);
        }
    }
}

impl<T: ClassLike, const N: usize> ClassLike for [T; N] {
    fn push_into(&self, out: &mut ClassList) {
        self.as_slice().push_into(out);
    }
}

impl<T: ClassLike> ClassLike for Vec<T> {
    fn push_into(&self, out: &mut ClassList) {
        self.as_slice().push_into(out);
    }
}

/// `None` contributes nothing, which makes conditional classes cheap to write.
impl<T: ClassLike> ClassLike for Option<T> {
    fn push_into(&self, out: &mut ClassList) {
        if let Some(inner) = self {
            inner.push_into(out);
        }
    }
}

impl ClassLike for ClassList {
    fn push_into(&self, out: &mut ClassList) {
        out.tokens.extend(self.tokens.iter().cloned());
    }
}

/// Wraps any displayable value so its text is used as a class candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text<T>(pub T);

impl<T: fmt::Display> ClassLike for Text<T> {
    fn push_into(&self, out: &mut ClassList) {
        out.push(&self.0.to_string());
    }
}

/// Owned, arbitrarily nested class input.
///
/// Deserializes from either a string or a (nested) list of strings, so config
/// files can spell a fragment either way. `null` is an empty fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClassInput {
    Text(String),
    List(Vec<ClassInput>),
}

impl<'de> Deserialize<'de> for ClassInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            List(Vec<ClassInput>),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(text)) => ClassInput::Text(text),
            Some(Raw::List(items)) => ClassInput::List(items),
            None => ClassInput::default(),
        })
    }
}

impl Default for ClassInput {
    fn default() -> Self {
        ClassInput::Text(String::new())
    }
}

impl ClassLike for ClassInput {
    fn push_into(&self, out: &mut ClassList) {
        match self {
            ClassInput::Text(text) => out.push(text),
            ClassInput::List(items) => items.push_into(out),
        }
    }
}

impl From<&str> for ClassInput {
    fn from(value: &str) -> Self {
        ClassInput::Text(value.to_string())
    }
}

impl From<String> for ClassInput {
    fn from(value: String) -> Self {
        ClassInput::Text(value)
    }
}

impl<T: Into<ClassInput>> From<Vec<T>> for ClassInput {
    fn from(items: Vec<T>) -> Self {
        ClassInput::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ClassInput>, const N: usize> From<[T; N]> for ClassInput {
    fn from(items: [T; N]) -> Self {
        ClassInput::List(items.into_iter().map(Into::into).collect())
    }
}

/// Flatten an input into its ordered class tokens.
pub fn tokens<C: ClassLike + ?Sized>(input: &C) -> Vec<String> {
    let mut list = ClassList::new();
    list.add(input);
    list.into_tokens()
}

/// Flatten an input and join its tokens with single spaces.
pub fn join<C: ClassLike + ?Sized>(input: &C) -> String {
    let mut list = ClassList::new();
    list.add(input);
    list.join()
}

/// Join heterogeneous class arguments into one class string.
///
/// ```
/// use class_variants::cx;
///
/// let active = true;
/// let classes = cx!("btn", ["px-4", "py-2"], active.then_some("btn--active"), "");
/// assert_eq!(classes, "btn px-4 py-2 btn--active");
/// ```
#[macro_export]
macro_rules! cx {
    () => {
        ::std::string::String::new()
    };
    ($($input:expr),+ $(,)?) => {{
        let mut list = $crate::ClassList::new();
        $( list.add(&$input); )+
        list.join()
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(join(&empty), "");
        assert_eq!(cx!(), "");
    }

    #[test]
    fn test_single_and_multiple() {
        assert_eq!(cx!("foo"), "foo");
        assert_eq!(cx!("foo", "bar"), "foo bar");
    }

    #[test]
    fn test_empty_tokens_dropped() {
        assert_eq!(cx!("a", "", "b"), "a b");
        assert_eq!(cx!("", "   ", "\t\n"), "");
    }

    #[test]
    fn test_nested_sequences_flatten() {
        let nested = vec![vec!["d"], vec!["e", "f"]];
        assert_eq!(cx!("a", ["b", "c"], nested), "a b c d e f");
    }

    #[test]
    fn test_class_input_deep_nesting() {
        let input = ClassInput::List(vec![
            "qux".into(),
            ClassInput::List(vec![ClassInput::List(vec!["quux".into(), "corge".into()])]),
        ]);
        assert_eq!(cx!("foo", vec!["bar", "baz"], input), "foo bar baz qux quux corge");
    }

    #[test]
    fn test_duplicates_preserved() {
        assert_eq!(cx!("a", "b", "a"), "a b a");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(cx!("  a   b ", " c"), "a b c");
        assert_eq!(tokens("  p-4\tm-2  "), vec!["p-4", "m-2"]);
    }

    #[test]
    fn test_optional_classes() {
        let disabled = false;
        let focused = true;
        let classes = cx!(
            "input",
            disabled.then_some("input--disabled"),
            focused.then_some("input--focused")
        );
        assert_eq!(classes, "input input--focused");
    }

    #[test]
    fn test_displayable_values() {
        struct Size(u8);
        impl fmt::Display for Size {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "size-{}", self.0)
            }
        }

        assert_eq!(cx!("icon", Text(Size(4)), Text(12)), "icon size-4 12");
    }

    #[test]
    fn test_class_input_null_is_empty() {
        let missing: ClassInput = serde_json::from_str("null").unwrap();
        assert_eq!(missing, ClassInput::default());

        let nested: ClassInput = serde_json::from_str(r#"["a", null, ["b"]]"#).unwrap();
        assert_eq!(join(&nested), "a b");
    }

    #[test]
    fn test_class_input_deserializes_string_or_list() {
        let single: ClassInput = serde_json::from_str(r#""a b""#).unwrap();
        assert_eq!(join(&single), "a b");

        let nested: ClassInput = serde_json::from_str(r#"["a", ["b", ["c"]]]"#).unwrap();
        assert_eq!(join(&nested), "a b c");
    }
}
