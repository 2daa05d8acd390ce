//! Call arguments for record construction
//!
//! `Arguments` carries positional values and keyword values in the order
//! they were supplied. The `args!` macro builds one from call-like syntax:
//!
//! ```ignore
//! let a = args!["ACME", 50, price = 91.1];
//! ```

use serde_json::{Map, Value};

/// Positional and keyword arguments for one constructor call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds arguments from a JSON array and a JSON object.
    pub fn from_json(positional: Vec<Value>, keywords: Map<String, Value>) -> Self {
        Self {
            positional,
            keywords: keywords.into_iter().collect(),
        }
    }

    /// Adds a positional argument.
    pub fn positional(mut self, value: impl Into<Value>) -> Self {
        self.push_positional(value);
        self
    }

    /// Adds a keyword argument.
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_keyword(name, value);
        self
    }

    pub fn push_positional(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Adds a keyword argument. Supplying the same name twice is reported
    /// when the arguments are bound.
    pub fn push_keyword(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.keywords.push((name.into(), value.into()));
    }

    pub fn positional_values(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword_values(&self) -> &[(String, Value)] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_parts(self) -> (Vec<Value>, Vec<(String, Value)>) {
        (self.positional, self.keywords)
    }
}

/// Builds [`Arguments`](crate::Arguments) with call-like syntax.
///
/// Bare expressions are positional; `name = expr` is a keyword argument.
#[macro_export]
macro_rules! args {
    () => {
        $crate::Arguments::new()
    };
    ($($tokens:tt)+) => {{
        let mut arguments = $crate::Arguments::new();
        $crate::__push_args!(arguments; $($tokens)+);
        arguments
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __push_args {
    ($arguments:ident;) => {};
    ($arguments:ident; $name:ident = $value:expr $(, $($rest:tt)*)?) => {
        $arguments.push_keyword(stringify!($name), $value);
        $( $crate::__push_args!($arguments; $($rest)*); )?
    };
    ($arguments:ident; $value:expr $(, $($rest:tt)*)?) => {
        $arguments.push_positional($value);
        $( $crate::__push_args!($arguments; $($rest)*); )?
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_macro_positional_and_keyword() {
        let a = crate::args!["ACME", 50, price = 91.1];
        assert_eq!(a.positional_values(), &[json!("ACME"), json!(50)]);
        assert_eq!(a.keyword_values(), &[("price".to_string(), json!(91.1))]);
    }

    #[test]
    fn test_macro_trailing_comma_and_empty() {
        let a = crate::args![1, 2,];
        assert_eq!(a.len(), 2);
        assert!(crate::args![].is_empty());
    }

    #[test]
    fn test_macro_keyword_only() {
        let a = crate::args![c = 3, a = 1, b = 2];
        let names: Vec<&str> = a.keyword_values().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_macro_accepts_variables() {
        let shares = 75;
        let a = crate::args![shares, price = shares * 2];
        assert_eq!(a.positional_values(), &[json!(75)]);
        assert_eq!(a.keyword_values()[0].1, json!(150));
    }

    #[test]
    fn test_builder_methods() {
        let a = Arguments::new().positional("ACME").keyword("shares", 50);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let mut kwargs = Map::new();
        kwargs.insert("price".into(), json!(91.1));
        let a = Arguments::from_json(vec![json!("ACME")], kwargs);
        assert_eq!(a.positional_values().len(), 1);
        assert_eq!(a.keyword_values().len(), 1);
    }
}
