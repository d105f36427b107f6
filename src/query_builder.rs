//! Filter expression builder for the card API's `q` parameter.
//!
//! The API accepts a Lucene-style filter string: `field:value` terms joined
//! by spaces (AND semantics), `OR` groups in parentheses, values containing
//! whitespace quoted, and `*` as a trailing wildcard. Builder methods return
//! `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use pokemontcg_sdk::QueryBuilder;
//! let q = QueryBuilder::new()
//!     .name_prefix("pika")
//!     .any_of("rarity", &["Rare Holo", "Rare"])
//!     .build();
//! assert_eq!(q, r#"name:pika* (rarity:"Rare Holo" OR rarity:Rare)"#);
//! ```

/// Builds filter expressions for the API's `q` parameter.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    terms: Vec<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a prefix-match term: `field:value*`.
    ///
    /// Values containing whitespace are quoted with the wildcard inside the
    /// quotes, which is the form the API expects for phrase prefixes.
    pub fn prefix(&mut self, field: &str, value: &str) -> &mut Self {
        if value.contains(char::is_whitespace) {
            self.terms.push(format!("{}:\"{}*\"", field, value));
        } else {
            self.terms.push(format!("{}:{}*", field, value));
        }
        self
    }

    /// Add a name prefix term (the free-text search box).
    pub fn name_prefix(&mut self, value: &str) -> &mut Self {
        self.prefix("name", value)
    }

    /// Add an exact-match term: `field:value`.
    pub fn field_eq(&mut self, field: &str, value: &str) -> &mut Self {
        self.terms.push(format!("{}:{}", field, quote(value)));
        self
    }

    /// Add an OR group over one field: `(field:a OR field:b)`.
    ///
    /// A single value degenerates to a plain term; an empty list adds
    /// nothing.
    pub fn any_of(&mut self, field: &str, values: &[&str]) -> &mut Self {
        match values {
            [] => self,
            [single] => self.field_eq(field, single),
            _ => {
                let parts: Vec<String> = values
                    .iter()
                    .map(|v| format!("{}:{}", field, quote(v)))
                    .collect();
                self.terms.push(format!("({})", parts.join(" OR ")));
                self
            }
        }
    }

    /// Add a raw, pre-formatted term verbatim.
    pub fn raw(&mut self, term: &str) -> &mut Self {
        self.terms.push(term.to_string());
        self
    }

    /// Whether any terms have been added.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Build the final expression, terms joined with spaces.
    pub fn build(&self) -> String {
        self.terms.join(" ")
    }
}

fn quote(value: &str) -> String {
    if value.contains(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}
