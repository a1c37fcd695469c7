//! Escaping and validation helpers for values that end up in SOQL text,
//! URL paths or XML bodies.
//!
//! ## SOQL
//!
//! Query text is placed into the request URL as given. The URL parser
//! percent-encodes spaces, but reserved characters (`&`, `+`, `#`) inside
//! literals must be encoded by the caller. Escape user-provided literals
//! first:
//!
//! ```rust
//! use sfsoql_client::security::soql;
//!
//! let name = soql::escape_string("O'Brien");
//! let query = format!("SELECT Id FROM Account WHERE Name = '{}'", name);
//! assert_eq!(query, "SELECT Id FROM Account WHERE Name = 'O\\'Brien'");
//!
//! // Fully encoded form, for callers that only need the raw JSON result
//! let encoded = soql::encode_query(&query);
//! assert!(!encoded.contains(' '));
//! ```
//!
//! ## URL path segments
//!
//! ```rust
//! use sfsoql_client::security::url;
//!
//! let encoded_id = url::encode_param("001/test");
//! assert_eq!(encoded_id, "001%2Ftest");
//! ```

/// SOQL escaping utilities for injection prevention.
pub mod soql {
    /// Escape a string value for use in SOQL string literals.
    ///
    /// - Single quotes (`'`) are escaped to (`\'`)
    /// - Backslashes (`\`) are escaped to (`\\`)
    /// - Newlines, carriage returns and tabs become `\n`, `\r`, `\t`
    ///
    /// ```rust
    /// use sfsoql_client::security::soql;
    ///
    /// assert_eq!(soql::escape_string("O'Brien & Co."), "O\\'Brien & Co.");
    /// ```
    #[must_use]
    pub fn escape_string(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '\'' => escaped.push_str("\\'"),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Percent-encode complete SOQL text for the `q=` query parameter.
    #[must_use]
    pub fn encode_query(soql: &str) -> String {
        urlencoding::encode(soql).into_owned()
    }

    /// Validate that a field name contains only safe characters.
    ///
    /// Field names start with a letter and otherwise contain only ASCII
    /// alphanumerics and underscores (which covers `__c` / `__r` suffixes).
    ///
    /// ```rust
    /// use sfsoql_client::security::soql;
    ///
    /// assert!(soql::is_safe_field_name("Custom_Field__c"));
    /// assert!(!soql::is_safe_field_name("Bad'; DROP TABLE--"));
    /// ```
    #[must_use]
    pub fn is_safe_field_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    /// Validate that a SObject name is safe.
    ///
    /// SObject names follow the same rules as field names.
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        is_safe_field_name(name)
    }
}

/// URL encoding utilities for parameter safety.
pub mod url {
    /// URL-encode a path segment or parameter value.
    ///
    /// User-provided values cannot break out of URL paths or inject
    /// additional parameters once encoded.
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}

/// XML escaping utilities for record bodies.
pub mod xml {
    /// Escape a string for safe inclusion in XML content.
    ///
    /// ```rust
    /// use sfsoql_client::security::xml;
    ///
    /// let safe = xml::escape("Hello <World> & 'Friends'");
    /// assert_eq!(safe, "Hello &lt;World&gt; &amp; &apos;Friends&apos;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}
