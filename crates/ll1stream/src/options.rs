/// Configuration for the JSON lexer and parser grammars.
///
/// # Examples
///
/// ```rust
/// use ll1stream::{ParserOptions, Pipeline};
///
/// let pipeline = Pipeline::new(ParserOptions {
///     allow_multiple_json_values: true,
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to parse multiple JSON values in a single input stream.
    ///
    /// When `true`, the grammars loop until the end of input, producing one
    /// value per top-level document. Values may be separated by whitespace or
    /// directly adjacent, which covers JSON Lines (JSONL), newline-delimited
    /// JSON (ND-JSON) and plain concatenation. Input made only of whitespace
    /// produces no values.
    ///
    /// When `false`, exactly one value is accepted and anything but
    /// whitespace after it is an error.
    ///
    /// # Examples
    ///
    /// ```json
    /// {}{}{}
    /// ```
    ///
    /// ```json
    /// 123 45 678 9
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_json_values: bool,

    /// Whether to skip any Unicode whitespace between tokens.
    ///
    /// By default, only the four whitespace characters defined by the JSON
    /// specification are skipped: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,
}
