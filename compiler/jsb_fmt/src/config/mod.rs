//! Formatting options.

/// Every tunable of a formatting run.
///
/// Built with [`Default`] plus the `with_*` methods; the CLI maps its flags
/// onto this struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Tokenizer ring buffer size in bytes (clamped to at least 128).
    pub cache_capacity: usize,
    /// Item cap for every inter-stage queue; `None` is unbounded.
    pub queue_limit: Option<usize>,
    /// Rewrite base64 string literals as `btoa('...')`.
    pub decode_strings: bool,
    /// Run the line beautifier stage.
    pub beautify: bool,
    /// Bytes written once per indentation level.
    pub indent: String,
    /// Depths above this wrap around; `0` disables wrapping.
    pub indent_cap: usize,
    /// Lines longer than this many bytes count as complex.
    pub complex_line_len: usize,
    /// Lines with more commas, logic operators and ternaries than this
    /// count as complex.
    pub complex_line_marks: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 4096,
            queue_limit: None,
            decode_strings: false,
            beautify: true,
            indent: "\t".to_owned(),
            indent_cap: 16,
            complex_line_len: 160,
            complex_line_marks: 3,
        }
    }
}

impl FormatConfig {
    #[must_use]
    pub fn with_cache_capacity(mut self, bytes: usize) -> Self {
        self.cache_capacity = bytes;
        self
    }

    #[must_use]
    pub fn with_queue_limit(mut self, limit: Option<usize>) -> Self {
        self.queue_limit = limit;
        self
    }

    #[must_use]
    pub fn with_decode_strings(mut self, decode: bool) -> Self {
        self.decode_strings = decode;
        self
    }

    #[must_use]
    pub fn with_beautify(mut self, beautify: bool) -> Self {
        self.beautify = beautify;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Indent with `width` spaces per level.
    #[must_use]
    pub fn with_space_indent(self, width: usize) -> Self {
        self.with_indent(" ".repeat(width))
    }

    #[must_use]
    pub fn with_indent_cap(mut self, cap: usize) -> Self {
        self.indent_cap = cap;
        self
    }

    #[must_use]
    pub fn with_complex_line_len(mut self, len: usize) -> Self {
        self.complex_line_len = len;
        self
    }

    #[must_use]
    pub fn with_complex_line_marks(mut self, marks: usize) -> Self {
        self.complex_line_marks = marks;
        self
    }

    /// Number of indent units to write for a line at `depth`.
    pub fn effective_indent(&self, depth: usize) -> usize {
        if self.indent_cap >= 2 && depth > self.indent_cap {
            depth % (self.indent_cap - 1) + 1
        } else {
            depth
        }
    }
}

#[cfg(test)]
mod tests;
