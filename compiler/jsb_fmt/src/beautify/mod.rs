//! Line beautifier stage.
//!
//! Sorts lines into simple and complex ones. Simple lines pass straight
//! through; complex lines go through [`LineBeautifier::beautify`], which
//! currently returns them unchanged and only counts and traces them.

use jsb_queue::{spawn_stage, Stage, StageError};
use tracing::{debug, trace};

use crate::{FormatConfig, Line, LineKind};

const STAGE: &str = "beautify";

/// Classifies and rewrites lines.
#[derive(Debug)]
pub struct LineBeautifier {
    complex_line_len: usize,
    complex_line_marks: usize,
    simple: u64,
    complex: u64,
}

impl LineBeautifier {
    pub fn from_config(config: &FormatConfig) -> Self {
        Self {
            complex_line_len: config.complex_line_len,
            complex_line_marks: config.complex_line_marks,
            simple: 0,
            complex: 0,
        }
    }

    /// Whether `line` can be printed as built.
    ///
    /// `for` and `while` headers, over-long lines and lines dense with
    /// commas, logic operators and ternaries are complex.
    pub fn is_simple(&self, line: &Line) -> bool {
        if matches!(line.kind(), LineKind::For | LineKind::While) {
            return false;
        }
        if line.char_len() > self.complex_line_len {
            return false;
        }
        let marks = line.comma_count() + line.logic_count() + line.ternary_count();
        marks <= self.complex_line_marks
    }

    pub fn beautify(&mut self, line: Line) -> Line {
        if self.is_simple(&line) {
            self.simple += 1;
            return line;
        }
        self.complex += 1;
        trace!(
            line = line.number(),
            kind = ?line.kind(),
            len = line.char_len(),
            "complex line"
        );
        line
    }

    pub fn simple_count(&self) -> u64 {
        self.simple
    }

    pub fn complex_count(&self) -> u64 {
        self.complex
    }
}

/// Run a [`LineBeautifier`] over `input` on a `jsb-beautify` thread.
pub fn spawn_beautifier(
    input: Stage<Line>,
    config: &FormatConfig,
) -> Result<Stage<Line>, StageError> {
    let mut beautifier = LineBeautifier::from_config(config);
    spawn_stage(STAGE, config.queue_limit, move |out| {
        let mut input = input;
        for line in &mut input {
            if !out.send(beautifier.beautify(line)) {
                return Ok(());
            }
        }
        debug!(
            simple = beautifier.simple_count(),
            complex = beautifier.complex_count(),
            "beautifier drained input"
        );
        input.finish()
    })
}

#[cfg(test)]
mod tests;
