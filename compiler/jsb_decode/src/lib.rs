//! Decoder stage: rewrites base64 string literals.
//!
//! A string token whose interior is standard base64 decoding to printable
//! text is replaced by `btoa('<decoded>')`, which evaluates back to the
//! original string. Every other token passes through unchanged and in
//! order.

use base64::{engine::general_purpose, Engine as _};
use jsb_lexer_core::Token;
use jsb_queue::{spawn_stage, Stage, StageError};
use tracing::debug;

const STAGE: &str = "decoder";

/// Shortest interior considered for decoding.
const MIN_ENCODED_LEN: usize = 4;

/// Run the decoder over `input` on a `jsb-decoder` thread.
///
/// The returned stage owns `input`; an upstream failure is re-raised as
/// this stage's failure once the input is drained.
pub fn spawn_decoder(
    input: Stage<Token>,
    queue_limit: Option<usize>,
) -> Result<Stage<Token>, StageError> {
    spawn_stage(STAGE, queue_limit, move |out| {
        let mut input = input;
        let mut decoded = 0u64;
        for token in &mut input {
            let token = match decode_literal(&token) {
                Some(value) => {
                    decoded += 1;
                    token.with_value(value)
                }
                None => token,
            };
            if !out.send(token) {
                return Ok(());
            }
        }
        debug!(decoded, "decoder drained input");
        input.finish()
    })
}

/// The `btoa('...')` replacement for a base64 string literal, if `token`
/// is one.
pub fn decode_literal(token: &Token) -> Option<Vec<u8>> {
    if !token.kind().is_string() {
        return None;
    }
    let bytes = token.bytes();
    let (&open, rest) = bytes.split_first()?;
    let (&close, interior) = rest.split_last()?;
    if open != close || interior.len() < MIN_ENCODED_LEN {
        return None;
    }
    let decoded = general_purpose::STANDARD.decode(interior).ok()?;
    if decoded.is_empty() || !decoded.iter().all(|&b| is_printable(b)) {
        return None;
    }

    let mut out = Vec::with_capacity(decoded.len() + 8);
    out.extend_from_slice(b"btoa('");
    for b in decoded {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\'' => out.extend_from_slice(b"\\'"),
            b'"' => out.extend_from_slice(b"\\x22"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out.extend_from_slice(b"')");
    Some(out)
}

fn is_printable(b: u8) -> bool {
    matches!(b, b' '..=b'~' | b'\t' | b'\n')
}
