#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use std::io;

use pretty_assertions::assert_eq;

use super::*;

/// Yields `data` once, then fails.
struct BrokenReader {
    data: Option<&'static [u8]>,
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            None => Err(io::Error::new(io::ErrorKind::ConnectionReset, "pipe reset")),
        }
    }
}

fn fmt(source: &str) -> String {
    format_bytes(source.as_bytes(), &FormatConfig::default()).unwrap()
}

#[test]
fn formats_a_block() {
    assert_eq!(fmt("if(x){y;}"), "if (x) {\n\ty;\n}\n");
}

#[test]
fn empty_input_formats_to_nothing() {
    assert_eq!(fmt(""), "");
}

#[test]
fn every_stage_combination_agrees() {
    let source = "function f(a){if(a)return 1;else{return a+1}}";
    let expected = fmt(source);
    for decode in [false, true] {
        for beautify in [false, true] {
            let config = FormatConfig::default()
                .with_decode_strings(decode)
                .with_beautify(beautify)
                .with_queue_limit(Some(2));
            assert_eq!(
                format_bytes(source.as_bytes(), &config).unwrap(),
                expected,
                "decode={decode} beautify={beautify}"
            );
        }
    }
}

#[test]
fn decode_rewrites_base64_literals() {
    let config = FormatConfig::default().with_decode_strings(true);
    let out = format_bytes(b"x = \"aGVsbG8=\";", &config).unwrap();
    assert_eq!(out, "x = btoa('hello');\n");
}

#[test]
fn small_cache_and_queues() {
    let source = "var a = [1, 2];\nwhile (a.length) a.pop();\n";
    let config = FormatConfig::default()
        .with_cache_capacity(1)
        .with_queue_limit(Some(1));
    assert_eq!(
        format_bytes(source.as_bytes(), &config).unwrap(),
        "var a = [1,\n2];\nwhile (a.length)\n\ta.pop();\n"
    );
}

#[test]
fn read_failure_keeps_partial_output() {
    let reader = BrokenReader {
        data: Some(b"a;\nb;\n"),
    };
    let mut out = StringEmitter::new();
    let err = format_reader(reader, &mut out, &FormatConfig::default()).unwrap_err();
    match err {
        FormatError::Stage(stage) => assert_eq!(stage.stage(), "tokenizer"),
        other @ FormatError::Emit(_) => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(out.output(), "a;\nb;\n");
}

#[test]
fn early_drop_tears_down() {
    let source: String = "x = 1;\n".repeat(10_000);
    let config = FormatConfig::default().with_queue_limit(Some(4));
    let mut stage = spawn_pipeline(io::Cursor::new(source.into_bytes()), &config).unwrap();
    let first = stage.next().unwrap();
    assert_eq!(first.text(), "x = 1;");
    drop(stage);
}
