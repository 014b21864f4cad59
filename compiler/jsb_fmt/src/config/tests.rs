use pretty_assertions::assert_eq;

use super::*;

#[test]
fn defaults() {
    let config = FormatConfig::default();
    assert_eq!(config.cache_capacity, 4096);
    assert_eq!(config.queue_limit, None);
    assert!(!config.decode_strings);
    assert!(config.beautify);
    assert_eq!(config.indent, "\t");
    assert_eq!(config.indent_cap, 16);
    assert_eq!(config.complex_line_len, 160);
    assert_eq!(config.complex_line_marks, 3);
}

#[test]
fn builders_chain() {
    let config = FormatConfig::default()
        .with_cache_capacity(256)
        .with_queue_limit(Some(16))
        .with_decode_strings(true)
        .with_beautify(false)
        .with_space_indent(2)
        .with_indent_cap(0)
        .with_complex_line_len(80)
        .with_complex_line_marks(5);
    assert_eq!(config.cache_capacity, 256);
    assert_eq!(config.queue_limit, Some(16));
    assert!(config.decode_strings);
    assert!(!config.beautify);
    assert_eq!(config.indent, "  ");
    assert_eq!(config.indent_cap, 0);
    assert_eq!(config.complex_line_len, 80);
    assert_eq!(config.complex_line_marks, 5);
}

#[test]
fn indent_wraps_above_cap() {
    let config = FormatConfig::default();
    assert_eq!(config.effective_indent(0), 0);
    assert_eq!(config.effective_indent(16), 16);
    assert_eq!(config.effective_indent(17), 3);
    assert_eq!(config.effective_indent(30), 1);
}

#[test]
fn zero_cap_disables_wrapping() {
    let config = FormatConfig::default().with_indent_cap(0);
    assert_eq!(config.effective_indent(40), 40);
}
