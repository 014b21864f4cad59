//! Low-level tokenizer for jsb.
//!
//! This crate is the leaf of the beautifier pipeline. It knows nothing about
//! threads, queues, or lines; it turns a byte stream into [`Token`]s.
//!
//! # Architecture
//!
//! ```text
//! impl Read ──► ByteCache (ring buffer, bounded backtrack)
//!                   │
//!                   ▼
//!              scan_token / Scanner ──► Token { kind, value, offset }
//! ```
//!
//! The [`ByteCache`] pulls bytes from any [`std::io::Read`] in batches and
//! keeps the most recent bytes in a ring so the scanner can look ahead and
//! step back without buffering the whole input. [`scan_token`] classifies
//! one token at a time; [`Scanner`] wraps it with the previous-significant
//! token bookkeeping the `/` regex-vs-divide decision needs.

mod cache;
mod scanner;
mod tag;
mod token;

pub use cache::{ByteCache, CacheError, MIN_CAPACITY};
pub use scanner::{scan_token, ScanError, Scanner};
pub use tag::TokenKind;
pub use token::{Token, TokenValue};
