#![allow(unused_doc_comments)]

//! Tagged NFA/DFA regex engine plus a chunked streaming-input core for
//! scanning it over data that arrives incrementally.

#[macro_use(debug)]
extern crate tracing;

pub mod ccl;
pub mod chain;
pub mod chunk;
pub mod dfa;
pub mod error;
pub mod facade;
pub mod interval_tree;
pub mod match_state;
pub mod nfa;
pub mod regex;
pub mod stream;
pub mod stream_iter;
pub mod view;

pub use facade::{Match, Options, PartialMatch, Regex};
pub use stream::Stream;
