#![allow(dead_code)]

//! parsely is a monadic parser combinator library: small parsers (a
//! character, a literal string, a digit) and combinators that compose them
//! into larger recursive-descent parsers, with no grammar compiler or
//! macro layer in between.
//!
//! You will notice two kinds of parsers that however differ only in minor
//! aspects:
//!
//!   * Ones starting with a capital letter are `struct`s (such as `Char`,
//!     `Sequence`). You can create them using `ParserName::new()`, or a
//!     specialized constructor method.
//!   * Ones starting with a lower case letter (and in snake case, such as
//!     `sep_by` or `between`) are functions returning parsers combined
//!     from one or more elementary parsers.
//!
//! The resulting objects implementing the `Parser` trait are identical to
//! use. Run a composed parser against a string with [`parse`], or drive a
//! `ParseState` yourself:
//!
//! ```
//! use parsely::combinators::{self, RepeatSpec};
//! use parsely::primitives;
//! use parsely::{parse, ParseState, Parser};
//!
//! // Goal: parse a parenthesized, comma-separated list of words.
//! let word = || primitives::string_of("abcdefghijklmnopqrstuvwxyz", RepeatSpec::Min(1));
//! let mut list = combinators::between(
//!     primitives::Char::new('('),
//!     combinators::sep_by(word(), primitives::Char::new(',')),
//!     primitives::Char::new(')'),
//! );
//! assert_eq!(
//!     Ok(vec!["one".to_string(), "two".to_string()]),
//!     parse(&mut list, "(one,two)")
//! );
//!
//! // A ParseState can keep going after one parser is done with it, for
//! // example when implementing your own parsers.
//! let mut ps = ParseState::new("12 remainder");
//! assert_eq!(Ok(12), primitives::Int.parse(&mut ps));
//! let _ = primitives::whitespace().parse(&mut ps);
//! assert_eq!(Ok("remainder".to_string()), word().parse(&mut ps));
//! ```
//!
//! Note that not all primitives and combinators are exported at the crate
//! level! Only "important" ones are.

#[allow(unused_imports)]
#[macro_use]
extern crate time_test;

pub mod combinators;
pub mod parser;
pub mod primitives;
mod state;

pub use combinators::{
    between, everything_until, many, many1, map_to, possibly, sep_by, sep_by1, skip, take_left,
    take_right, Choice, Compose, Lazy, Maybe, NamedSequence, Pipe, Repeat, RepeatSpec, Sequence,
    Skip, Then, Transform,
};
pub use parser::{execerr, parse, to_future, ParseError, ParseResult, Parser};
pub use primitives::{
    float, string_none_of, string_of, whitespace, Char, Digit, Int, Letter, NoneOf, OneOf,
    StringParser,
};
pub use state::ParseState;
