//! A simplistic JSON parser library based on the `parsely` crate.
//!
//! Lists and dicts reject trailing commas, since their elements are
//! separated-list parses.

use std::collections::HashMap;
use std::iter::FromIterator;

use parsely::combinators::{self, RepeatSpec};
use parsely::primitives;
use parsely::{execerr, ParseResult, ParseState, Parser};

#[derive(Debug, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Dict(HashMap<String, Value>),
    List(Vec<Value>),
}

/// The grammar's recursive entry point. A named type breaks the type
/// recursion: `parse` builds the alternatives on demand, and the `Lazy`
/// thunks keep the list and dict rules from constructing themselves
/// eagerly forever.
pub struct ValueParser;

impl Parser for ValueParser {
    type Result = Value;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        let list = combinators::Lazy::new(list);
        let dict = combinators::Lazy::new(dict);
        combinators::Choice::new((string(), number(), list, dict)).parse(st)
    }
}

fn padded<P: Parser>(p: P) -> impl Parser<Result = P::Result> {
    combinators::between(primitives::whitespace(), p, primitives::whitespace())
}

fn number() -> impl Parser<Result = Value> {
    primitives::float().apply(|n| Ok(Value::Number(n)))
}

fn string() -> impl Parser<Result = Value> {
    combinators::between(
        primitives::Char::new('"'),
        primitives::string_none_of("\"", RepeatSpec::Any),
        primitives::Char::new('"'),
    )
    .apply(|s| Ok(Value::String(s)))
}

fn list() -> impl Parser<Result = Value> {
    let elements = combinators::between(
        primitives::whitespace(),
        combinators::sep_by(padded(ValueParser), primitives::Char::new(',')),
        primitives::whitespace(),
    );
    combinators::between(
        primitives::Char::new('['),
        elements,
        primitives::Char::new(']'),
    )
    .apply(|es| Ok(Value::List(es)))
}

fn dict() -> impl Parser<Result = Value> {
    let key = combinators::take_left(padded(string()), primitives::Char::new(':')).apply(|v| {
        match v {
            Value::String(s) => Ok(s),
            _ => Err(execerr("dict keys must be strings")),
        }
    });
    let entry = combinators::Sequence::new((key, padded(ValueParser)));
    let entries = combinators::between(
        primitives::whitespace(),
        combinators::sep_by(entry, primitives::Char::new(',')),
        primitives::whitespace(),
    );
    combinators::between(
        primitives::Char::new('{'),
        entries,
        primitives::Char::new('}'),
    )
    .apply(|es| Ok(Value::Dict(HashMap::from_iter(es))))
}

#[macro_use]
extern crate time_test;
