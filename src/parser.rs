use std::fmt;
use std::future;

use crate::combinators;
use crate::state::ParseState;

#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// Input ended before `expected` could be matched.
    Eof { expected: String, position: usize },
    /// Input at `position` didn't match expectations; an enclosing choice
    /// may still recover.
    Fail {
        expected: String,
        found: String,
        position: usize,
    },
    /// A combinator that requires at least one match came up empty.
    NoMatch {
        combinator: &'static str,
        position: usize,
    },
    /// An inner parser succeeded without consuming input; repeating it would
    /// never terminate.
    NoProgress {
        combinator: &'static str,
        position: usize,
    },
    /// ExecFail is an error that occurred while executing "user code", e.g.
    /// during a Transform parser.
    ExecFail(String),
}

/// This function returns an error for returning from a function called by a
/// `Transform` parser.
pub fn execerr<S: AsRef<str>>(s: S) -> ParseError {
    ParseError::ExecFail(s.as_ref().to_string())
}

impl ParseError {
    /// The input position the error points at, if it carries one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Eof { position, .. }
            | ParseError::Fail { position, .. }
            | ParseError::NoMatch { position, .. }
            | ParseError::NoProgress { position, .. } => Some(*position),
            ParseError::ExecFail(_) => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Eof { expected, position } => write!(
                f,
                "parse error (position {}): expecting {}, but got end of input",
                position, expected
            ),
            ParseError::Fail {
                expected,
                found,
                position,
            } => write!(
                f,
                "parse error (position {}): expecting {}, got {}",
                position, expected, found
            ),
            ParseError::NoMatch {
                combinator,
                position,
            } => write!(
                f,
                "parse error in '{}' (position {}): expecting to match at least one value",
                combinator, position
            ),
            ParseError::NoProgress {
                combinator,
                position,
            } => write!(
                f,
                "parse error in '{}' (position {}): inner parser matched without consuming input",
                combinator, position
            ),
            ParseError::ExecFail(s) => write!(f, "logic error: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<R> = Result<R, ParseError>;

pub trait Parser {
    type Result;

    /// parse consumes input from `st` and returns a result or an error.
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result>;

    /// apply transforms the result of this parser using a Transform
    /// combinator. The function may fail; build its error with `execerr`.
    fn apply<R2, F: Fn(Self::Result) -> ParseResult<R2>>(
        self,
        f: F,
    ) -> combinators::Transform<Self::Result, R2, Self, F>
    where
        Self: std::marker::Sized,
    {
        combinators::Transform::new(self, f)
    }

    /// then applies this parser, discards its result, and returns `next`'s
    /// result if both succeeded.
    fn then<P: Parser>(self, next: P) -> combinators::Then<Self, P>
    where
        Self: std::marker::Sized,
    {
        combinators::Then::new(self, next)
    }
}

/// Runs `parser` against `input` from the start, returning the final value
/// and discarding the state. All failures come back as the error branch;
/// this function never panics on unexpected input.
pub fn parse<P: Parser>(parser: &mut P, input: &str) -> ParseResult<P::Result> {
    let mut st = ParseState::new(input);
    parser.parse(&mut st)
}

/// Converts a finished parse into an asynchronous completion: success
/// resolves with the value, failure with the diagnostic. Boundary adapter
/// only; no parsing happens here.
pub fn to_future<R>(result: ParseResult<R>) -> future::Ready<ParseResult<R>> {
    future::ready(result)
}
