use std::collections::HashMap;

use crate::parser::{ParseError, ParseResult, Parser};
use crate::state::ParseState;

/// Transform applies a function (which may fail) to the result of a parser.
/// Transform only succeeds if the applied function succeeds, too.
pub struct Transform<R, R2, P: Parser<Result = R>, F: Fn(R) -> ParseResult<R2>> {
    func: F,
    inner: P,
}

impl<R, R2, P: Parser<Result = R>, F: Fn(R) -> ParseResult<R2>> Transform<R, R2, P, F> {
    /// Create a new Transform parser using f.
    pub fn new(p: P, f: F) -> Transform<R, R2, P, F> {
        Transform { func: f, inner: p }
    }
}

impl<R, R2, P: Parser<Result = R>, F: Fn(R) -> ParseResult<R2>> Parser for Transform<R, R2, P, F> {
    type Result = R2;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match self.inner.parse(st) {
            Ok(o) => (self.func)(o),
            Err(e) => Err(e),
        }
    }
}

/// map_to transforms a parser's result with an infallible function; it
/// consumes no input of its own and only fails if the inner parser does.
pub fn map_to<P: Parser, R2, F: Fn(P::Result) -> R2>(p: P, f: F) -> impl Parser<Result = R2> {
    Transform::new(p, move |r| Ok(f(r)))
}

/// Sequence applies parsers in order and only succeeds if all of them do. T
/// is always a tuple in order for Sequence to implement the Parser trait;
/// the result is the tuple of all sub-results. On the first failure the
/// whole sequence fails with that parser's error and the position rewinds
/// to where the sequence started; no partial results are returned.
pub struct Sequence<T>(T);

impl<T> Sequence<T> {
    pub fn new(tuple: T) -> Sequence<T> {
        Sequence(tuple)
    }
}

/// Macro for implementing sequence parsers for arbitrary tuples. Not for public use.
macro_rules! seq_impl {
    ( ( $($ptype:ident/$ix:tt),+ ) ) => {
        impl<$($ptype: Parser,)+> Parser for Sequence<($($ptype,)+)> {
            type Result = ($($ptype::Result,)+);
            fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
                let hold = st.hold();
                let result = ($(
                    match (self.0).$ix.parse(st) {
                        Ok(r) => r,
                        Err(e) => {
                            st.reset(hold);
                            return Err(e);
                        }
                    },
                )+);
                st.release(hold);
                Ok(result)
            }
        }
    }
}

seq_impl!((P0 / 0, P1 / 1));
seq_impl!((P0 / 0, P1 / 1, P2 / 2));
seq_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3));
seq_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4));
seq_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4, P5 / 5));
seq_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4, P5 / 5, P6 / 6));
seq_impl!((
    P0 / 0,
    P1 / 1,
    P2 / 2,
    P3 / 3,
    P4 / 4,
    P5 / 5,
    P6 / 6,
    P7 / 7
));
seq_impl!((
    P0 / 0,
    P1 / 1,
    P2 / 2,
    P3 / 3,
    P4 / 4,
    P5 / 5,
    P6 / 6,
    P7 / 7,
    P8 / 8
));
seq_impl!((
    P0 / 0,
    P1 / 1,
    P2 / 2,
    P3 / 3,
    P4 / 4,
    P5 / 5,
    P6 / 6,
    P7 / 7,
    P8 / 8,
    P9 / 9
));

/// NamedSequence applies (name, parser) pairs in order, with Sequence's
/// failure behavior, and collects the results into a map keyed by the
/// names. All parsers must produce the same result type. If a name appears
/// more than once, the later parser's result replaces the earlier one.
pub struct NamedSequence<T>(T);

impl<T> NamedSequence<T> {
    pub fn new(pairs: T) -> NamedSequence<T> {
        NamedSequence(pairs)
    }
}

macro_rules! named_seq_impl {
    ( ( $($ptype:ident/$ix:tt),+ ) ) => {
        impl<R, $($ptype: Parser<Result = R>,)+> Parser for NamedSequence<($((&'static str, $ptype),)+)> {
            type Result = HashMap<&'static str, R>;
            fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
                let hold = st.hold();
                let mut results = HashMap::new();
                $(
                    match ((self.0).$ix).1.parse(st) {
                        Ok(r) => {
                            results.insert(((self.0).$ix).0, r);
                        }
                        Err(e) => {
                            st.reset(hold);
                            return Err(e);
                        }
                    }
                )+
                st.release(hold);
                Ok(results)
            }
        }
    }
}

named_seq_impl!((P0 / 0, P1 / 1));
named_seq_impl!((P0 / 0, P1 / 1, P2 / 2));
named_seq_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3));
named_seq_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4));
named_seq_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4, P5 / 5));

/// Choice tries each alternative in order, each one from the position the
/// choice started at, and returns the first success. All alternatives must
/// produce the same result type. When every alternative fails, the
/// individual errors are discarded and a single positioned error is
/// returned instead.
pub struct Choice<T>(T);

impl<T> Choice<T> {
    pub fn new(tuple: T) -> Choice<T> {
        Choice(tuple)
    }
}

macro_rules! choice_impl {
    ( ( $($ptype:ident/$ix:tt),+ ) ) => {
        impl<R, $($ptype: Parser<Result = R>,)+> Parser for Choice<($($ptype,)+)> {
            type Result = R;
            fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
                let start = st.index();
                $(
                    let hold = st.hold();
                    match (self.0).$ix.parse(st) {
                        Ok(o) => {
                            st.release(hold);
                            return Ok(o);
                        }
                        Err(_) => st.reset(hold),
                    }
                )+
                Err(ParseError::NoMatch {
                    combinator: "choice",
                    position: start,
                })
            }
        }
    }
}

choice_impl!((P0 / 0, P1 / 1));
choice_impl!((P0 / 0, P1 / 1, P2 / 2));
choice_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3));
choice_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4));
choice_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4, P5 / 5));
choice_impl!((P0 / 0, P1 / 1, P2 / 2, P3 / 3, P4 / 4, P5 / 5, P6 / 6));
choice_impl!((
    P0 / 0,
    P1 / 1,
    P2 / 2,
    P3 / 3,
    P4 / 4,
    P5 / 5,
    P6 / 6,
    P7 / 7
));
choice_impl!((
    P0 / 0,
    P1 / 1,
    P2 / 2,
    P3 / 3,
    P4 / 4,
    P5 / 5,
    P6 / 6,
    P7 / 7,
    P8 / 8
));
choice_impl!((
    P0 / 0,
    P1 / 1,
    P2 / 2,
    P3 / 3,
    P4 / 4,
    P5 / 5,
    P6 / 6,
    P7 / 7,
    P8 / 8,
    P9 / 9
));

pub enum RepeatSpec {
    /// Any is equivalent to Min(0).
    Any,
    Min(usize),
    Max(usize),
    Between(usize, usize),
}

/// Repeat applies the inner parser again and again, collecting results,
/// until it fails or the spec's maximum is reached. Below the minimum the
/// inner parser's error is returned and the position rewinds to the start;
/// at or above it the accumulated results are returned and the position
/// stays at the last success. An iteration that succeeds without consuming
/// input is an error: repeating it would never terminate.
pub struct Repeat<P: Parser> {
    inner: P,
    repeat: RepeatSpec,
}

impl<P: Parser> Repeat<P> {
    pub fn new(p: P, r: RepeatSpec) -> Repeat<P> {
        Repeat {
            inner: p,
            repeat: r,
        }
    }
}

impl<R, P: Parser<Result = R>> Parser for Repeat<P> {
    type Result = Vec<R>;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        let (min, max) = match self.repeat {
            RepeatSpec::Any => (0, usize::MAX),
            RepeatSpec::Min(min) => (min, usize::MAX),
            RepeatSpec::Max(max) => (0, max),
            RepeatSpec::Between(min, max) => (min, max),
        };
        let mut v: Self::Result = Vec::new();
        let start = st.hold();
        while v.len() < max {
            let attempt = st.hold();
            let before = st.index();
            match self.inner.parse(st) {
                Ok(r) => {
                    st.release(attempt);
                    if st.index() == before {
                        st.reset(start);
                        return Err(ParseError::NoProgress {
                            combinator: "repeat",
                            position: before,
                        });
                    }
                    v.push(r);
                }
                Err(e) => {
                    st.reset(attempt);
                    if v.len() >= min {
                        st.release(start);
                        return Ok(v);
                    }
                    st.reset(start);
                    return Err(e);
                }
            }
        }
        st.release(start);
        Ok(v)
    }
}

/// Zero or more applications of `p`; never fails.
pub fn many<P: Parser>(p: P) -> Repeat<P> {
    Repeat::new(p, RepeatSpec::Any)
}

/// One or more applications of `p`; fails on zero matches.
pub fn many1<P: Parser>(p: P) -> Repeat<P> {
    Repeat::new(p, RepeatSpec::Min(1))
}

/// SepBy parses values separated by a separator, collecting the values.
/// Parsing stops at the first value or separator that doesn't match. A
/// matched separator followed by a failing value is an error (dangling
/// separator); no values at all is an empty success at the original
/// position, unless the combinator was built with `sep_by1`.
pub struct SepBy<V: Parser, S: Parser> {
    value: V,
    separator: S,
    min_one: bool,
}

impl<V: Parser, S: Parser> SepBy<V, S> {
    pub fn new(value: V, separator: S) -> SepBy<V, S> {
        SepBy {
            value,
            separator,
            min_one: false,
        }
    }

    pub fn at_least_one(value: V, separator: S) -> SepBy<V, S> {
        SepBy {
            value,
            separator,
            min_one: true,
        }
    }
}

impl<V: Parser, S: Parser> Parser for SepBy<V, S> {
    type Result = Vec<V::Result>;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        let start = st.hold();
        let start_ix = st.index();
        let mut results = Vec::new();
        loop {
            let round_ix = st.index();
            let attempt = st.hold();
            match self.value.parse(st) {
                Err(e) => {
                    st.reset(attempt);
                    st.reset(start);
                    if results.is_empty() {
                        if self.min_one {
                            return Err(ParseError::NoMatch {
                                combinator: "sep_by",
                                position: start_ix,
                            });
                        }
                        return Ok(results);
                    }
                    // A separator already matched, so the missing value
                    // after it is an error, not a shorter list.
                    return Err(e);
                }
                Ok(r) => {
                    results.push(r);
                    st.release(attempt);
                    let sep_attempt = st.hold();
                    match self.separator.parse(st) {
                        Err(_) => {
                            st.reset(sep_attempt);
                            st.release(start);
                            return Ok(results);
                        }
                        Ok(_) => {
                            st.release(sep_attempt);
                            if st.index() == round_ix {
                                st.reset(start);
                                return Err(ParseError::NoProgress {
                                    combinator: "sep_by",
                                    position: round_ix,
                                });
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Zero or more `value`s separated by `separator`.
pub fn sep_by<V: Parser, S: Parser>(value: V, separator: S) -> SepBy<V, S> {
    SepBy::new(value, separator)
}

/// One or more `value`s separated by `separator`; fails on zero matches.
pub fn sep_by1<V: Parser, S: Parser>(value: V, separator: S) -> SepBy<V, S> {
    SepBy::at_least_one(value, separator)
}

/// EverythingUntil consumes raw characters until its terminator matches,
/// testing the terminator before each consumption. The terminator's input
/// is consumed and its result discarded; the characters before it are
/// returned as a string. Reaching the end of input before the terminator
/// ever matches is an error.
pub struct EverythingUntil<P: Parser> {
    terminator: P,
}

impl<P: Parser> EverythingUntil<P> {
    pub fn new(terminator: P) -> EverythingUntil<P> {
        EverythingUntil { terminator }
    }
}

impl<R, P: Parser<Result = R>> Parser for EverythingUntil<P> {
    type Result = String;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        let start = st.hold();
        let mut out = String::new();
        loop {
            let attempt = st.hold();
            match self.terminator.parse(st) {
                Ok(_) => {
                    st.release(attempt);
                    st.release(start);
                    return Ok(out);
                }
                Err(_) => {
                    st.reset(attempt);
                    match st.next() {
                        Some(c) => out.push(c),
                        None => {
                            let position = st.index();
                            st.reset(start);
                            return Err(ParseError::Eof {
                                expected: "a match for the terminating parser".to_string(),
                                position,
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Consume everything up to and including the first match of `terminator`.
pub fn everything_until<P: Parser>(terminator: P) -> EverythingUntil<P> {
    EverythingUntil::new(terminator)
}

/// Maybe is a combinator returning Option<T> for a parser returning T: an
/// inner failure becomes `None` with the position restored, so an optional
/// piece of input never stops the surrounding parse.
pub struct Maybe<P: Parser> {
    inner: P,
}

impl<P: Parser> Maybe<P> {
    pub fn new(p: P) -> Maybe<P> {
        Maybe { inner: p }
    }
}

impl<R, P: Parser<Result = R>> Parser for Maybe<P> {
    type Result = Option<R>;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        let hold = st.hold();
        match self.inner.parse(st) {
            Ok(r) => {
                st.release(hold);
                Ok(Some(r))
            }
            Err(_) => {
                st.reset(hold);
                Ok(None)
            }
        }
    }
}

/// Attempt `p`; on failure succeed with `None` and the position unchanged.
pub fn possibly<P: Parser>(p: P) -> Maybe<P> {
    Maybe::new(p)
}

/// Skip runs a parser for its effect of advancing the position and hides
/// the result, so surrounding combinators keep their own values. Failures
/// still propagate.
pub struct Skip<P: Parser> {
    inner: P,
}

impl<P: Parser> Skip<P> {
    pub fn new(p: P) -> Skip<P> {
        Skip { inner: p }
    }
}

impl<R, P: Parser<Result = R>> Parser for Skip<P> {
    type Result = ();
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match self.inner.parse(st) {
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Consume `p`'s input, discarding its result.
pub fn skip<P: Parser>(p: P) -> Skip<P> {
    Skip::new(p)
}

/// Applies one parser, discards the result, and returns the second parser's
/// result if both succeeded.
pub struct Then<A: Parser, B: Parser> {
    first: A,
    second: B,
}

impl<A: Parser, B: Parser> Then<A, B> {
    pub fn new(first: A, second: B) -> Then<A, B> {
        Then { first, second }
    }
}

impl<A: Parser, B: Parser> Parser for Then<A, B> {
    type Result = B::Result;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match self.first.parse(st) {
            Ok(_) => (),
            Err(e) => return Err(e),
        }
        self.second.parse(st)
    }
}

/// Both parsers must match, in order; the right result is kept.
pub fn take_right<A: Parser, B: Parser>(left: A, right: B) -> Then<A, B> {
    Then::new(left, right)
}

/// Both parsers must match, in order; the left result is kept.
pub fn take_left<A: Parser, B: Parser>(left: A, right: B) -> impl Parser<Result = A::Result> {
    Sequence::new((left, right)).apply(|(l, _)| Ok(l))
}

/// All three parsers must match, in order; the inner result is kept.
pub fn between<L: Parser, P: Parser, R: Parser>(
    open: L,
    inner: P,
    close: R,
) -> impl Parser<Result = P::Result> {
    Sequence::new((open, inner, close)).apply(|(_, mid, _)| Ok(mid))
}

/// Pipe threads the state through each parser of a tuple, left to right,
/// like manually chaining each stage's output into the next stage's input;
/// the last stage's result is kept. On any failure the position rewinds to
/// the start.
pub struct Pipe<T>(T);

impl<T> Pipe<T> {
    pub fn new(tuple: T) -> Pipe<T> {
        Pipe(tuple)
    }
}

/// Compose is Pipe over the reversed tuple: stages run right to left and
/// the first (last-run) stage's result is kept.
pub struct Compose<T>(T);

impl<T> Compose<T> {
    pub fn new(tuple: T) -> Compose<T> {
        Compose(tuple)
    }
}

/// One macro body for both chaining directions: the `$pre` stages run
/// first, in the listed order, then `$res` runs and its result is kept.
macro_rules! chain_impl {
    ( $name:ident, ( $($ptype:ident),+ ), ( $($pre:tt),* ), $res:ident/$rix:tt ) => {
        impl<$($ptype: Parser,)+> Parser for $name<($($ptype,)+)> {
            type Result = $res::Result;
            fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
                let hold = st.hold();
                $(
                    if let Err(e) = (self.0).$pre.parse(st) {
                        st.reset(hold);
                        return Err(e);
                    }
                )*
                match (self.0).$rix.parse(st) {
                    Ok(r) => {
                        st.release(hold);
                        Ok(r)
                    }
                    Err(e) => {
                        st.reset(hold);
                        Err(e)
                    }
                }
            }
        }
    }
}

chain_impl!(Pipe, (P0), (), P0 / 0);
chain_impl!(Pipe, (P0, P1), (0), P1 / 1);
chain_impl!(Pipe, (P0, P1, P2), (0, 1), P2 / 2);
chain_impl!(Pipe, (P0, P1, P2, P3), (0, 1, 2), P3 / 3);
chain_impl!(Pipe, (P0, P1, P2, P3, P4), (0, 1, 2, 3), P4 / 4);
chain_impl!(Pipe, (P0, P1, P2, P3, P4, P5), (0, 1, 2, 3, 4), P5 / 5);

chain_impl!(Compose, (P0), (), P0 / 0);
chain_impl!(Compose, (P0, P1), (1), P0 / 0);
chain_impl!(Compose, (P0, P1, P2), (2, 1), P0 / 0);
chain_impl!(Compose, (P0, P1, P2, P3), (3, 2, 1), P0 / 0);
chain_impl!(Compose, (P0, P1, P2, P3, P4), (4, 3, 2, 1), P0 / 0);
chain_impl!(Compose, (P0, P1, P2, P3, P4, P5), (5, 4, 3, 2, 1), P0 / 0);

/// Lazy defers building its inner parser until the first time it actually
/// runs, and caches it afterwards.
///
/// Inside a `Choice` this keeps an expensive alternative from being built
/// unless the earlier ones fail. More importantly it is the indirection
/// that makes recursive grammars expressible: a recursive rule is a small
/// named type whose `parse` builds its body on demand, with `Lazy`
/// wrapping the self-referencing alternatives so nothing recurses at
/// construction time. See the json demo crate for a worked grammar.
///
/// Constructing a `Lazy` only copies a function pointer or closure. The
/// result of the function is cached, so it is called at most once.
pub struct Lazy<P, F: FnMut() -> P>(F, Option<P>);

impl<R, P: Parser<Result = R>, F: FnMut() -> P> Lazy<P, F> {
    pub fn new(f: F) -> Lazy<P, F> {
        Lazy(f, None)
    }
}

impl<R, P: Parser<Result = R>, F: FnMut() -> P> Parser for Lazy<P, F> {
    type Result = R;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        if self.1.is_none() {
            self.1 = Some((self.0)());
        }
        self.1.as_mut().unwrap().parse(st)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{execerr, parse, Parser};
    use crate::primitives::*;

    #[test]
    fn test_sequence() {
        let mut p = Sequence::new((Char::new('('), Digit, Char::new(')')));
        assert_eq!(Ok(('(', '5', ')')), parse(&mut p, "(5)"));
        let mut ps = ParseState::new("(x)");
        assert!(p.parse(&mut ps).is_err());
        assert_eq!(0, ps.index());
    }

    #[test]
    fn test_long_sequence() {
        let a = || Char::new('a');
        let mut p = Sequence::new((a(), a(), a(), a(), a(), a(), a(), a(), a(), a()));
        assert_eq!(
            Ok(('a', 'a', 'a', 'a', 'a', 'a', 'a', 'a', 'a', 'a')),
            parse(&mut p, "aaaaaaaaaa")
        );
    }

    #[test]
    fn test_named_sequence() {
        let mut p = NamedSequence::new((
            ("open", Char::new('(')),
            ("digit", Digit),
            ("close", Char::new(')')),
        ));
        let map = parse(&mut p, "(5)").unwrap();
        assert_eq!(Some(&'('), map.get("open"));
        assert_eq!(Some(&'5'), map.get("digit"));
        assert_eq!(Some(&')'), map.get("close"));
        assert!(parse(&mut p, "(x)").is_err());
    }

    #[test]
    fn test_named_sequence_duplicate_key() {
        let mut p = NamedSequence::new((("d", Digit), ("d", Digit)));
        let map = parse(&mut p, "12").unwrap();
        assert_eq!(1, map.len());
        assert_eq!(Some(&'2'), map.get("d"));
    }

    #[test]
    fn test_choice() {
        let mut p = Choice::new((Char::new('a'), Char::new('b')));
        assert_eq!(Ok('b'), parse(&mut p, "b"));
        assert_eq!(
            Err(ParseError::NoMatch {
                combinator: "choice",
                position: 0
            }),
            parse(&mut p, "c")
        );
    }

    #[test]
    fn test_choice_backtracks() {
        // The first alternative consumes "ab" before failing; the second
        // must still see the input from the start.
        let mut p = Choice::new((StringParser::new("abc"), StringParser::new("abd")));
        assert_eq!(Ok("abd".to_string()), parse(&mut p, "abd"));
    }

    #[test]
    fn test_many() {
        let mut ps = ParseState::new("yyy");
        assert_eq!(Ok(vec![]), many(Char::new('x')).parse(&mut ps));
        assert_eq!(0, ps.index());

        let mut ps = ParseState::new("xxy");
        assert_eq!(Ok(vec!['x', 'x']), many1(Char::new('x')).parse(&mut ps));
        assert_eq!(2, ps.index());

        assert!(parse(&mut many1(Char::new('x')), "yyy").is_err());
    }

    #[test]
    fn test_repeat_spec() {
        let mut ps = ParseState::new("aaaa");
        assert_eq!(
            Ok(vec!["a".to_string(), "a".to_string()]),
            Repeat::new(StringParser::new("a"), RepeatSpec::Max(2)).parse(&mut ps)
        );
        assert_eq!(2, ps.index());
        let before = ps.index();
        assert!(Repeat::new(StringParser::new("a"), RepeatSpec::Min(3))
            .parse(&mut ps)
            .is_err());
        assert_eq!(before, ps.index());
        assert_eq!(
            Ok(vec!["a".to_string(), "a".to_string()]),
            Repeat::new(StringParser::new("a"), RepeatSpec::Between(1, 4)).parse(&mut ps)
        );
    }

    #[test]
    fn test_repeat_zero_width() {
        let mut p = many(possibly(Char::new('x')));
        assert_eq!(
            Err(ParseError::NoProgress {
                combinator: "repeat",
                position: 0
            }),
            parse(&mut p, "yyy")
        );
    }

    #[test]
    fn test_sep_by() {
        let mut p = sep_by(Digit, Char::new(','));
        assert_eq!(Ok(vec!['1', '2', '3']), parse(&mut p, "1,2,3"));
        assert_eq!(Ok(vec![]), parse(&mut p, ""));
        assert_eq!(Ok(vec![]), parse(&mut p, "x"));
        // Dangling separator: a separator matched but no value follows.
        assert!(parse(&mut p, "1,").is_err());
        assert!(parse(&mut p, "1,x").is_err());

        let mut ps = ParseState::new("1,2 rest");
        assert_eq!(Ok(vec!['1', '2']), p.parse(&mut ps));
        assert_eq!(3, ps.index());
    }

    #[test]
    fn test_sep_by1() {
        let mut p = sep_by1(Digit, Char::new(','));
        assert_eq!(Ok(vec!['7']), parse(&mut p, "7"));
        assert_eq!(
            Err(ParseError::NoMatch {
                combinator: "sep_by",
                position: 0
            }),
            parse(&mut p, "")
        );
    }

    #[test]
    fn test_everything_until() {
        let mut p = everything_until(Char::new(';'));
        let mut ps = ParseState::new("abc;rest");
        assert_eq!(Ok("abc".to_string()), p.parse(&mut ps));
        // The terminator itself is consumed.
        assert_eq!(4, ps.index());

        assert_eq!(
            Err(ParseError::Eof {
                expected: "a match for the terminating parser".to_string(),
                position: 3
            }),
            parse(&mut p, "abc")
        );
    }

    #[test]
    fn test_possibly() {
        let mut once = possibly(Char::new('x'));
        let mut ps = ParseState::new("y");
        assert_eq!(Ok(None), once.parse(&mut ps));
        assert_eq!(0, ps.index());

        // Wrapping twice behaves like wrapping once: still absent, still
        // at the original position.
        let mut twice = possibly(possibly(Char::new('x')));
        let r = twice.parse(&mut ps).unwrap();
        assert_eq!(None, r.flatten());
        assert_eq!(0, ps.index());

        let mut ps = ParseState::new("x");
        assert_eq!(Ok(Some('x')), once.parse(&mut ps));
        assert_eq!(1, ps.index());
    }

    #[test]
    fn test_skip() {
        let mut p = Sequence::new((Letter, skip(whitespace()), Digit));
        assert_eq!(Ok(('a', (), '1')), parse(&mut p, "a 1"));
        assert!(parse(&mut p, "a x").is_err());
        assert!(parse(&mut skip(Char::new('x')), "y").is_err());
    }

    #[test]
    fn test_map_to() {
        let mut p = map_to(
            Sequence::new((Char::new('('), Digit, Char::new(')'))),
            |(_, d, _)| d,
        );
        assert_eq!(Ok('5'), parse(&mut p, "(5)"));
    }

    #[test]
    fn test_transform() {
        let mut p = many1(Digit).apply(|ds| {
            ds.into_iter()
                .collect::<String>()
                .parse::<u32>()
                .map_err(|e| execerr(e.to_string()))
        });
        assert_eq!(Ok(123), parse(&mut p, "123"));

        let mut q = Digit.apply(|_| -> ParseResult<char> { Err(execerr("rejected")) });
        assert_eq!(
            Err(ParseError::ExecFail("rejected".to_string())),
            parse(&mut q, "5")
        );
    }

    #[test]
    fn test_then() {
        let mut ps = ParseState::new("abcdef 123");
        let mut p = StringParser::new("abc")
            .then(StringParser::new("def"))
            .then(whitespace())
            .then(Int);
        assert_eq!(Ok(123), p.parse(&mut ps));
    }

    #[test]
    fn test_between_take_left_take_right() {
        let mut p = between(Char::new('('), Digit, Char::new(')'));
        assert_eq!(Ok('5'), parse(&mut p, "(5)"));
        assert!(parse(&mut p, "(5").is_err());

        let mut l = take_left(Digit, Char::new('!'));
        assert_eq!(Ok('3'), parse(&mut l, "3!"));
        let mut r = take_right(Char::new('!'), Digit);
        assert_eq!(Ok('3'), parse(&mut r, "!3"));
    }

    #[test]
    fn test_pipe_compose() {
        let mut p = Pipe::new((Char::new('a'), Char::new('b'), Digit));
        assert_eq!(Ok('1'), parse(&mut p, "ab1"));
        let mut ps = ParseState::new("ax1");
        assert!(p.parse(&mut ps).is_err());
        assert_eq!(0, ps.index());

        // Compose runs the stages right to left over the same input.
        let mut c = Compose::new((Digit, Char::new('b'), Char::new('a')));
        assert_eq!(Ok('1'), parse(&mut c, "ab1"));
    }

    #[test]
    fn test_lazy() {
        let mut ps = ParseState::new("123");
        let mut p = Choice::new((
            string_none_of("0123456789", RepeatSpec::Min(1)),
            Lazy::new(|| Int.apply(|i| Ok(i.to_string()))),
        ));
        assert_eq!(Ok("123".to_string()), p.parse(&mut ps));
    }

    #[test]
    fn test_lazy_not_built_when_unneeded() {
        let mut ps = ParseState::new("123");
        let mut p = Choice::new((
            Int,
            Lazy::new(|| -> Int { panic!("lazy should not build this parser") }),
        ));
        assert_eq!(Ok(123), p.parse(&mut ps));
    }

    use std::iter;

    #[test]
    fn test_repeat_throughput() {
        let repeats = 10000;
        let mut s = String::with_capacity(repeats * 4);
        s.extend(iter::repeat("ab12").take(repeats));
        let mut p = many1(Sequence::new((Letter, Letter, Digit, Digit)));
        let mut ps = ParseState::new(&s);
        {
            time_test!();
            assert_eq!(repeats, p.parse(&mut ps).unwrap().len());
        }
    }
}
