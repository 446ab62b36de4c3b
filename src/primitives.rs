use crate::combinators::{self, RepeatSpec};
use crate::parser::{execerr, ParseError, ParseResult, Parser};
use crate::state::ParseState;

/// Matches one exact character. The single-character contract is enforced by
/// the `char` argument type.
#[derive(Clone)]
pub struct Char(char);

impl Char {
    pub fn new(c: char) -> Char {
        Char(c)
    }
}

impl Parser for Char {
    type Result = char;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match st.peek() {
            Some(c) if c == self.0 => {
                st.next();
                Ok(c)
            }
            Some(c) => Err(ParseError::Fail {
                expected: format!("character '{}'", self.0),
                found: format!("'{}'", c),
                position: st.index(),
            }),
            None => Err(ParseError::Eof {
                expected: format!("character '{}'", self.0),
                position: st.index(),
            }),
        }
    }
}

/// Matches an exact string.
#[derive(Clone)]
pub struct StringParser(String);

impl StringParser {
    /// Panics if `s` is empty: matching the empty string is a usage error at
    /// the call site, not a parse failure.
    pub fn new<S: AsRef<str>>(s: S) -> StringParser {
        let s = s.as_ref();
        assert!(!s.is_empty(), "StringParser must be given a non-empty string");
        StringParser(s.to_owned())
    }
}

impl Parser for StringParser {
    type Result = String;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        let start = st.index();
        let hold = st.hold();
        for want in self.0.chars() {
            match st.peek() {
                Some(c) if c == want => {
                    st.next();
                }
                Some(_) => {
                    st.reset(hold);
                    let found = st.lookahead(self.0.chars().count());
                    return Err(ParseError::Fail {
                        expected: format!("string \"{}\"", self.0),
                        found: format!("\"{}...\"", found),
                        position: start,
                    });
                }
                None => {
                    st.reset(hold);
                    return Err(ParseError::Eof {
                        expected: format!("string \"{}\"", self.0),
                        position: start,
                    });
                }
            }
        }
        st.release(hold);
        Ok(self.0.clone())
    }
}

/// Matches a single decimal digit.
pub struct Digit;

impl Parser for Digit {
    type Result = char;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match st.peek() {
            Some(c) if c.is_ascii_digit() => {
                st.next();
                Ok(c)
            }
            Some(c) => Err(ParseError::Fail {
                expected: "digit".to_string(),
                found: format!("'{}'", c),
                position: st.index(),
            }),
            None => Err(ParseError::Eof {
                expected: "digit".to_string(),
                position: st.index(),
            }),
        }
    }
}

/// Matches a single ASCII letter.
pub struct Letter;

impl Parser for Letter {
    type Result = char;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match st.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                st.next();
                Ok(c)
            }
            Some(c) => Err(ParseError::Fail {
                expected: "letter".to_string(),
                found: format!("'{}'", c),
                position: st.index(),
            }),
            None => Err(ParseError::Eof {
                expected: "letter".to_string(),
                position: st.index(),
            }),
        }
    }
}

/// Matches one character contained in the given set.
#[derive(Clone)]
pub struct OneOf(String);

impl OneOf {
    pub fn new<S: AsRef<str>>(set: S) -> OneOf {
        OneOf(set.as_ref().to_owned())
    }
}

impl Parser for OneOf {
    type Result = char;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match st.peek() {
            Some(c) if self.0.contains(c) => {
                st.next();
                Ok(c)
            }
            Some(c) => Err(ParseError::Fail {
                expected: format!("one of \"{}\"", self.0),
                found: format!("'{}'", c),
                position: st.index(),
            }),
            None => Err(ParseError::Eof {
                expected: format!("one of \"{}\"", self.0),
                position: st.index(),
            }),
        }
    }
}

/// Matches one character not contained in the given set.
#[derive(Clone)]
pub struct NoneOf(String);

impl NoneOf {
    pub fn new<S: AsRef<str>>(set: S) -> NoneOf {
        NoneOf(set.as_ref().to_owned())
    }
}

impl Parser for NoneOf {
    type Result = char;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        match st.peek() {
            Some(c) if !self.0.contains(c) => {
                st.next();
                Ok(c)
            }
            Some(c) => Err(ParseError::Fail {
                expected: format!("none of \"{}\"", self.0),
                found: format!("'{}'", c),
                position: st.index(),
            }),
            None => Err(ParseError::Eof {
                expected: format!("none of \"{}\"", self.0),
                position: st.index(),
            }),
        }
    }
}

/// Matches a signed decimal integer with at least one digit.
pub struct Int;

impl Parser for Int {
    type Result = i64;
    fn parse(&mut self, st: &mut ParseState) -> ParseResult<Self::Result> {
        let hold = st.hold();
        let mut negative = false;
        if let Some('-') = st.peek() {
            st.next();
            negative = true;
        }
        let mut result: i64 = 0;
        let mut digits = 0;
        while let Some(c) = st.peek() {
            match c.to_digit(10) {
                Some(d) => {
                    st.next();
                    result = result * 10 + d as i64;
                    digits += 1;
                }
                None => break,
            }
        }
        if digits == 0 {
            let err = match st.peek() {
                Some(c) => ParseError::Fail {
                    expected: "integer".to_string(),
                    found: format!("'{}'", c),
                    position: st.index(),
                },
                None => ParseError::Eof {
                    expected: "integer".to_string(),
                    position: st.index(),
                },
            };
            st.reset(hold);
            return Err(err);
        }
        st.release(hold);
        Ok(if negative { -result } else { result })
    }
}

/// A string of characters out of the given set, repeated per `spec`.
pub fn string_of<S: AsRef<str>>(set: S, spec: RepeatSpec) -> impl Parser<Result = String> {
    combinators::Repeat::new(OneOf::new(set), spec).apply(|cs| Ok(cs.into_iter().collect()))
}

/// A string of characters not in the given set, repeated per `spec`.
pub fn string_none_of<S: AsRef<str>>(set: S, spec: RepeatSpec) -> impl Parser<Result = String> {
    combinators::Repeat::new(NoneOf::new(set), spec).apply(|cs| Ok(cs.into_iter().collect()))
}

/// Zero or more ASCII whitespace characters.
pub fn whitespace() -> impl Parser<Result = String> {
    string_of(" \t\r\n", RepeatSpec::Any)
}

/// A floating point number such as `-1.25e-1`, assembled from the combinator
/// surface and converted with the standard float parser.
pub fn float() -> impl Parser<Result = f64> {
    let digits = || string_of("0123456789", RepeatSpec::Min(1));
    let mantissa = combinators::Sequence::new((
        combinators::possibly(Char::new('-')),
        digits(),
        combinators::possibly(combinators::take_right(Char::new('.'), digits())),
    ));
    let exponent = combinators::possibly(combinators::Sequence::new((
        OneOf::new("eE"),
        combinators::possibly(OneOf::new("+-")),
        digits(),
    )));
    combinators::Sequence::new((mantissa, exponent)).apply(|((sign, int, frac), exp)| {
        let mut repr = String::new();
        if sign.is_some() {
            repr.push('-');
        }
        repr.push_str(&int);
        if let Some(frac) = frac {
            repr.push('.');
            repr.push_str(&frac);
        }
        if let Some((e, esign, edigits)) = exp {
            repr.push(e);
            if let Some(esign) = esign {
                repr.push(esign);
            }
            repr.push_str(&edigits);
        }
        repr.parse::<f64>().map_err(|e| execerr(e.to_string()))
    })
}
