use std::io;

use utf8reader;

struct UTF8Reader<R: io::Read>(utf8reader::UTF8Reader<R>);

impl<R: io::Read> Iterator for UTF8Reader<R> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.next() {
                None => return None,
                Some(Err(_)) => continue,
                Some(Ok(c)) => return Some(c),
            }
        }
    }
}

/// ParseState holds the full input and the current position within it. The
/// input is fixed for the lifetime of one parse; only the position moves.
#[derive(Debug)]
pub struct ParseState {
    buf: Vec<char>,
    current: usize,
}

/// A Hold captures the position at a certain point so a combinator can
/// "un-consume" input after a failed attempt. A panic occurs if a `Hold` is
/// dropped without first being passed back to `ParseState::release()` or
/// `ParseState::reset()`.
pub struct Hold {
    ix: usize,
    released: bool,
}

impl Hold {
    fn new(ix: usize) -> Hold {
        Hold {
            ix,
            released: false,
        }
    }
    fn defuse(&mut self) {
        self.released = true;
    }
}

impl Drop for Hold {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(self.released, "Dropped unreleased hold! This is a bug");
        }
    }
}

impl ParseState {
    /// Initialize ParseState from a string.
    pub fn new(s: &str) -> ParseState {
        ParseState {
            buf: s.chars().collect(),
            current: 0,
        }
    }

    /// Initialize ParseState from a UTF-8 encoded source. The entire source
    /// is decoded up front; invalid sequences are skipped.
    pub fn from_reader<R: io::Read>(r: R) -> ParseState {
        ParseState {
            buf: UTF8Reader(utf8reader::UTF8Reader::new(r)).collect(),
            current: 0,
        }
    }

    /// Return current position in the input.
    pub fn index(&self) -> usize {
        self.current
    }

    /// Remember the current position in the input.
    pub fn hold(&self) -> Hold {
        Hold::new(self.current)
    }

    /// Notify the ParseState that a `Hold` is no longer needed.
    pub fn release(&mut self, mut h: Hold) {
        h.defuse();
    }

    /// Rewind to the position `h` was created at.
    pub fn reset(&mut self, mut h: Hold) {
        self.current = h.ix;
        h.defuse();
    }

    /// Returns true if no input is left.
    pub fn finished(&self) -> bool {
        self.current == self.buf.len()
    }

    /// Return the next character in the input without advancing.
    pub fn peek(&self) -> Option<char> {
        self.buf.get(self.current).copied()
    }

    /// Return up to `n` upcoming characters without advancing. Used by error
    /// messages that preview what was found instead of a match.
    pub fn lookahead(&self, n: usize) -> String {
        self.buf[self.current..].iter().take(n).collect()
    }
}

impl Iterator for ParseState {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self.buf.get(self.current) {
            Some(&c) => {
                self.current += 1;
                Some(c)
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::primitives;

    #[test]
    fn test_basic() {
        let mut s = ParseState::new("Hello");
        assert_eq!(Some('H'), s.next());
        let rest: String = s.collect();
        assert_eq!("ello", rest);

        let mut s = ParseState::new("Hello");
        let hold = s.hold();
        s.next();
        s.next();
        s.next();
        assert_eq!(Some('l'), s.peek());
        assert_eq!(Some('l'), s.next());
        s.reset(hold);
        assert_eq!(0, s.index());
        let rest: String = s.collect();
        assert_eq!("Hello", rest);
    }

    #[test]
    fn test_finished() {
        let mut s = ParseState::new("ab");
        assert!(!s.finished());
        s.next();
        s.next();
        assert!(s.finished());
        assert_eq!(None, s.peek());
    }

    #[test]
    #[should_panic]
    fn test_hold_unreleased() {
        let s = ParseState::new("abcde");
        let _hold = s.hold();
    }

    #[test]
    fn test_utf8_reader() {
        let s = "Hüðslþ".to_owned();
        let mut ps = ParseState::from_reader(s.as_bytes());
        assert_eq!(Some('H'), ps.next());
        assert_eq!(
            Ok("üð".to_string()),
            primitives::StringParser::new("üð").parse(&mut ps)
        );
    }
}
