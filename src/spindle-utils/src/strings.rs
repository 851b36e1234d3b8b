//! String composition helpers.

use std::io::{self, Write};

#[inline]
fn total_len<S: AsRef<str>>(args: &[S]) -> usize {
    args.iter().map(|s| s.as_ref().len()).sum()
}

/// Joins `args` with `sep` in between.
///
/// Behaves like `[S]::join`, but takes anything that dereferences
/// to a string and allocates exactly once.
pub fn str_join<S: AsRef<str>>(sep: &str, args: &[S]) -> String {
    match args {
        [] => String::new(),
        [only] => only.as_ref().to_owned(),

        [first, rest @ ..] => {
            let mut out = String::with_capacity(sep.len() * rest.len() + total_len(args));

            out.push_str(first.as_ref());
            for s in rest {
                out.push_str(sep);
                out.push_str(s.as_ref());
            }

            out
        }
    }
}

/// Joins `args` using a separate separator after the first argument,
/// between the middle ones, and before the last one.
///
/// ```
/// # use spindle_utils::strings::str_join_ex;
/// let s = str_join_ex([": ", ", ", ", and "], &["AAA", "BBB", "CCC", "DDD"]);
/// assert_eq!(s, "AAA: BBB, CCC, and DDD");
/// ```
///
/// With two arguments only the first separator is used.
pub fn str_join_ex<S: AsRef<str>>(sep: [&str; 3], args: &[S]) -> String {
    let [head, middle, tail] = sep;

    match args {
        [] => String::new(),
        [only] => only.as_ref().to_owned(),
        [a, b] => [a.as_ref(), head, b.as_ref()].concat(),

        [first, second, inner @ .., last] => {
            let len = head.len() + middle.len() * inner.len() + tail.len() + total_len(args);
            let mut out = String::with_capacity(len);

            out.push_str(first.as_ref());
            out.push_str(head);
            out.push_str(second.as_ref());
            for s in inner {
                out.push_str(middle);
                out.push_str(s.as_ref());
            }
            out.push_str(tail);
            out.push_str(last.as_ref());

            out
        }
    }
}

/// Writes the UTF-8 encoding of `ch` to `w`.
#[inline]
pub fn write_rune<W: Write + ?Sized>(w: &mut W, ch: char) -> io::Result<()> {
    let mut buf = [0; 4];
    w.write_all(ch.encode_utf8(&mut buf).as_bytes())
}
