use crate::argv::ArgVector;
use std::ffi::OsString;
use std::iter::{Copied, Peekable};
use std::os::unix::ffi::OsStringExt;
use std::slice::Iter;

/// Slots reserved up front for a freshly built vector.
const INITIAL_CAPACITY: usize = 8;

type Bytes<'a> = Peekable<Copied<Iter<'a, u8>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Whitespace as the C locale sees it: space, `\t`, `\n`, `\v`, `\f` and `\r`.
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Returns `true` if `input` is empty or holds nothing but whitespace.
pub fn only_whitespace(input: &[u8]) -> bool {
    input.iter().all(|&b| is_space(b))
}

fn skip_whitespace(bytes: &mut Bytes<'_>) {
    while bytes.next_if(|&b| is_space(b)).is_some() {}
}

/// Splits an input string into a vector of arguments.
///
/// This tokenizer handles:
/// - Single quotes (`'...'`): Preserves literal contents, backslash included.
/// - Double quotes (`"..."`): Preserves contents, a backslash copies the next
///   byte verbatim.
/// - Unquoted text: Split by whitespace, a backslash copies the next byte
///   verbatim.
///
/// Input is handled byte by byte and need not be UTF-8; every byte that is
/// not a quote, backslash or whitespace is copied through unchanged.
///
/// Quotes that are never closed, and a trailing backslash, end silently at
/// the end of the input.
///
/// An empty or all-whitespace input yields one empty argument, never an
/// empty vector.
///
/// # Example
/// ```
/// use argv_expand::split;
///
/// let args = split("echo 'hello world'");
/// assert_eq!(args, vec!["echo", "hello world"]);
/// ```
pub fn split<B: AsRef<[u8]> + ?Sized>(input: &B) -> ArgVector {
    let mut args = Vec::with_capacity(INITIAL_CAPACITY);
    let mut bytes = input.as_ref().iter().copied().peekable();

    loop {
        skip_whitespace(&mut bytes);

        let mut arg = Vec::new();
        let mut quote = Quote::None;
        let mut escaped = false;

        while let Some(&b) = bytes.peek() {
            if is_space(b) && quote == Quote::None && !escaped {
                break;
            }
            bytes.next();

            if escaped {
                escaped = false;
                arg.push(b);
                continue;
            }

            match (quote, b) {
                (Quote::Single, b'\'') => quote = Quote::None,
                (Quote::Single, _) => arg.push(b),
                (_, b'\\') => escaped = true,
                (Quote::Double, b'"') => quote = Quote::None,
                (Quote::None, b'\'') => quote = Quote::Single,
                (Quote::None, b'"') => quote = Quote::Double,
                _ => arg.push(b),
            }
        }
        args.push(OsString::from_vec(arg));

        skip_whitespace(&mut bytes);
        if bytes.peek().is_none() {
            break;
        }
    }

    ArgVector::from(args)
}

/// Like [`split`], but keeps the difference between no input at all and an
/// empty string: `None` in, `None` out.
pub fn tokenize(input: Option<&[u8]>) -> Option<ArgVector> {
    input.map(|bytes| split(bytes))
}
