use std::ffi::{OsStr, OsString};
use std::fmt;
use std::ops::Deref;

/// An owned, ordered list of arguments.
///
/// Elements are raw OS strings, so arguments that are not valid UTF-8 survive
/// unchanged. The vector owns every element; dropping it drops them all.
/// There are no gaps, so the length always marks the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgVector(Vec<OsString>);

impl ArgVector {
    pub fn into_vec(self) -> Vec<OsString> {
        self.0
    }

    pub fn as_slice(&self) -> &[OsString] {
        &self.0
    }
}

impl Deref for ArgVector {
    type Target = [OsString];

    fn deref(&self) -> &[OsString] {
        &self.0
    }
}

impl From<Vec<OsString>> for ArgVector {
    fn from(args: Vec<OsString>) -> Self {
        Self(args)
    }
}

impl From<ArgVector> for Vec<OsString> {
    fn from(args: ArgVector) -> Self {
        args.0
    }
}

impl<S: Into<OsString>> FromIterator<S> for ArgVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for ArgVector {
    type Item = OsString;
    type IntoIter = std::vec::IntoIter<OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArgVector {
    type Item = &'a OsString;
    type IntoIter = std::slice::Iter<'a, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: AsRef<OsStr>> PartialEq<Vec<T>> for ArgVector {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.0.len() == other.len()
            && self.0.iter().zip(other).all(|(a, b)| a.as_os_str() == b.as_ref())
    }
}

/// Space-separated, with invalid UTF-8 shown as U+FFFD.
impl fmt::Display for ArgVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Deep-copies an argument vector. Every element of the copy is a fresh
/// allocation, so changing one vector never shows through the other.
///
/// `None` is passed through.
pub fn duplicate(args: Option<&[OsString]>) -> Option<ArgVector> {
    args.map(|args| args.iter().cloned().collect())
}

/// Releases an argument vector together with every element it owns.
/// Releasing `None` does nothing.
pub fn release(args: Option<ArgVector>) {
    drop(args);
}
