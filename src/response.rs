use crate::argv::duplicate;
use crate::error::{ConfigError, ExpandError};
use crate::parser::{only_whitespace, split};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Marks an argument as a reference to a response file.
pub const MARKER: u8 = b'@';

/// How many `@` references a single expansion may encounter.
pub const DEFAULT_MAX_RESPONSE_FILES: u32 = 2000;

/// Environment variable overriding [`DEFAULT_MAX_RESPONSE_FILES`].
pub const MAX_FILES_VAR: &str = "ARGV_EXPAND_MAX_FILES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Budget shared by every reference seen during one call, whether or not
    /// it names a readable file. Expansion fails once it is used up.
    pub max_response_files: u32,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_response_files: DEFAULT_MAX_RESPONSE_FILES,
        }
    }
}

impl ExpandOptions {
    /// Reads options from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads options through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup(MAX_FILES_VAR) else {
            return Ok(Self::default());
        };

        match value.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self {
                max_response_files: n,
            }),
            _ => Err(ConfigError::InvalidLimit {
                var: MAX_FILES_VAR,
                value,
            }),
        }
    }
}

/// What the host reports for a response file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The path could not be statted, opened or read.
    Missing,
    Directory,
    /// Raw file contents; no encoding is assumed.
    Contents(Vec<u8>),
}

/// Where response files come from.
pub trait ResponseFileSource {
    fn load(&self, path: &Path) -> Lookup;
}

/// Resolves response files against the real file system. Paths are used
/// verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl ResponseFileSource for HostFs {
    fn load(&self, path: &Path) -> Lookup {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "cannot stat response file");
                return Lookup::Missing;
            }
        };
        if metadata.is_dir() {
            return Lookup::Directory;
        }

        match fs::read(path) {
            Ok(bytes) => Lookup::Contents(bytes),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "cannot read response file");
                Lookup::Missing
            }
        }
    }
}

/// Expands `@file` references in `args` using the real file system and the
/// default budget. See [`expand_with`].
pub fn expand(args: &[OsString]) -> Result<Cow<'_, [OsString]>, ExpandError> {
    expand_with(args, &HostFs, &ExpandOptions::default())
}

/// Replaces every `@path` argument with the arguments read from `path`.
///
/// Element 0 is the program name and is never expanded. A reference whose
/// file is missing or unreadable stays in place as an ordinary argument. An
/// empty or blank file makes its reference disappear. Arguments spliced in
/// are scanned again, so response files may name other response files.
///
/// The input is never modified. If nothing was substituted the result
/// borrows `args`; otherwise it is a private deep copy and the new argument
/// count is its length.
pub fn expand_with<'a, S>(
    args: &'a [OsString],
    source: &S,
    options: &ExpandOptions,
) -> Result<Cow<'a, [OsString]>, ExpandError>
where
    S: ResponseFileSource + ?Sized,
{
    let mut args = Cow::Borrowed(args);
    let mut remaining = options.max_response_files;
    let mut i = 1;

    while i < args.len() {
        let Some(rest) = args[i].as_bytes().strip_prefix(&[MARKER]) else {
            i += 1;
            continue;
        };
        let path = Path::new(OsStr::from_bytes(rest));

        remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            warn!(path = %path.display(), "response file limit reached");
            return Err(ExpandError::TooManyResponseFiles {
                program: program_name(&args),
            });
        }

        let contents = match source.load(path) {
            Lookup::Missing => {
                trace!(path = %path.display(), "leaving unresolved reference in place");
                i += 1;
                continue;
            }
            Lookup::Directory => {
                warn!(path = %path.display(), "response file is a directory");
                return Err(ExpandError::Directory {
                    program: program_name(&args),
                    path: path.to_path_buf(),
                });
            }
            Lookup::Contents(contents) => contents,
        };

        let replacement = if only_whitespace(&contents) {
            Vec::new()
        } else {
            split(&contents).into_vec()
        };
        debug!(path = %path.display(), count = replacement.len(), "expanded response file");

        if let Cow::Borrowed(original) = &args {
            let copy = duplicate(Some(*original)).unwrap_or_default();
            args = Cow::Owned(copy.into_vec());
        }
        args.to_mut().splice(i..=i, replacement);
    }

    Ok(args)
}

fn program_name(args: &[OsString]) -> String {
    args.first()
        .map(|program| program.to_string_lossy().into_owned())
        .unwrap_or_default()
}
