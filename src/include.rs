// shaderpp - a preprocessor for HLSL-style shader source.
// Copyright (C) 2026 The shaderpp authors.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! Include resolution.
//!
//! The preprocessor core does not touch the filesystem.  Whenever it meets an
//! `#include`, it asks an [IncludeResolver] for the named unit's source and
//! hands the buffer back through [IncludeResolver::close] when the unit has
//! been fully consumed.  [FileResolver] is the stock implementation used when
//! a caller has no special needs.

use std::{
    fs,
    io::Result as IoResult,
    path::{Path, PathBuf},
};

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Which of the two `#include` spellings named the unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IncludeKind {
    /// `#include "..."`.
    Local,

    /// `#include <...>`.
    System,
}

/// Supplies the source text of included translation units.
pub trait IncludeResolver {
    /// Returns the contents of `filename`, or `None` if it cannot be
    /// resolved.  `parent` is the file name of the including unit, if it has
    /// one, so relative references can be resolved against it.
    fn open(&mut self, kind: IncludeKind, filename: &str, parent: Option<&str>) -> Option<String>;

    /// Takes back a buffer previously returned by
    /// [open](IncludeResolver::open), once its translation unit has been
    /// popped.  The default simply drops it.
    fn close(&mut self, source: String) {
        drop(source);
    }
}

/// Reads `path` and recodes it to UTF-8.  When `encoding` is `None` the
/// encoding is guessed from the contents.
pub fn read_source(path: &Path, encoding: Option<&'static Encoding>) -> IoResult<String> {
    let bytes = fs::read(path)?;
    let encoding = encoding.unwrap_or_else(|| {
        let mut encoding_detector = EncodingDetector::new();
        encoding_detector.feed(&bytes, true);
        encoding_detector.guess(None, true)
    });
    let (contents, _malformed) = encoding.decode_with_bom_removal(&bytes);
    Ok(contents.into_owned())
}

/// Filesystem-backed include resolution over an ordered list of search
/// directories.
///
/// A `Local` include is first tried next to the including file, then in each
/// search directory; a `System` include skips the parent-relative step.
pub struct FileResolver {
    search_path: Vec<PathBuf>,
    encoding: Option<&'static Encoding>,
}

impl FileResolver {
    pub fn new() -> Self {
        Self {
            search_path: vec![PathBuf::from(".")],
            encoding: None,
        }
    }

    /// Returns a resolver searching `dirs` in order, with no implied `.`.
    pub fn with_search_path<P>(dirs: impl IntoIterator<Item = P>) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            search_path: dirs
                .into_iter()
                .map(|dir| dir.as_ref().to_path_buf())
                .collect(),
            encoding: None,
        }
    }

    /// Appends `dir` to the search path.
    pub fn push_search_dir<P>(&mut self, dir: P)
    where
        P: AsRef<Path>,
    {
        self.search_path.push(dir.as_ref().to_path_buf());
    }

    /// Forces `encoding` instead of guessing per file.
    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IncludeResolver for FileResolver {
    fn open(&mut self, kind: IncludeKind, filename: &str, parent: Option<&str>) -> Option<String> {
        if kind == IncludeKind::Local {
            if let Some(dir) = parent.and_then(|parent| Path::new(parent).parent()) {
                if !dir.as_os_str().is_empty() {
                    if let Ok(contents) = read_source(&dir.join(filename), self.encoding) {
                        return Some(contents);
                    }
                }
            }
        }
        self.search_path
            .iter()
            .find_map(|dir| read_source(&dir.join(filename), self.encoding).ok())
    }
}
