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

#![no_main]

use libfuzzer_sys::fuzz_target;
use shaderpp::{
    include::{IncludeKind, IncludeResolver},
    output::preprocess_with,
};

/// Answers every `#include` with a tiny fixed unit, so fuzz inputs can reach
/// the include machinery without touching the filesystem.
struct CannedInclude;

impl IncludeResolver for CannedInclude {
    fn open(&mut self, _kind: IncludeKind, filename: &str, _parent: Option<&str>) -> Option<String> {
        (!filename.contains("missing")).then(|| String::from("inc;\n"))
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = preprocess_with(Some("fuzz.fx"), input, &[("FUZZ", "1")], CannedInclude);
    }
});
