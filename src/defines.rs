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

//! The macro definition table.
//!
//! Macro names hash into a fixed set of 256 chained buckets.  The bucket
//! index is the wrapping sum of the name's bytes, which keeps the layout
//! stable for a given set of names regardless of insertion order or table
//! history.

use crate::error::PreprocessorError;

const BUCKET_COUNT: usize = 256;

/// A macro name bound to its replacement text.
#[derive(Clone, Debug)]
struct Define {
    identifier: String,
    definition: String,
}

/// Macro bindings, unique per identifier.
pub struct DefineTable {
    buckets: Vec<Vec<Define>>,
}

impl DefineTable {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
        }
    }

    fn bucket(identifier: &str) -> usize {
        identifier.bytes().fold(0u8, u8::wrapping_add) as usize
    }

    /// Binds `identifier` to `definition`.  An identifier may be bound only
    /// once; rebinding fails and leaves the table unchanged.
    pub fn add(&mut self, identifier: &str, definition: &str) -> Result<(), PreprocessorError> {
        let bucket = &mut self.buckets[Self::bucket(identifier)];
        if bucket.iter().any(|define| define.identifier == identifier) {
            return Err(PreprocessorError::AlreadyDefined(String::from(identifier)));
        }
        bucket.push(Define {
            identifier: String::from(identifier),
            definition: String::from(definition),
        });
        Ok(())
    }

    /// Removes `identifier`, reporting whether it was bound.
    pub fn remove(&mut self, identifier: &str) -> bool {
        let bucket = &mut self.buckets[Self::bucket(identifier)];
        match bucket.iter().position(|define| define.identifier == identifier) {
            Some(index) => {
                bucket.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the replacement text bound to `identifier`.
    pub fn find(&self, identifier: &str) -> Option<&str> {
        self.buckets[Self::bucket(identifier)]
            .iter()
            .find(|define| define.identifier == identifier)
            .map(|define| define.definition.as_str())
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

impl Default for DefineTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::DefineTable;
    use crate::error::PreprocessorError;

    #[test]
    fn round_trip() {
        let mut table = DefineTable::new();
        assert_eq!(table.find("FOO"), None);
        table.add("FOO", "1").unwrap();
        assert_eq!(table.find("FOO"), Some("1"));
        assert!(table.remove("FOO"));
        assert_eq!(table.find("FOO"), None);
        assert!(!table.remove("FOO"));
    }

    #[test]
    fn duplicate_leaves_table_unchanged() {
        let mut table = DefineTable::new();
        table.add("A", "x").unwrap();
        assert_eq!(
            table.add("A", "y"),
            Err(PreprocessorError::AlreadyDefined(String::from("A")))
        );
        assert_eq!(table.find("A"), Some("x"));
    }

    #[test]
    fn colliding_names() {
        // "ab" and "ba" sum to the same bucket.
        let mut table = DefineTable::new();
        table.add("ab", "first").unwrap();
        table.add("ba", "second").unwrap();
        assert_eq!(table.find("ab"), Some("first"));
        assert_eq!(table.find("ba"), Some("second"));
        assert!(table.remove("ab"));
        assert_eq!(table.find("ba"), Some("second"));
    }

    #[test]
    fn empty_definition() {
        let mut table = DefineTable::new();
        table.add("EMPTY", "").unwrap();
        assert_eq!(table.find("EMPTY"), Some(""));
    }

    #[test]
    fn clear_drops_everything() {
        let mut table = DefineTable::new();
        table.add("A", "1").unwrap();
        table.add("B", "2").unwrap();
        table.clear();
        assert_eq!(table.find("A"), None);
        assert_eq!(table.find("B"), None);
    }
}
