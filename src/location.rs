//! Fault locations - the `filename:line` targets under analysis
//!
//! Format: `<filename>:<line>`, e.g. `test.c:14`. The *last* colon separates
//! the line number, so filenames containing colons still parse.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A suspected defect site: a source filename plus a 1-indexed line.
///
/// Used as a lookup key throughout the analysis; equality is structural and
/// ordering is (filename, line) so result maps iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaultLocation {
    /// Source filename as recorded in the module's debug metadata
    pub filename: String,
    /// Line number within the file (1-indexed)
    pub line: u32,
}

impl FaultLocation {
    /// Create a new fault location
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }

    /// Parse a `<filename>:<line>` string into a FaultLocation
    pub fn parse(spec: &str) -> Result<Self> {
        let (filename, line_str) = spec
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidFaultLocation(spec.to_string()))?;

        if filename.is_empty() {
            return Err(Error::InvalidFaultLocation(spec.to_string()));
        }

        let line: u32 = line_str
            .parse()
            .map_err(|_| Error::InvalidFaultLocation(spec.to_string()))?;

        // Debug lines are 1-indexed; line 0 marks "no location" in metadata.
        if line == 0 {
            return Err(Error::InvalidFaultLocation(spec.to_string()));
        }

        Ok(Self {
            filename: filename.to_string(),
            line,
        })
    }

    /// Check whether this location lies in the given source file
    pub fn is_in_file(&self, filename: &str) -> bool {
        self.filename == filename
    }
}

impl fmt::Display for FaultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

impl FromStr for FaultLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for FaultLocation {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FaultLocation {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FaultLocation::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a batch of fault-location strings.
///
/// Returns the set of valid locations (deduplicated) plus every rejected
/// entry with its error, so the caller can surface each rejection while still
/// analyzing the valid rest.
pub fn parse_many<S: AsRef<str>>(specs: &[S]) -> (BTreeSet<FaultLocation>, Vec<(String, Error)>) {
    let mut locations = BTreeSet::new();
    let mut rejected = Vec::new();

    for spec in specs {
        match FaultLocation::parse(spec.as_ref()) {
            Ok(location) => {
                locations.insert(location);
            }
            Err(e) => rejected.push((spec.as_ref().to_string(), e)),
        }
    }

    (locations, rejected)
}
