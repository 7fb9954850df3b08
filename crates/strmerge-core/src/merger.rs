//! Merge engine for carrying translations over to a regenerated table

use crate::error::Result;
use crate::parser::parse_strings;
use crate::table::{Entry, Table};
use crate::writer::write_strings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of how keys moved between the base and incoming tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Keys present in both tables; the base value was kept
    pub kept: Vec<String>,
    /// Keys only in the incoming table, copied as extracted
    pub added: Vec<String>,
    /// Keys only in the base table, left out of the result
    pub dropped: Vec<String>,
}

impl MergeReport {
    /// Classify keys the same way `merge_tables` treats them
    pub fn compute(base: &Table, incoming: &Table) -> Self {
        let (kept, added) = incoming
            .keys()
            .map(str::to_string)
            .partition(|key: &String| base.contains_key(key.as_str()));

        let dropped = base
            .keys()
            .filter(|key| !incoming.contains_key(key))
            .map(str::to_string)
            .collect();

        Self {
            kept,
            added,
            dropped,
        }
    }
}

/// Merge a base (translated) table with an incoming (freshly extracted) one.
///
/// The result has exactly the incoming keys, in incoming order, with
/// incoming comments. Keys that also exist in `base` keep the base value.
pub fn merge_tables(base: &Table, incoming: &Table) -> Table {
    incoming
        .entries()
        .iter()
        .map(|entry| match base.get(&entry.key) {
            Some(existing) => Entry {
                comments: entry.comments.clone(),
                ..existing.clone()
            },
            None => entry.clone(),
        })
        .collect()
}

/// Merge two .strings files and write the result.
///
/// Both inputs are parsed before anything is written, so a malformed or
/// missing input leaves every file untouched. `merged` may name one of the
/// inputs.
pub fn merge_files<P, Q, R>(old: P, new: Q, merged: R) -> Result<MergeReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let base = parse_strings(old)?;
    let incoming = parse_strings(new)?;

    let result = merge_tables(&base, &incoming);
    write_strings(&result, merged)?;

    Ok(MergeReport::compute(&base, &incoming))
}
