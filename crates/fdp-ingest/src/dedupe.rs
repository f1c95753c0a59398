//! Record deduplication within one file's pass
//!
//! Signatures live only in memory for the duration of a single call, so
//! duplicate detection never spans files or runs.

use std::collections::HashSet;

use crate::record::RawRecord;

/// Drop records whose content signature was already seen in this pass.
///
/// Input order is preserved; the first occurrence of each distinct signature
/// wins.
pub fn dedupe(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.content_signature()))
        .collect()
}
