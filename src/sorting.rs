//! The ordering invariant on a bundle's match records: (path, line, match-start).

use crate::types::MatchRecord;

/// Sort in place. Stable across runs given the same input and regex.
pub fn sort_records(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(a.line_number.cmp(&b.line_number))
            .then(a.match_start.cmp(&b.match_start))
    });
}
