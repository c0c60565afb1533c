//! Line matcher: streams one file's lines and yields a match record per
//! non-overlapping regex span, left to right.

use std::io::{BufRead, BufReader};

use bstr::ByteSlice;
use strsim::levenshtein;

use crate::error::EngineError;
use crate::types::{FileEntry, MatchRecord, SearchHandle};

const SUGGESTION_DISTANCE_THRESHOLD: usize = 3;

/// A compiled pattern, ready to be matched against a file's lines.
///
/// `spans` does double duty: it drives the line-level `is_match` check and
/// re-scans a matching line with `find_iter` to enumerate every
/// non-overlapping span it contains.
pub struct CompiledPattern {
    spans: regex::bytes::Regex,
    pub raw: String,
}

impl CompiledPattern {
    pub fn compile(pattern: &str, case_sensitive: bool) -> Result<Self, EngineError> {
        let spans = regex::bytes::RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| EngineError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            spans,
            raw: pattern.to_string(),
        })
    }
}

/// Outcome of searching one file.
#[derive(Default)]
pub struct FileSearchOutcome {
    pub records: Vec<MatchRecord>,
    pub error: Option<String>,
    /// Non-matching lines gathered for the best-effort suggestion feature,
    /// only populated when the file produced zero matches.
    pub suggestion_candidates: Vec<String>,
}

/// Search one file line by line, checking `handle` for cancellation before
/// each line is read so a cancelled search stops within one line's worth of
/// work rather than running to the end of the file.
pub fn search_file(
    pattern: &CompiledPattern,
    entry: &FileEntry,
    handle: &SearchHandle,
    collect_suggestions: bool,
) -> FileSearchOutcome {
    let file = match std::fs::File::open(&entry.path) {
        Ok(f) => f,
        Err(e) => {
            return FileSearchOutcome {
                error: Some(format!("{}: {e}", entry.path.display())),
                ..Default::default()
            }
        }
    };

    let needle = pattern.raw.to_lowercase();
    let mut reader = BufReader::new(file);
    let mut raw_line = Vec::new();
    let mut line_number: u64 = 0;
    let mut records = Vec::new();
    let mut suggestion_candidates = Vec::new();

    loop {
        if handle.is_cancelled() {
            break;
        }

        raw_line.clear();
        let read = match reader.read_until(b'\n', &mut raw_line) {
            Ok(n) => n,
            Err(e) => {
                return FileSearchOutcome {
                    records,
                    error: Some(format!("{}: {e}", entry.path.display())),
                    suggestion_candidates: Vec::new(),
                }
            }
        };
        if read == 0 {
            break;
        }
        line_number += 1;

        let line = raw_line
            .as_slice()
            .to_str_lossy()
            .trim_end_matches(['\n', '\r'])
            .to_string();

        let mut matched_this_line = false;
        for m in pattern.spans.find_iter(line.as_bytes()) {
            matched_this_line = true;
            records.push(MatchRecord {
                path: entry.path.clone(),
                line_number,
                line: line.clone(),
                match_start: m.start(),
                match_end: m.end(),
                file_size: entry.size,
                modified: entry.modified,
            });
        }

        if !matched_this_line
            && collect_suggestions
            && !line.is_empty()
            && levenshtein(&line.to_lowercase(), &needle) <= SUGGESTION_DISTANCE_THRESHOLD
        {
            suggestion_candidates.push(line);
        }
    }

    // Suggestions are only a meaningful UX hint when the file had no matches
    // at all; discard any candidates gathered before a later line matched.
    let suggestion_candidates = if records.is_empty() {
        suggestion_candidates
    } else {
        Vec::new()
    };

    FileSearchOutcome {
        records,
        error: None,
        suggestion_candidates,
    }
}
