//! Worker threads: each scans one half of the currently mapped file.

use crate::matcher::Matcher;
use crate::scan::ScanContext;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// One matching line found by a worker: its line number local to the half it scanned, and the
/// raw (untruncated) line bytes.
pub struct WorkerHit {
    pub line_no: u32,
    pub text: Vec<u8>,
}

/// Scan `haystack` line by line against `matcher`, returning every matching line with a
/// 1-based line number local to `haystack`.
pub fn scan_half(haystack: &[u8], matcher: &Matcher) -> Vec<WorkerHit> {
    let mut hits = Vec::new();
    if haystack.is_empty() {
        return hits;
    }

    // `split` on a trailing newline yields one extra empty slice after it; that slice is not a
    // line and must not be counted.
    let ends_with_newline = haystack.last() == Some(&b'\n');
    let mut lines = haystack.split(|&b| b == b'\n').peekable();

    let mut line_no = 0u32;
    while let Some(line) = lines.next() {
        if ends_with_newline && lines.peek().is_none() {
            break;
        }
        line_no += 1;
        if matcher.is_match(line) {
            hits.push(WorkerHit {
                line_no,
                text: line.to_vec(),
            });
        }
    }
    hits
}

/// Body of worker thread `idx` (0 or 1). Blocks on `data_ready[idx]`, scans its half of the
/// current file once woken, publishes hits, and signals `data_consumed[idx]`. Exits once the
/// context is marked done.
pub fn worker_loop(idx: usize, ctx: Arc<ScanContext>) {
    log::debug!("worker {idx} started");
    loop {
        ctx.data_ready[idx].acquire();

        if ctx.done.load(Ordering::Acquire) {
            ctx.data_consumed[idx].release();
            break;
        }

        let file = {
            let guard = ctx.current_file.lock();
            guard.clone().expect("current_file set before data_ready release")
        };

        let half: &[u8] = if idx == 0 {
            file.first_half()
        } else {
            file.second_half()
        };

        let hits = scan_half(half, &ctx.matcher);

        if idx == 0 {
            let local_line_count = half.iter().filter(|&&b| b == b'\n').count() as u32;
            file.set_midline(local_line_count);
        }

        *ctx.worker_hits[idx].lock() = hits;
        ctx.data_consumed[idx].release();
    }
    log::debug!("worker {idx} exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;

    #[test]
    fn scan_half_finds_matching_lines_with_line_numbers() {
        let matcher = Matcher::new("foo", false, false).unwrap();
        let haystack = b"foo one\nbar two\nfoo three\n";
        let hits = scan_half(haystack, &matcher);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].line_no, 1);
        assert_eq!(hits[0].text, b"foo one");
        assert_eq!(hits[1].line_no, 3);
    }

    #[test]
    fn scan_half_handles_no_trailing_newline() {
        let matcher = Matcher::new("last", false, false).unwrap();
        let haystack = b"first\nlast line";
        let hits = scan_half(haystack, &matcher);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line_no, 2);
    }

    #[test]
    fn scan_half_on_empty_slice_finds_nothing() {
        let matcher = Matcher::new("x", false, false).unwrap();
        assert!(scan_half(b"", &matcher).is_empty());
    }
}
