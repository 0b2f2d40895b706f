//! The concurrent scan pipeline: one splitter round per file, two worker threads, one collator.
//!
//! Five semaphores drive the handoff between the three background threads and whichever thread
//! drives [`Pipeline::submit_file`] (the directory walker): `new_file_signal` (initially 1) gates
//! overwriting `current_file` until the previous round's workers and collator are done with it;
//! `data_ready[i]` (initially 0) wakes worker `i`; `data_consumed[i]` (initially 0) tells the
//! collator worker `i` has published its hits.

pub mod collator;
pub mod splitter;
pub mod walker;
pub mod worker;

use crate::error::Result;
use crate::matcher::Matcher;
use crate::model::Search;
use crate::sync::Semaphore;
use parking_lot::Mutex;
use splitter::MappedFile;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use worker::WorkerHit;

/// Shared state for the worker and collator threads. Never exposed directly outside this module;
/// callers drive the pipeline through [`Pipeline`].
pub struct ScanContext {
    matcher: Arc<Matcher>,
    new_file_signal: Semaphore,
    data_ready: [Semaphore; 2],
    data_consumed: [Semaphore; 2],
    current_file: Mutex<Option<Arc<MappedFile>>>,
    worker_hits: [Mutex<Vec<WorkerHit>>; 2],
    done: AtomicBool,
}

impl ScanContext {
    fn new(matcher: Matcher) -> Self {
        ScanContext {
            matcher: Arc::new(matcher),
            new_file_signal: Semaphore::new(1),
            data_ready: [Semaphore::new(0), Semaphore::new(0)],
            data_consumed: [Semaphore::new(0), Semaphore::new(0)],
            current_file: Mutex::new(None),
            worker_hits: [Mutex::new(Vec::new()), Mutex::new(Vec::new())],
            done: AtomicBool::new(false),
        }
    }
}

/// A running scan pipeline: two worker threads plus a collator thread, all parked on
/// `ScanContext`'s semaphores between files.
pub struct Pipeline {
    ctx: Arc<ScanContext>,
    worker_handles: [Option<JoinHandle<()>>; 2],
    collator_handle: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Spawn the worker and collator threads and return a handle to submit files against `root`.
    pub fn spawn(matcher: Matcher, root: Arc<Mutex<Search>>) -> Self {
        let ctx = Arc::new(ScanContext::new(matcher));

        let worker0 = {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || worker::worker_loop(0, ctx))
        };
        let worker1 = {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || worker::worker_loop(1, ctx))
        };
        let collator = {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || collator::collator_loop(ctx, root))
        };

        Pipeline {
            ctx,
            worker_handles: [Some(worker0), Some(worker1)],
            collator_handle: Some(collator),
        }
    }

    /// Submit one candidate file for scanning. Blocks until the previous round has fully drained
    /// before taking ownership of `current_file`. A file that fails to open, fails to `stat`, or
    /// is empty is silently skipped, matching the per-file I/O error policy.
    pub fn submit_file(&self, path: &Path) -> Result<()> {
        self.ctx.new_file_signal.acquire();

        match splitter::prepare(path) {
            Ok(Some(file)) => {
                *self.ctx.current_file.lock() = Some(Arc::new(file));
                self.ctx.data_ready[0].release();
                self.ctx.data_ready[1].release();
                Ok(())
            }
            Ok(None) => {
                self.ctx.new_file_signal.release();
                Ok(())
            }
            Err(err) => {
                self.ctx.new_file_signal.release();
                Err(err)
            }
        }
    }

    /// Signal shutdown and join every pipeline thread. Blocks until the last submitted file's
    /// round has fully drained.
    pub fn finish(mut self) {
        self.ctx.new_file_signal.acquire();
        self.ctx.done.store(true, Ordering::Release);
        *self.ctx.current_file.lock() = None;
        self.ctx.data_ready[0].release();
        self.ctx.data_ready[1].release();

        for handle in self.worker_handles.iter_mut().filter_map(Option::take) {
            let _ = handle.join();
        }
        if let Some(handle) = self.collator_handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchStatus;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn pipeline_scans_files_and_reports_hits() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha\nneedle here\nomega\n").unwrap();
        fs::write(dir.path().join("b.txt"), "nothing interesting\n").unwrap();

        let matcher = Matcher::new("needle", false, false).unwrap();
        let root = Arc::new(Mutex::new(Search::new_root(
            "needle".to_string(),
            false,
            false,
            dir.path().to_path_buf(),
        )));

        let pipeline = Pipeline::spawn(matcher, Arc::clone(&root));
        pipeline.submit_file(&dir.path().join("a.txt")).unwrap();
        pipeline.submit_file(&dir.path().join("b.txt")).unwrap();
        pipeline.finish();

        let search = root.lock();
        assert_eq!(search.status, SearchStatus::Done);
        assert_eq!(search.nb_lines, 1);
    }

    #[test]
    fn pipeline_skips_missing_and_empty_files_without_stalling() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();

        let matcher = Matcher::new("x", false, false).unwrap();
        let root = Arc::new(Mutex::new(Search::new_root(
            "x".to_string(),
            false,
            false,
            dir.path().to_path_buf(),
        )));

        let pipeline = Pipeline::spawn(matcher, Arc::clone(&root));
        pipeline.submit_file(&dir.path().join("empty.txt")).unwrap();
        pipeline.submit_file(&dir.path().join("missing.txt")).unwrap();
        pipeline.finish();

        let search = root.lock();
        assert_eq!(search.status, SearchStatus::Done);
        assert!(search.is_empty());
    }
}
