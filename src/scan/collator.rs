//! The collator: the sole mutator of the root search's result store.

use crate::model::{Search, SearchStatus};
use crate::scan::ScanContext;
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Body of the collator thread. Waits on both `data_consumed` semaphores, merges the two
/// workers' hit lists into the root search (discarding files with no hits at all), and signals
/// `new_file_signal` so the splitter can take the next file. Exits once the context is marked
/// done.
pub fn collator_loop(ctx: Arc<ScanContext>, root: Arc<Mutex<Search>>) {
    log::debug!("collator started");
    loop {
        ctx.data_consumed[0].acquire();
        ctx.data_consumed[1].acquire();

        if ctx.done.load(Ordering::Acquire) {
            root.lock().status = SearchStatus::Done;
            log::debug!("collator exiting");
            break;
        }

        let file = {
            let mut guard = ctx.current_file.lock();
            guard.take().expect("current_file set before data_consumed release")
        };

        let hits0 = std::mem::take(&mut *ctx.worker_hits[0].lock());
        let hits1 = std::mem::take(&mut *ctx.worker_hits[1].lock());

        if !hits0.is_empty() || !hits1.is_empty() {
            let midline = file.midline();
            let mut search = root.lock();
            search.append_file(file.path.clone());
            for hit in &hits0 {
                search.append_line(&hit.text, hit.line_no);
            }
            for hit in &hits1 {
                search.append_line(&hit.text, hit.line_no + midline);
            }
        }

        drop(file);
        ctx.new_file_signal.release();
    }
}
