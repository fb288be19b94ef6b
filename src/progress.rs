//! Progress reporting for long searches.
//!
//! A [`SearchProgress`] always counts completed candidates. When the bar is
//! enabled it also drives the global `progress_bar` display, which can only
//! show one bar at a time.
//!
//! The counter is atomic so rayon workers can report without coordination;
//! bar redraws are serialized and always show the latest count.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;
use progress_bar::{Color, Style, finalize_progress_bar, init_progress_bar, set_progress_bar_action, set_progress_bar_progress};

#[derive(Debug)]
pub struct SearchProgress {
    total: usize,
    completed: AtomicUsize,
    show_bar: bool,
    redraw: Mutex<()>,
}

impl SearchProgress {
    /// Start tracking `total` units of work, drawing a bar labelled `label` if
    /// `show_bar` is set.
    pub fn new(label: &str, total: usize, show_bar: bool) -> Self {
        if show_bar {
            trace!("initializing progress bar '{label}' with max value {total}");
            init_progress_bar(total);
            set_progress_bar_action(label, Color::Blue, Style::Bold);
        }
        Self {
            total,
            completed: AtomicUsize::new(0),
            show_bar,
            redraw: Mutex::new(()),
        }
    }

    /// Count-only progress with no terminal output.
    pub fn hidden(total: usize) -> Self {
        Self::new("", total, false)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Record one finished unit.
    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if self.show_bar {
            if let Ok(_guard) = self.redraw.lock() {
                set_progress_bar_progress(self.completed().min(self.total));
            }
        }
    }

    /// Close the bar (no-op when hidden).
    pub fn finish(&self) {
        if self.show_bar {
            if let Ok(_guard) = self.redraw.lock() {
                finalize_progress_bar();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn hidden_progress_counts_increments() {
        let progress = SearchProgress::hidden(5);
        assert_eq!(progress.total(), 5);
        assert_eq!(progress.completed(), 0);
        for _ in 0..3 {
            progress.increment();
        }
        assert_eq!(progress.completed(), 3);
        progress.finish();
    }

    #[test]
    fn increments_from_worker_threads_are_not_lost() {
        let progress = SearchProgress::hidden(1000);
        (0..1000).into_par_iter().for_each(|_| progress.increment());
        assert_eq!(progress.completed(), 1000);
    }
}
