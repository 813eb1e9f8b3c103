//! The port through which a running search reports its progress.
//!
//! An [Observer] is told about every cell that becomes [SearchStatus::Open],
//! [SearchStatus::Closed] or [SearchStatus::Path], synchronously and in the order the changes
//! happen. It only ever receives a shared reference to the [Grid], so it can render the grid but
//! cannot edit it under the running search.
use std::sync::atomic::{AtomicBool, Ordering};

use grid_util::point::Point;

use crate::cell::SearchStatus;
use crate::grid::Grid;

/// Returned by an observer to let the search go on or to stop it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Continue,
    Cancel,
}

pub trait Observer {
    /// Called right after `point` changed to `status`; `grid` already reflects the change.
    /// Returning [Flow::Cancel] stops the search before its next frontier iteration.
    fn observe(&mut self, grid: &Grid, point: Point, status: SearchStatus) -> Flow;

    /// Polled at the top of every frontier iteration.
    fn cancel_requested(&self) -> bool {
        false
    }
}

impl<F> Observer for F
where
    F: FnMut(&Grid, Point, SearchStatus) -> Flow,
{
    fn observe(&mut self, grid: &Grid, point: Point, status: SearchStatus) -> Flow {
        self(grid, point, status)
    }
}

/// Ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&mut self, _: &Grid, _: Point, _: SearchStatus) -> Flow {
        Flow::Continue
    }
}

/// Keeps every reported transition in order, e.g. to replay a search frame by frame.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub events: Vec<(Point, SearchStatus)>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder::default()
    }
    /// Number of recorded transitions to `status`.
    pub fn count(&self, status: SearchStatus) -> usize {
        self.events.iter().filter(|(_, s)| *s == status).count()
    }
}

impl Observer for Recorder {
    fn observe(&mut self, _: &Grid, point: Point, status: SearchStatus) -> Flow {
        self.events.push((point, status));
        Flow::Continue
    }
}

/// Wraps another observer and additionally cancels the search once `flag` is raised, for
/// instance by a shutdown handler on another thread.
pub struct CancelOnFlag<'a, O> {
    pub inner: O,
    flag: &'a AtomicBool,
}

impl<'a, O: Observer> CancelOnFlag<'a, O> {
    pub fn new(inner: O, flag: &'a AtomicBool) -> Self {
        CancelOnFlag { inner, flag }
    }
}

impl<O: Observer> Observer for CancelOnFlag<'_, O> {
    fn observe(&mut self, grid: &Grid, point: Point, status: SearchStatus) -> Flow {
        self.inner.observe(grid, point, status)
    }
    fn cancel_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.inner.cancel_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos;

    #[test]
    fn recorder_counts_by_status() {
        let grid = Grid::new(2).unwrap();
        let mut recorder = Recorder::new();
        recorder.observe(&grid, pos(0, 0), SearchStatus::Open);
        recorder.observe(&grid, pos(0, 1), SearchStatus::Open);
        recorder.observe(&grid, pos(0, 0), SearchStatus::Closed);
        assert_eq!(recorder.count(SearchStatus::Open), 2);
        assert_eq!(recorder.count(SearchStatus::Closed), 1);
        assert_eq!(recorder.count(SearchStatus::Path), 0);
    }

    #[test]
    fn flag_cancels() {
        let flag = AtomicBool::new(false);
        let observer = CancelOnFlag::new(NoopObserver, &flag);
        assert!(!observer.cancel_requested());
        flag.store(true, Ordering::Relaxed);
        assert!(observer.cancel_requested());
    }

    #[test]
    fn closures_are_observers() {
        let grid = Grid::new(1).unwrap();
        let mut seen = 0;
        let mut observer = |_: &Grid, _: Point, _: SearchStatus| {
            seen += 1;
            Flow::Cancel
        };
        assert_eq!(
            observer.observe(&grid, pos(0, 0), SearchStatus::Open),
            Flow::Cancel
        );
        assert_eq!(seen, 1);
    }
}
