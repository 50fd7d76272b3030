use gloo_timers::callback::Timeout;

/// Something that can run a task later. Dropping the returned handle must
/// cancel the task if it has not run yet.
pub trait Schedule {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

#[derive(Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Schedule for TimeoutScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

/// Trailing-edge debounce: every call replaces the pending one, so only the
/// last call of a burst runs once the window has been quiet for `delay_ms`.
pub struct Debouncer<S: Schedule = TimeoutScheduler> {
    scheduler: S,
    delay_ms: u32,
    pending: Option<S::Handle>,
}

impl Debouncer<TimeoutScheduler> {
    pub fn new(delay_ms: u32) -> Self {
        Debouncer::with_scheduler(TimeoutScheduler, delay_ms)
    }
}

impl<S: Schedule> Debouncer<S> {
    pub fn with_scheduler(scheduler: S, delay_ms: u32) -> Self {
        Self {
            scheduler,
            delay_ms,
            pending: None,
        }
    }

    pub fn call(&mut self, task: impl FnOnce() + 'static) {
        // Assigning drops the previous handle, which cancels it.
        self.pending = Some(self.scheduler.schedule(self.delay_ms, Box::new(task)));
    }
}


#[cfg(test)]
mod tests {
    use super::manual::ManualScheduler;
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting(runs: &Rc<Cell<u32>>) -> impl FnOnce() + 'static {
        let runs = runs.clone();
        move || runs.set(runs.get() + 1)
    }

    #[test]
    fn burst_inside_window_runs_once() {
        let clock = ManualScheduler::default();
        let mut debouncer = Debouncer::with_scheduler(clock.clone(), 100);
        let runs = Rc::new(Cell::new(0));

        for _ in 0..5 {
            debouncer.call(counting(&runs));
            clock.advance(20);
        }
        assert_eq!(runs.get(), 0);

        clock.advance(100);
        assert_eq!(runs.get(), 1);

        clock.advance(500);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn separate_bursts_each_run() {
        let clock = ManualScheduler::default();
        let mut debouncer = Debouncer::with_scheduler(clock.clone(), 100);
        let runs = Rc::new(Cell::new(0));

        debouncer.call(counting(&runs));
        clock.advance(150);
        debouncer.call(counting(&runs));
        debouncer.call(counting(&runs));
        clock.advance(150);

        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn only_the_last_call_of_a_burst_runs() {
        let clock = ManualScheduler::default();
        let mut debouncer = Debouncer::with_scheduler(clock.clone(), 100);
        let seen = Rc::new(Cell::new(0));

        for width in [500, 800, 1200] {
            let seen = seen.clone();
            debouncer.call(move || seen.set(width));
            clock.advance(30);
        }
        clock.advance(100);

        assert_eq!(seen.get(), 1200);
    }

    #[test]
    fn dropping_the_debouncer_cancels_pending_call() {
        let clock = ManualScheduler::default();
        let mut debouncer = Debouncer::with_scheduler(clock.clone(), 100);
        let runs = Rc::new(Cell::new(0));

        debouncer.call(counting(&runs));
        drop(debouncer);
        clock.advance(200);

        assert_eq!(runs.get(), 0);
    }
}
