//! Progress events emitted by long-running steps.
//!
//! The core never renders anything itself; a front end installs a callback
//! and turns the events into spinners, bars, or log lines.

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// `total_steps` is `None` when the amount of work is unknown up front,
    /// e.g. a download without a `Content-Length`.
    TaskStart { total_steps: Option<u64> },
    TaskIncrement { amount: u64 },
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `work` between a `PhaseStart` and a `PhaseFinish` event. The
    /// finish event is sent whether or not `work` succeeds.
    pub fn phase<T>(&self, name: &'static str, work: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let result = work();
        self.report(Progress::PhaseFinish);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".to_string()));
        assert_eq!(reporter.phase("Quiet", || 42), 42);
    }

    #[test]
    fn phase_brackets_work_even_when_it_fails() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|p: Progress| {
            events.lock().unwrap().push(p);
        }));

        let result: Result<(), &str> = reporter.phase("Repair", || {
            reporter.report(Progress::Message("working".to_string()));
            Err("boom")
        });
        drop(reporter);

        assert_eq!(result, Err("boom"));
        assert_eq!(
            events.into_inner().unwrap(),
            [
                Progress::PhaseStart { name: "Repair" },
                Progress::Message("working".to_string()),
                Progress::PhaseFinish,
            ]
        );
    }
}
