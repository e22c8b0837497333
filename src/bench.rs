//! Microsecond timestamps and named timers.

use std::{
    io::{self, Write},
    sync::OnceLock,
    time::Instant,
};

/// Monotonic clock counting microseconds from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_us(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Microseconds since a process wide epoch, fixed on the first call.
pub fn usec_timestamp() -> u64 {
    static EPOCH: OnceLock<Clock> = OnceLock::new();

    EPOCH.get_or_init(Clock::new).now_us()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Benchmark {
    name: String,
    start_us: u64,
    end_us: Option<u64>,
}

impl Benchmark {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.end_us.is_none()
    }

    /// `0` until the timer is ended.
    pub fn elapsed_us(&self) -> u64 {
        self.end_us.map_or(0, |end| end.saturating_sub(self.start_us))
    }
}

/// A registry of named timers, started and ended by index.
///
/// ```rust
/// use timed_json::bench::Benchmarks;
///
/// let mut benchmarks = Benchmarks::new();
/// let parsed = benchmarks.time("parse", || timed_json::parse("[1, 2, 3]"));
/// assert!(parsed.is_ok());
///
/// let mut out = Vec::new();
/// benchmarks.write_all(&mut out).unwrap();
/// assert!(String::from_utf8(out).unwrap().starts_with("Function parse took "));
/// ```
#[derive(Debug, Default)]
pub struct Benchmarks {
    clock: Clock,
    entries: Vec<Benchmark>,
}

impl Benchmarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, name: impl Into<String>) -> usize {
        self.entries.push(Benchmark {
            name: name.into(),
            start_us: self.clock.now_us(),
            end_us: None,
        });

        self.entries.len() - 1
    }

    /// Unknown indices are ignored.
    pub fn end(&mut self, index: usize) {
        let now = self.clock.now_us();

        if let Some(entry) = self.entries.get_mut(index) {
            entry.end_us = Some(now);
        }
    }

    pub fn time<T>(&mut self, name: impl Into<String>, f: impl FnOnce() -> T) -> T {
        let index = self.start(name);
        let result = f();
        self.end(index);
        result
    }

    pub fn get(&self, index: usize) -> Option<&Benchmark> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Benchmark> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write<W: Write>(&self, index: usize, out: &mut W) -> io::Result<()> {
        match self.get(index) {
            Some(entry) => writeln!(
                out,
                "Function {} took {} microseconds.",
                entry.name,
                entry.elapsed_us()
            ),
            None => Ok(()),
        }
    }

    pub fn write_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        (0..self.entries.len()).try_for_each(|index| self.write(index, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};

    #[test]
    fn clock_never_goes_backwards() {
        let clock = Clock::new();
        let first = clock.now_us();
        let second = clock.now_us();

        assert!(second >= first);
        assert!(usec_timestamp() <= usec_timestamp());
    }

    #[test]
    fn timers_measure_the_time_between_start_and_end() {
        let mut benchmarks = Benchmarks::new();

        let index = benchmarks.start("sleep");
        assert!(benchmarks.get(index).unwrap().is_running());
        assert_eq!(benchmarks.get(index).unwrap().elapsed_us(), 0);

        thread::sleep(Duration::from_millis(2));
        benchmarks.end(index);

        let entry = benchmarks.get(index).unwrap();
        assert!(!entry.is_running());
        assert!(entry.elapsed_us() >= 2_000);
        assert_eq!(entry.name(), "sleep");
    }

    #[test]
    fn indices_follow_start_order() {
        let mut benchmarks = Benchmarks::new();

        assert_eq!(benchmarks.start("a"), 0);
        assert_eq!(benchmarks.start("b"), 1);
        assert_eq!(benchmarks.len(), 2);

        benchmarks.end(7);
        assert!(benchmarks.get(7).is_none());
        assert_eq!(
            benchmarks.iter().map(Benchmark::name).collect::<Vec<_>>(),
            ["a", "b"]
        );
    }

    #[test]
    fn writes_one_line_per_timer() {
        let mut benchmarks = Benchmarks::new();
        benchmarks.time("first", || ());
        benchmarks.time("second", || ());

        let mut out = Vec::new();
        benchmarks.write_all(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Function first took "));
        assert!(lines[1].ends_with(" microseconds."));

        let mut nothing = Vec::new();
        benchmarks.write(42, &mut nothing).unwrap();
        assert!(nothing.is_empty());
    }
}
