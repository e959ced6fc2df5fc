//! Worker diagnostics and the crawl report
//!
//! Timing figures are informational only; nothing in the crawl depends on them.

use std::fmt;
use std::time::Duration;

/// Elapsed-time accumulator for one worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerTiming {
    pub tasks: u64,
    pub total: Duration,
}

impl WorkerTiming {
    pub fn record(&mut self, elapsed: Duration) {
        self.tasks += 1;
        self.total += elapsed;
    }

    /// Arithmetic mean over recorded tasks, or None if there were none
    pub fn mean(&self) -> Option<Duration> {
        u32::try_from(self.tasks)
            .ok()
            .filter(|&n| n > 0)
            .map(|n| self.total / n)
    }

    pub fn merge(&mut self, other: &WorkerTiming) {
        self.tasks += other.tasks;
        self.total += other.total;
    }

    /// Logs the mean task duration for a stage at worker exit
    pub fn log_mean(&self, stage: &str) {
        match self.mean() {
            Some(mean) => tracing::info!(
                "The average time for {} is {:.1}ms over {} tasks",
                stage,
                mean.as_secs_f64() * 1000.0,
                self.tasks
            ),
            None => tracing::info!("No {} tasks were processed", stage),
        }
    }
}

/// Counters reported by a fetch worker when it exits
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchStats {
    pub timing: WorkerTiming,
    pub fetched: u64,
    pub disallowed: u64,
    pub failed: u64,
}

impl FetchStats {
    pub fn merge(&mut self, other: &FetchStats) {
        self.timing.merge(&other.timing);
        self.fetched += other.fetched;
        self.disallowed += other.disallowed;
        self.failed += other.failed;
    }
}

/// Counters reported by an extraction/index worker when it exits
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStats {
    pub timing: WorkerTiming,
    pub indexed: u64,
    pub links_enqueued: u64,
    pub stem_failures: u64,
}

impl IndexStats {
    pub fn merge(&mut self, other: &IndexStats) {
        self.timing.merge(&other.timing);
        self.indexed += other.indexed;
        self.links_enqueued += other.links_enqueued;
        self.stem_failures += other.stem_failures;
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub seed: String,
    pub pages_fetched: u64,
    pub pages_disallowed: u64,
    pub fetch_failures: u64,
    pub pages_indexed: u64,
    pub links_enqueued: u64,
    pub stem_failures: u64,
    pub urls_visited: usize,
    pub mean_fetch_time: Option<Duration>,
    pub mean_index_time: Option<Duration>,
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn new(
        seed: String,
        fetch: &FetchStats,
        index: &IndexStats,
        urls_visited: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            seed,
            pages_fetched: fetch.fetched,
            pages_disallowed: fetch.disallowed,
            fetch_failures: fetch.failed,
            pages_indexed: index.indexed,
            links_enqueued: index.links_enqueued,
            stem_failures: index.stem_failures,
            urls_visited,
            mean_fetch_time: fetch.timing.mean(),
            mean_index_time: index.timing.mean(),
            elapsed,
        }
    }
}

fn format_mean(mean: Option<Duration>) -> String {
    mean.map(|d| format!("{:.1}ms", d.as_secs_f64() * 1000.0))
        .unwrap_or_else(|| "n/a".to_string())
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Crawl of {}", self.seed)?;
        writeln!(f, "  Pages fetched:     {}", self.pages_fetched)?;
        writeln!(f, "  Pages indexed:     {}", self.pages_indexed)?;
        writeln!(f, "  Disallowed:        {}", self.pages_disallowed)?;
        writeln!(f, "  Fetch failures:    {}", self.fetch_failures)?;
        writeln!(f, "  Links enqueued:    {}", self.links_enqueued)?;
        writeln!(f, "  Stem failures:     {}", self.stem_failures)?;
        writeln!(f, "  URLs visited:      {}", self.urls_visited)?;
        writeln!(f, "  Mean fetch time:   {}", format_mean(self.mean_fetch_time))?;
        writeln!(f, "  Mean index time:   {}", format_mean(self.mean_index_time))?;
        write!(f, "  Elapsed:           {:.2}s", self.elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_nothing() {
        assert_eq!(WorkerTiming::default().mean(), None);
    }

    #[test]
    fn test_mean() {
        let mut timing = WorkerTiming::default();
        timing.record(Duration::from_millis(100));
        timing.record(Duration::from_millis(300));
        assert_eq!(timing.mean(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn test_merge_across_workers() {
        let mut a = FetchStats {
            fetched: 2,
            disallowed: 1,
            ..Default::default()
        };
        a.timing.record(Duration::from_millis(10));

        let mut b = FetchStats {
            fetched: 3,
            failed: 1,
            ..Default::default()
        };
        b.timing.record(Duration::from_millis(30));

        a.merge(&b);
        assert_eq!(a.fetched, 5);
        assert_eq!(a.disallowed, 1);
        assert_eq!(a.failed, 1);
        assert_eq!(a.timing.mean(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_report_display() {
        let fetch = FetchStats {
            fetched: 2,
            ..Default::default()
        };
        let index = IndexStats {
            indexed: 2,
            ..Default::default()
        };
        let report = CrawlReport::new(
            "http://x.test/a".to_string(),
            &fetch,
            &index,
            2,
            Duration::from_secs(1),
        );
        let text = report.to_string();
        assert!(text.contains("Crawl of http://x.test/a"));
        assert!(text.contains("Pages indexed:     2"));
        assert!(text.contains("Mean fetch time:   n/a"));
    }
}
