//! Progress reporting and display
//!
//! The reconciliation code reports phases and per-record outcomes through
//! [`ProgressReporter`] and never writes to the terminal itself.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of one description record (or map catalog card).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// Emitted as a collection row
    Collection,
    /// Emitted as a compound parent with this many children
    Compound { children: usize },
    /// Matched a single asset
    Matched { file: String },
    /// Emitted without a digital file
    Unmatched,
    /// Not emitted
    Skipped(String),
}

/// Phase of the overall run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPhase {
    /// Unpacking the description table from the export bundle
    ExtractingArchive,
    /// Running the metadata extractor over the scanned folder
    ExtractingMetadata,
    /// Reading the description and asset tables
    LoadingTables,
    /// Matching records and building the hierarchy
    Reconciling,
    /// Expanding catalog cards into per-photo rows
    ExpandingCatalog,
    /// Writing the product table and reports
    WritingReports,
    /// Completed successfully
    Completed,
    /// Failed with error
    Failed(String),
}

impl BatchPhase {
    fn describe(&self) -> (&'static str, &'static str) {
        match self {
            Self::ExtractingArchive => ("📦", "Extracting description table..."),
            Self::ExtractingMetadata => ("🔎", "Extracting file metadata..."),
            Self::LoadingTables => ("📋", "Loading tables..."),
            Self::Reconciling => ("🔗", "Reconciling records..."),
            Self::ExpandingCatalog => ("🗺️ ", "Expanding catalog cards..."),
            Self::WritingReports => ("📝", "Writing product table and reports..."),
            Self::Completed => ("✅", "Completed!"),
            Self::Failed(_) => ("❌", "Failed"),
        }
    }
}

/// Progress reporter trait - implement this for different display backends.
pub trait ProgressReporter: Send + Sync {
    /// Set the overall phase.
    fn set_phase(&self, phase: BatchPhase);

    /// Announce how many entries will be processed.
    fn register_entries(&self, total: usize);

    /// Record the outcome of one entry.
    fn update_entry(&self, entry: &str, status: EntryStatus);

    /// Log an informational message.
    fn log_info(&self, message: &str);

    /// Log a warning message.
    fn log_warn(&self, message: &str);

    /// Finish and clean up the display.
    fn finish(&self);
}

/// A no-op reporter for when progress display is disabled.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn set_phase(&self, _phase: BatchPhase) {}
    fn register_entries(&self, _total: usize) {}
    fn update_entry(&self, _entry: &str, _status: EntryStatus) {}
    fn log_info(&self, _message: &str) {}
    fn log_warn(&self, _message: &str) {}
    fn finish(&self) {}
}

/// Statistics collected during processing.
#[derive(Debug, Default)]
struct Stats {
    total_entries: usize,
    collections: usize,
    compounds: usize,
    children: usize,
    matched: usize,
    unmatched: usize,
    skipped: usize,
    start_time: Option<std::time::Instant>,
}

impl Stats {
    fn started() -> Mutex<Self> {
        Mutex::new(Self {
            start_time: Some(std::time::Instant::now()),
            ..Default::default()
        })
    }

    fn record(&mut self, status: &EntryStatus) {
        match status {
            EntryStatus::Collection => self.collections += 1,
            EntryStatus::Compound { children } => {
                self.compounds += 1;
                self.children += children;
            }
            EntryStatus::Matched { .. } => self.matched += 1,
            EntryStatus::Unmatched => self.unmatched += 1,
            EntryStatus::Skipped(_) => self.skipped += 1,
        }
    }

    fn print_summary(&self) {
        let duration = self.start_time.map(|t| t.elapsed()).unwrap_or_default();

        eprintln!();
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("📊 Summary");
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("   📄 Records:     {} total", self.total_entries);
        if self.collections > 0 {
            eprintln!("   🗂️  Collections: {}", self.collections);
        }
        if self.compounds > 0 {
            eprintln!(
                "   🧩 Compounds:   {} ({} children)",
                self.compounds, self.children
            );
        }
        eprintln!("   ✅ Matched:     {}", self.matched);
        if self.unmatched > 0 {
            eprintln!("   ❓ Unmatched:   {}", self.unmatched);
        }
        if self.skipped > 0 {
            eprintln!("   ⏭️  Skipped:     {}", self.skipped);
        }
        eprintln!("   ⏱️  Duration:    {:.2}s", duration.as_secs_f64());
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}

fn lock(stats: &Mutex<Stats>) -> MutexGuard<'_, Stats> {
    stats.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A simple reporter that just prints to stderr (for non-TTY and interactive runs).
pub struct SimpleReporter {
    stats: Mutex<Stats>,
}

impl SimpleReporter {
    pub fn new() -> Self {
        Self {
            stats: Stats::started(),
        }
    }
}

impl Default for SimpleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for SimpleReporter {
    fn set_phase(&self, phase: BatchPhase) {
        if let BatchPhase::Failed(ref e) = phase {
            eprintln!("❌ Failed: {e}");
            return;
        }
        let (emoji, msg) = phase.describe();
        eprintln!("{emoji} {msg}");
    }

    fn register_entries(&self, total: usize) {
        lock(&self.stats).total_entries = total;
        eprintln!("   Found {total} records");
    }

    fn update_entry(&self, entry: &str, status: EntryStatus) {
        lock(&self.stats).record(&status);
        match status {
            EntryStatus::Unmatched => eprintln!("   ✗ {entry}: no matching file"),
            EntryStatus::Skipped(ref reason) => eprintln!("   ⏭ {entry}: {reason}"),
            _ => {}
        }
    }

    fn log_info(&self, message: &str) {
        eprintln!("ℹ️  {message}");
    }

    fn log_warn(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn finish(&self) {
        lock(&self.stats).print_summary();
    }
}

/// Fancy reporter with progress bars (for TTY).
pub struct FancyReporter {
    multi: indicatif::MultiProgress,
    phase_bar: indicatif::ProgressBar,
    main_progress: Mutex<Option<indicatif::ProgressBar>>,
    stats: Mutex<Stats>,
}

impl FancyReporter {
    pub fn new() -> Self {
        let multi = indicatif::MultiProgress::new();
        let phase_bar = multi.add(indicatif::ProgressBar::new_spinner());
        if let Ok(style) =
            indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            phase_bar.set_style(style);
        }
        phase_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            phase_bar,
            main_progress: Mutex::new(None),
            stats: Stats::started(),
        }
    }
}

impl Default for FancyReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for FancyReporter {
    fn set_phase(&self, phase: BatchPhase) {
        if let BatchPhase::Failed(ref e) = phase {
            self.phase_bar
                .finish_with_message(format!("❌ Failed: {e}"));
            return;
        }
        let (emoji, msg) = phase.describe();
        let msg = format!("{emoji} {msg}");
        if matches!(phase, BatchPhase::Completed) {
            self.phase_bar.finish_with_message(msg);
        } else {
            self.phase_bar.set_message(msg);
        }
    }

    fn register_entries(&self, total: usize) {
        lock(&self.stats).total_entries = total;

        let main_pb = self.multi.add(indicatif::ProgressBar::new(total as u64));
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("   {bar:40.cyan/blue} {pos}/{len} records")
        {
            main_pb.set_style(style.progress_chars("█▓▒░  "));
        }
        *self
            .main_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(main_pb);
    }

    fn update_entry(&self, entry: &str, status: EntryStatus) {
        lock(&self.stats).record(&status);
        if let EntryStatus::Skipped(ref reason) = status {
            self.multi.println(format!("⏭  {entry}: {reason}")).ok();
        }
        // compound children do not count towards the record total
        if let Some(ref main_pb) = *self
            .main_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
        {
            main_pb.inc(1);
        }
    }

    fn log_info(&self, message: &str) {
        self.multi.println(format!("ℹ️  {message}")).ok();
    }

    fn log_warn(&self, message: &str) {
        self.multi.println(format!("⚠️  {message}")).ok();
    }

    fn finish(&self) {
        if let Some(ref main_pb) = *self
            .main_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
        {
            main_pb.finish_and_clear();
        }
        self.phase_bar.finish_and_clear();
        lock(&self.stats).print_summary();
    }
}

/// Create an appropriate reporter based on terminal capabilities.
///
/// Interactive runs always get the plain reporter so prompts are not overdrawn.
pub fn create_reporter(interactive: bool) -> Arc<dyn ProgressReporter> {
    if !interactive && console::Term::stderr().is_term() {
        Arc::new(FancyReporter::new())
    } else {
        Arc::new(SimpleReporter::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_outcomes() {
        let reporter = SimpleReporter::new();
        reporter.register_entries(4);
        reporter.update_entry("row 2", EntryStatus::Collection);
        reporter.update_entry("row 3", EntryStatus::Compound { children: 3 });
        reporter.update_entry("row 4", EntryStatus::Matched { file: "a.tif".into() });
        reporter.update_entry("row 5", EntryStatus::Unmatched);
        let stats = lock(&reporter.stats);
        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.collections, 1);
        assert_eq!((stats.compounds, stats.children), (1, 3));
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.unmatched, 1);
    }
}
