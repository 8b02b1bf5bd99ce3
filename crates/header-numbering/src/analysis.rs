//! Document header level analysis
//!
//! Used by automatic level detection: one linear scan records which header
//! levels a document actually uses. Results can be cached per document for a
//! few seconds so repeated resolution on every keystroke stays cheap.

use crate::fence::CodeFenceTracker;
use crate::header::{header_level, is_header, MAX_HEADER_LEVEL};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

/// Default lifetime of a cached analysis
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// Snapshot of one document's header structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLevelAnalysis {
    /// Start of the detected range (0 when empty)
    pub min_level: u8,
    /// End of the detected range (0 when empty)
    pub max_level: u8,
    pub used_levels: BTreeSet<u8>,
    pub header_count: usize,
    pub is_empty: bool,
}

/// Scan `text` once, skipping fenced code
///
/// A document using a single level gets the widened range
/// `[level, min(level + 2, 6)]` so it still receives multi-level numbering.
pub fn analyze_header_levels(text: &str) -> HeaderLevelAnalysis {
    let mut fence = CodeFenceTracker::new();
    let mut used_levels = BTreeSet::new();
    let mut header_count = 0;

    for line in text.split('\n') {
        if fence.observe(line) || !is_header(line) {
            continue;
        }
        let level = header_level(line);
        if level == 0 {
            continue;
        }
        used_levels.insert(level as u8);
        header_count += 1;
    }

    let (min_level, max_level) = match (used_levels.first(), used_levels.last()) {
        (Some(&min), Some(&max)) if min == max => (min, (min + 2).min(MAX_HEADER_LEVEL)),
        (Some(&min), Some(&max)) => (min, max),
        _ => (0, 0),
    };

    HeaderLevelAnalysis {
        min_level,
        max_level,
        is_empty: used_levels.is_empty(),
        used_levels,
        header_count,
    }
}

/// Time source for the analysis cache
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock used outside of tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Per-document analysis cache invalidated by elapsed time only
///
/// Entries are never checked against the document content; a stale entry
/// lives at most `ttl`. Single-threaded use only.
#[derive(Debug)]
pub struct AnalysisCache<C: Clock = SystemClock> {
    clock: C,
    ttl: Duration,
    entries: HashMap<String, (HeaderLevelAnalysis, Instant)>,
}

impl Default for AnalysisCache<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> AnalysisCache<C> {
    pub fn new(clock: C) -> Self {
        Self::with_ttl(clock, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(clock: C, ttl: Duration) -> Self {
        AnalysisCache { clock, ttl, entries: HashMap::new() }
    }

    /// Fresh cached analysis for `key`, if any
    pub fn get(&self, key: &str) -> Option<&HeaderLevelAnalysis> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|(_, inserted)| now.duration_since(*inserted) < self.ttl)
            .map(|(analysis, _)| analysis)
    }

    pub fn insert(&mut self, key: impl Into<String>, analysis: HeaderLevelAnalysis) {
        let now = self.clock.now();
        self.entries.insert(key.into(), (analysis, now));
    }

    /// Cached analysis for `key`, or a fresh scan of `text` stored under it
    pub fn get_or_analyze(&mut self, key: &str, text: &str) -> HeaderLevelAnalysis {
        if let Some(analysis) = self.get(key) {
            return analysis.clone();
        }
        let analysis = analyze_header_levels(text);
        tracing::debug!(document = key, levels = ?analysis.used_levels, "analyzed header levels");
        self.insert(key, analysis.clone());
        analysis
    }

    /// Drop every entry older than the TTL; returns how many were removed
    pub fn invalidate_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, (_, inserted)| now.duration_since(*inserted) < ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
