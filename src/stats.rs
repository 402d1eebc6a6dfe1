use crate::models::{PageEvent, SkipReason};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics collected during the extraction process
#[derive(Default)]
pub struct ExtractionStats {
    pub titles_seen: AtomicU64,
    pub articles_accepted: AtomicU64,
    pub sections_written: AtomicU64,
    pub skipped_not_allowed: AtomicU64,
    pub skipped_redirect: AtomicU64,
    pub skipped_too_short: AtomicU64,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &PageEvent) {
        self.titles_seen.fetch_add(1, Ordering::Relaxed);
        match event {
            PageEvent::Accepted { record, .. } => {
                self.articles_accepted.fetch_add(1, Ordering::Relaxed);
                self.sections_written
                    .fetch_add(record.sections.len() as u64, Ordering::Relaxed);
            }
            PageEvent::Skipped { reason, .. } => self.inc_skipped(*reason),
        }
    }

    pub fn inc_skipped(&self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::NotAllowed => &self.skipped_not_allowed,
            SkipReason::Redirect => &self.skipped_redirect,
            SkipReason::TooShort => &self.skipped_too_short,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn titles(&self) -> u64 {
        self.titles_seen.load(Ordering::Relaxed)
    }

    pub fn accepted(&self) -> u64 {
        self.articles_accepted.load(Ordering::Relaxed)
    }

    pub fn sections(&self) -> u64 {
        self.sections_written.load(Ordering::Relaxed)
    }

    pub fn not_allowed(&self) -> u64 {
        self.skipped_not_allowed.load(Ordering::Relaxed)
    }

    pub fn redirects(&self) -> u64 {
        self.skipped_redirect.load(Ordering::Relaxed)
    }

    pub fn too_short(&self) -> u64 {
        self.skipped_too_short.load(Ordering::Relaxed)
    }
}
