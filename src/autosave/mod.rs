//! Debounced persistence of a form document.
//!
//! The controller never sleeps or spawns: the host loop reports changes and
//! polls with the current `Instant`, the same way a terminal UI drives its
//! tick. At most one save is pending at any time; a newer change replaces it.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::domain::FormDocument;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// Destination of document snapshots. Storage is entirely the caller's concern.
pub trait SaveSink {
    fn save(&mut self, document: &FormDocument) -> Result<()>;
}

impl<F> SaveSink for F
where
    F: FnMut(&FormDocument) -> Result<()>,
{
    fn save(&mut self, document: &FormDocument) -> Result<()> {
        self(document)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone)]
struct PendingSave {
    due: Instant,
    snapshot: FormDocument,
}

#[derive(Debug, Clone)]
pub struct AutosaveController {
    delay: Duration,
    enabled: bool,
    state: SaveState,
    pending: Option<PendingSave>,
    last_saved: Option<Instant>,
}

impl Default for AutosaveController {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl AutosaveController {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            enabled: true,
            state: SaveState::Clean,
            pending: None,
            last_saved: None,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.set_enabled(enabled);
        self
    }

    /// Turning autosave off drops any pending save; manual saves still work.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled && self.pending.take().is_some() {
            debug!("autosave disabled, pending save cancelled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SaveState::Dirty
    }

    pub fn last_saved(&self) -> Option<Instant> {
        self.last_saved
    }

    /// When the pending save becomes due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Record an accepted change and (re)start the quiet-period timer.
    pub fn notify_change(&mut self, document: &FormDocument, now: Instant) {
        self.state = SaveState::Dirty;
        if !self.enabled {
            return;
        }
        let due = now + self.delay;
        let replaced = self
            .pending
            .replace(PendingSave {
                due,
                snapshot: document.clone(),
            })
            .is_some();
        debug!(replaced, delay_ms = self.delay.as_millis() as u64, "autosave scheduled");
    }

    /// Fire the pending save if its quiet period has elapsed.
    ///
    /// Returns `Ok(true)` when a save ran. A failing sink leaves the
    /// document dirty; the next change schedules a fresh attempt.
    pub fn poll<S: SaveSink + ?Sized>(&mut self, now: Instant, sink: &mut S) -> Result<bool> {
        let Some(pending) = self.pending.take_if(|pending| pending.due <= now) else {
            return Ok(false);
        };
        match sink.save(&pending.snapshot) {
            Ok(()) => {
                self.mark_saved(now);
                info!(document = %pending.snapshot.id, "autosaved form document");
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "autosave failed");
                Err(err)
            }
        }
    }

    /// Save `document` immediately. A pending save is cancelled only once
    /// the sink succeeds; on failure it stays scheduled.
    pub fn save_now<S: SaveSink + ?Sized>(
        &mut self,
        document: &FormDocument,
        now: Instant,
        sink: &mut S,
    ) -> Result<()> {
        sink.save(document).inspect_err(|err| {
            warn!(error = %err, "manual save failed");
        })?;
        self.pending = None;
        self.mark_saved(now);
        info!(document = %document.id, "saved form document");
        Ok(())
    }

    /// Forget pending work and adopt a new baseline, e.g. after load or reset.
    pub fn reset(&mut self, last_saved: Option<Instant>) {
        self.pending = None;
        self.state = SaveState::Clean;
        self.last_saved = last_saved;
    }

    fn mark_saved(&mut self, now: Instant) {
        self.state = SaveState::Clean;
        self.last_saved = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn titled(title: &str) -> FormDocument {
        FormDocument::new().with_title(title)
    }

    #[test]
    fn burst_collapses_into_one_trailing_save() {
        let t0 = Instant::now();
        let mut saved: Vec<(Duration, String)> = Vec::new();
        let mut controller = AutosaveController::new(ms(2000));

        controller.notify_change(&titled("a"), t0);
        controller.notify_change(&titled("b"), t0 + ms(500));
        controller.notify_change(&titled("c"), t0 + ms(1000));

        for step in (0..=4000).step_by(100) {
            let now = t0 + ms(step);
            let mut sink = |doc: &FormDocument| -> Result<()> {
                saved.push((now - t0, doc.title.clone()));
                Ok(())
            };
            controller.poll(now, &mut sink).unwrap();
        }

        assert_eq!(saved, vec![(ms(3000), "c".to_string())]);
        assert!(!controller.is_dirty());
        assert_eq!(controller.last_saved(), Some(t0 + ms(3000)));
    }

    #[test]
    fn changes_mark_dirty_and_schedule() {
        let t0 = Instant::now();
        let mut controller = AutosaveController::default();
        assert_eq!(controller.state(), SaveState::Clean);
        controller.notify_change(&titled("a"), t0);
        assert!(controller.is_dirty());
        assert_eq!(controller.next_deadline(), Some(t0 + DEFAULT_AUTOSAVE_DELAY));
    }

    #[test]
    fn manual_save_bypasses_debounce() {
        let t0 = Instant::now();
        let mut count = 0;
        let mut sink = |_: &FormDocument| -> Result<()> {
            count += 1;
            Ok(())
        };
        let mut controller = AutosaveController::new(ms(2000));
        controller.notify_change(&titled("a"), t0);
        controller
            .save_now(&titled("a"), t0 + ms(10), &mut sink)
            .unwrap();
        assert!(!controller.is_dirty());
        assert_eq!(controller.next_deadline(), None);
        assert!(!controller.poll(t0 + ms(5000), &mut sink).unwrap());
        assert_eq!(count, 1);
    }

    #[test]
    fn disabled_controller_never_schedules() {
        let t0 = Instant::now();
        let mut calls = 0;
        let mut sink = |_: &FormDocument| -> Result<()> {
            calls += 1;
            Ok(())
        };
        let mut controller = AutosaveController::new(ms(100)).with_enabled(false);
        controller.notify_change(&titled("a"), t0);
        assert!(controller.is_dirty());
        assert!(!controller.poll(t0 + ms(1000), &mut sink).unwrap());
        controller
            .save_now(&titled("a"), t0 + ms(1000), &mut sink)
            .unwrap();
        assert_eq!(calls, 1);
        assert!(!controller.is_dirty());
    }

    #[test]
    fn disabling_cancels_pending_save() {
        let t0 = Instant::now();
        let mut controller = AutosaveController::new(ms(100));
        controller.notify_change(&titled("a"), t0);
        controller.set_enabled(false);
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn failed_save_keeps_document_dirty() {
        let t0 = Instant::now();
        let mut sink = |_: &FormDocument| -> Result<()> { Err(anyhow!("disk full")) };
        let mut controller = AutosaveController::new(ms(100));
        controller.notify_change(&titled("a"), t0);
        let err = controller.poll(t0 + ms(100), &mut sink).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(controller.is_dirty());
        assert_eq!(controller.last_saved(), None);
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn failed_manual_save_keeps_autosave_scheduled() {
        let t0 = Instant::now();
        let mut failing = |_: &FormDocument| -> Result<()> { Err(anyhow!("offline")) };
        let mut saved = Vec::new();
        let mut recording = |doc: &FormDocument| -> Result<()> {
            saved.push(doc.title.clone());
            Ok(())
        };
        let mut controller = AutosaveController::new(ms(100));
        controller.notify_change(&titled("a"), t0);

        assert!(controller.save_now(&titled("a"), t0 + ms(10), &mut failing).is_err());
        assert!(controller.is_dirty());
        assert_eq!(controller.next_deadline(), Some(t0 + ms(100)));

        assert!(controller.poll(t0 + ms(100), &mut recording).unwrap());
        assert!(!controller.is_dirty());
        assert_eq!(saved, ["a"]);
    }

    #[test]
    fn reset_discards_pending_work() {
        let t0 = Instant::now();
        let mut controller = AutosaveController::new(ms(100));
        controller.notify_change(&titled("a"), t0);
        controller.reset(Some(t0));
        assert!(!controller.is_dirty());
        assert_eq!(controller.next_deadline(), None);
        assert_eq!(controller.last_saved(), Some(t0));
    }
}
