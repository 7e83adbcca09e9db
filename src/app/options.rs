use std::time::Duration;

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;

/// Session-level configuration of a [`FormBuilder`](super::FormBuilder).
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    pub autosave: bool,
    pub autosave_delay: Duration,
    pub select_new_fields: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            autosave: true,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            select_new_fields: true,
        }
    }
}

impl BuilderOptions {
    pub fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave = enabled;
        self
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    pub fn with_select_new_fields(mut self, select: bool) -> Self {
        self.select_new_fields = select;
        self
    }
}
