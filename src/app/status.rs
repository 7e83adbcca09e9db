#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Drop a field onto the canvas to start.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn field_added(&mut self, label: &str) {
        self.message = format!("Added {label}");
    }

    pub fn field_removed(&mut self) {
        self.message = "Field removed".to_string();
    }

    pub fn field_duplicated(&mut self, label: &str) {
        self.message = format!("Duplicated as {label}");
    }

    pub fn value_updated(&mut self) {
        self.message = "Form updated".to_string();
    }

    pub fn unchanged(&mut self) {
        self.message = "Nothing to change".to_string();
    }

    pub fn saved(&mut self) {
        self.message = "All changes saved".to_string();
    }

    pub fn save_failed(&mut self, reason: &str) {
        self.message = format!("Save failed: {reason}");
    }

    pub fn loaded(&mut self, title: &str) {
        self.message = format!("Loaded {title}");
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
