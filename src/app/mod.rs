mod builder;
mod options;
mod preview;
mod status;

pub use builder::FormBuilder;
pub use options::BuilderOptions;
pub use preview::{FormPreview, Progress, SubmitOutcome};
pub use status::{READY_STATUS, StatusLine};
