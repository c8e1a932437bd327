mod interactive;
mod render;
mod tabular;

pub use interactive::{HELP, LineCommand, SessionSummary, parse_line, run_interactive};
pub use render::{Rendered, Tone, render_outcome, render_preview, render_status};
pub use tabular::{load_csv, read_csv};
