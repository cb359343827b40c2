pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod onset;
pub mod output;
pub mod validate;

pub use api::{generate_chart, generate_chart_from_sources, generate_chart_json};
pub use chart::{ChartReport, Note, NoteKind, StageOutcome};
pub use config::{PhaseSearch, SongSpec, StageSpec};
pub use error::*;
pub use onset::OnsetCurve;
pub use output::{format_summary, to_chart_json};
pub use validate::validate;
