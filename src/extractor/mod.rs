pub mod content_reader;
pub mod output_file;
pub mod report_writer;

pub use content_reader::{read_source, ReadOutcome};
pub use output_file::{ExportSummary, OutputFile};
pub use report_writer::{ExportProgress, ReportWriter, SectionTracker};
