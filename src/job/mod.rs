pub mod category;
pub mod export_job;

pub use category::{categorize, Category, PathRule, CATEGORY_RULES};
pub use export_job::{ExportJob, ExporterKind, Grouping};
