use crate::error::{ExportError, UserFriendlyError};
use crate::extractor::ExportSummary;
use crate::job::ExporterKind;
use crate::scanner::source_scanner::format_bytes;
use crate::scanner::{ExportPlan, PlanStatistics};
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("💡 ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static SEARCH: Emoji = Emoji("🔍 ", "> ");
static FOLDER: Emoji = Emoji("📁 ", "- ");
static MEMO: Emoji = Emoji("📝 ", "> ");
static NO_ENTRY: Emoji = Emoji("🚫 ", "x ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", SEARCH, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &ExportError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", INFO, style(&suggestion).cyan());
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Lists the markers found during the environment check.
    pub fn print_found_markers(&self, markers: &[String]) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                self.success("Project structure verified:");
                for marker in markers {
                    println!("   {}{} - found", FOLDER, marker);
                }
            }
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "structure",
                "found": markers
            })),
            OutputMode::Plain => println!("FOUND: {}", markers.join(", ")),
        }
    }

    pub fn print_export_target(&self, kind: ExporterKind, output: &str) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                println!("{}Exporting code to: {}", MEMO, output);
                for excluded in kind.excluded_substrings() {
                    println!("{}Excluding folder: {}", NO_ENTRY, excluded);
                }
            }
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "export_start",
                "output": output,
                "excluded": kind.excluded_substrings()
            })),
            OutputMode::Plain => println!("OUTPUT: {}", output),
        }
    }

    pub fn print_export_summary(&self, kind: ExporterKind, summary: &ExportSummary) {
        match self.mode {
            OutputMode::Human => {
                if !self.quiet {
                    self.print_human_summary(kind, summary);
                }
            }
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => {
                if !self.quiet {
                    self.print_plain_summary(summary);
                }
            }
        }
    }

    pub fn print_plan(&self, plan: &ExportPlan, statistics: &PlanStatistics) {
        match self.mode {
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "plan",
                    "plan": plan,
                    "statistics": statistics
                }));
            }
            _ => {
                for root in &plan.roots {
                    if !root.exists {
                        println!("{} (missing)", root.name);
                        continue;
                    }
                    println!("{}/", root.name);
                    for file in &root.files {
                        match file.category {
                            Some(category) => {
                                println!("  {} [{}]", file.relative_path, category)
                            }
                            None => println!("  {}", file.relative_path),
                        }
                    }
                }
                println!();
                print!("{}", statistics.display_summary());
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}", style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        let line = if self.use_colors {
            let styled = match msg_type {
                MessageType::Success => style(message).green().bold(),
                MessageType::Error => style(message).red().bold(),
                MessageType::Warning => style(message).yellow().bold(),
                MessageType::Info => style(message).cyan(),
            };
            format!("{}{}", msg_type.emoji(), styled)
        } else {
            format!("{} {}", msg_type.plain_prefix(), message)
        };

        match msg_type {
            MessageType::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, kind: ExporterKind, summary: &ExportSummary) {
        println!();
        self.print_separator();

        if self.use_colors {
            println!("{}{}", CHECKMARK, style("Export completed successfully!").green().bold());
        } else {
            println!("✓ Export completed successfully!");
        }

        println!();
        println!("  Files exported:  {}", self.highlight(summary.files_exported.to_string()));
        println!(
            "  Bytes written:   {}",
            self.highlight(format_bytes(summary.bytes_written))
        );
        println!(
            "  Time taken:      {}",
            self.highlight(format_duration(Duration::from_millis(summary.duration_ms)))
        );

        if summary.latin1_fallbacks > 0 {
            println!("  Latin-1 decoded: {}", summary.latin1_fallbacks);
        }
        if summary.files_failed > 0 {
            println!("  Read errors:     {}", summary.files_failed);
        }
        if !summary.scan_errors.is_empty() {
            println!("  Scan errors:     {}", summary.scan_errors.len());
        }

        if !summary.files_by_section.is_empty() {
            println!();
            println!("  Files by section:");
            for (section, count) in &summary.files_by_section {
                println!("    {}: {}", section, count);
            }
        }

        println!();
        println!("  Included files:");
        for family in kind.included_families() {
            println!("    • {}", family);
        }
        for excluded in kind.excluded_substrings() {
            println!();
            println!("  {}Excluded folder: {}", NO_ENTRY, excluded);
        }

        self.print_separator();
    }

    fn print_plain_summary(&self, summary: &ExportSummary) {
        println!("COMPLETED: Export to {}", summary.output_path.display());
        println!("Files exported: {}", summary.files_exported);
        println!("Bytes written: {}", summary.bytes_written);
        println!("Duration: {}ms", summary.duration_ms);
        if summary.files_failed > 0 {
            println!("Read errors: {}", summary.files_failed);
        }
    }

    fn highlight(&self, value: String) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

impl MessageType {
    fn emoji(&self) -> &'static Emoji<'static, 'static> {
        match self {
            MessageType::Success => &CHECKMARK,
            MessageType::Error => &CROSS,
            MessageType::Warning => &WARNING,
            MessageType::Info => &INFO,
        }
    }

    fn plain_prefix(&self) -> &'static str {
        match self {
            MessageType::Success => "✓",
            MessageType::Error => "✗",
            MessageType::Warning => "!",
            MessageType::Info => "i",
        }
    }
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert_eq!(formatter.mode, OutputMode::Plain);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(formatter.quiet);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));

        let quiet_formatter = OutputFormatter::new(OutputMode::Human, 1, true);
        assert!(!quiet_formatter.should_show_message(0));
    }
}
