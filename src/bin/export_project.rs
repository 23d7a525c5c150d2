use code_exporter::ExporterKind;
use std::process;

fn main() {
    process::exit(code_exporter::app::main_with(ExporterKind::Project));
}
