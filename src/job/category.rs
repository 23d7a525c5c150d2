use serde::Serialize;
use std::fmt;

/// Section a frontend source file is filed under in the report.
///
/// Variants are declared in rule precedence order, so the derived `Ord` is
/// the order sections appear in when the report is grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    DashboardComponents,
    DocumentComponents,
    LayoutComponents,
    GeneralComponents,
    CustomHooks,
    Libraries,
    Pages,
    Types,
    MainFiles,
    OtherFiles,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::DashboardComponents => "Dashboard components",
            Category::DocumentComponents => "Document components",
            Category::LayoutComponents => "Layout components",
            Category::GeneralComponents => "General components",
            Category::CustomHooks => "Custom hooks",
            Category::Libraries => "Libraries and utilities",
            Category::Pages => "Pages",
            Category::Types => "Types and definitions",
            Category::MainFiles => "Main files",
            Category::OtherFiles => "Other files",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PathRule {
    Prefix(&'static str),
    Exact(&'static [&'static str]),
}

impl PathRule {
    pub fn matches(&self, relative_path: &str) -> bool {
        match self {
            PathRule::Prefix(prefix) => relative_path.starts_with(prefix),
            PathRule::Exact(names) => names.contains(&relative_path),
        }
    }
}

/// Entry files that live directly in the frontend root.
pub const MAIN_FILES: &[&str] = &["App.tsx", "main.tsx", "index.css", "vite-env.d.ts"];

/// First matching rule wins; anything unmatched is `Category::OtherFiles`.
pub const CATEGORY_RULES: &[(PathRule, Category)] = &[
    (PathRule::Prefix("components/dashboard"), Category::DashboardComponents),
    (PathRule::Prefix("components/documents"), Category::DocumentComponents),
    (PathRule::Prefix("components/layout"), Category::LayoutComponents),
    (PathRule::Prefix("components/"), Category::GeneralComponents),
    (PathRule::Prefix("hooks/"), Category::CustomHooks),
    (PathRule::Prefix("lib/"), Category::Libraries),
    (PathRule::Prefix("pages/"), Category::Pages),
    (PathRule::Prefix("types/"), Category::Types),
    (PathRule::Exact(MAIN_FILES), Category::MainFiles),
];

/// `relative_path` must use forward slashes.
pub fn categorize(relative_path: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(rule, _)| rule.matches(relative_path))
        .map(|(_, category)| *category)
        .unwrap_or(Category::OtherFiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_table() {
        let cases = [
            ("components/dashboard/Foo.tsx", Category::DashboardComponents),
            ("components/documents/FileUpload.tsx", Category::DocumentComponents),
            ("components/layout/AppSidebar.tsx", Category::LayoutComponents),
            ("components/Header.tsx", Category::GeneralComponents),
            ("components/forms/Input.tsx", Category::GeneralComponents),
            ("hooks/useAuth.ts", Category::CustomHooks),
            ("lib/api.ts", Category::Libraries),
            ("pages/Dashboard.tsx", Category::Pages),
            ("types/index.ts", Category::Types),
            ("App.tsx", Category::MainFiles),
            ("main.tsx", Category::MainFiles),
            ("index.css", Category::MainFiles),
            ("vite-env.d.ts", Category::MainFiles),
            ("random/Other.ts", Category::OtherFiles),
            ("tailwind.config.js", Category::OtherFiles),
        ];

        for (path, expected) in cases {
            assert_eq!(categorize(path), expected, "wrong category for {}", path);
        }
    }

    #[test]
    fn test_main_files_only_match_at_root() {
        assert_eq!(categorize("nested/App.tsx"), Category::OtherFiles);
        assert_eq!(categorize("pages/main.tsx"), Category::Pages);
    }

    #[test]
    fn test_prefix_rules_are_plain_string_prefixes() {
        // No trailing slash on the specific component rules.
        assert_eq!(
            categorize("components/dashboardWidgets/Chart.tsx"),
            Category::DashboardComponents
        );
        assert_eq!(categorize("hooksExtra/useX.ts"), Category::OtherFiles);
    }

    #[test]
    fn test_section_order_follows_rule_order() {
        let mut categories = vec![
            Category::OtherFiles,
            Category::Pages,
            Category::DashboardComponents,
            Category::MainFiles,
            Category::CustomHooks,
        ];
        categories.sort();
        assert_eq!(
            categories,
            vec![
                Category::DashboardComponents,
                Category::CustomHooks,
                Category::Pages,
                Category::MainFiles,
                Category::OtherFiles,
            ]
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::CustomHooks.to_string(), "Custom hooks");
        assert_eq!(Category::DashboardComponents.label(), "Dashboard components");
    }
}
