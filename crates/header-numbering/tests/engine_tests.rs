use header_numbering::{
    apply_edits, number_document, remove_numbering, resolve_config, HeaderSeparator,
    NumberingConfig, NumberingMode, Settings,
};

fn config() -> NumberingConfig {
    NumberingConfig::from_settings(&Settings::default())
}

fn number(text: &str, config: &NumberingConfig) -> String {
    apply_edits(text, &number_document(text, config))
}

#[test]
fn test_nested_document() {
    let text = "# A\n## B\n### C\n## D\n# E\n### F";
    assert_eq!(
        number(text, &config()),
        "# 1\tA\n## 1.1\tB\n### 1.1.1\tC\n## 1.2\tD\n# 2\tE\n### 2.1.1\tF"
    );
}

#[test]
fn test_start_level_two() {
    let cfg = NumberingConfig { start_level: 2, ..config() };
    let text = "# Title\n## Intro\n### Detail\n## Usage";
    assert_eq!(number(text, &cfg), "# Title\n## 1\tIntro\n### 1.1\tDetail\n## 2\tUsage");
}

#[test]
fn test_deleted_header_renumbers() {
    let cfg = config();
    let numbered = number("# A\n# B\n# C", &cfg);
    let without_b = numbered.replace("# 2\tB\n", "");
    assert_eq!(number(&without_b, &cfg), "# 1\tA\n# 2\tC");
}

#[test]
fn test_numbers_inside_fences_survive() {
    let text = "# A\n```rust\n# not a header\n## 9.9\tneither\n```\n## B";
    let numbered = number(text, &config());
    assert_eq!(numbered, "# 1\tA\n```rust\n# not a header\n## 9.9\tneither\n```\n## 1.1\tB");

    let stripped = apply_edits(&numbered, &remove_numbering(&numbered, &config()));
    assert_eq!(stripped, text);
}

#[test]
fn test_space_separator_round_trip() {
    let cfg = NumberingConfig { header_separator: HeaderSeparator::Space, ..config() };
    let text = "# Plans for 2024\n## Next steps";
    let numbered = number(text, &cfg);
    assert_eq!(numbered, "# 1 Plans for 2024\n## 1.1 Next steps");

    let stripped = apply_edits(&numbered, &remove_numbering(&numbered, &cfg));
    assert_eq!(stripped, text);
}

#[test]
fn test_space_separator_reads_leading_number_token_as_number() {
    let cfg = NumberingConfig { header_separator: HeaderSeparator::Space, ..config() };
    assert_eq!(number("# 2024 plans", &cfg), "# 1 plans");
}

#[test]
fn test_yaml_document_end_to_end() {
    let settings = Settings { mode: NumberingMode::Yaml, ..Default::default() };
    let text = "---\ntitle: Notes\nheader-auto-numbering:\n  - first-level h2\n  - max 1\n  - separator /\n---\n# Title\n## A\n### Deep\n## B";

    let cfg = resolve_config(&settings, "notes.md", text);
    let numbered = number(text, &cfg);
    assert!(numbered.ends_with("# Title\n## 1\tA\n### Deep\n## 2\tB"));
    assert!(numbered.starts_with("---\ntitle: Notes\n"));
}

#[test]
fn test_front_matter_lines_are_not_headers() {
    let text = "---\ntags: [a]\n---\n# A";
    assert_eq!(number(text, &config()), "---\ntags: [a]\n---\n# 1\tA");
}
