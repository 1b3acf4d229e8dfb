use anyhow::Result;
use similar::{ChangeTag, TextDiff};

/// Rendered rows with ANSI styling removed
#[derive(Debug, Clone, Default)]
pub struct ScreenCapture {
    lines: Vec<String>,
}

impl ScreenCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: &[String]) -> Self {
        let mut capture = Self::new();
        capture.capture_rows(rows);
        capture
    }

    pub fn capture_rows(&mut self, rows: &[String]) {
        self.lines.clear();
        self.lines.extend(rows.iter().map(|r| strip(r)));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Index of the first row containing `needle`
    pub fn find_line(&self, needle: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.contains(needle))
    }
}

fn strip(text: &str) -> String {
    let stripped = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&stripped).trim_end().to_string()
}

pub struct ScreenComparator;

impl Default for ScreenComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenComparator {
    pub fn new() -> Self {
        Self
    }

    pub fn compare_lines(&self, expected: &[&str], actual: &[String]) -> Result<()> {
        let expected_clean = expected.join("\n");
        let actual_clean = actual
            .iter()
            .map(|l| strip(l))
            .collect::<Vec<_>>()
            .join("\n");

        if expected_clean == actual_clean {
            return Ok(());
        }

        let diff = TextDiff::from_lines(&expected_clean, &actual_clean);
        let mut diff_output = String::new();
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            diff_output.push_str(&format!("{sign}{change}"));
        }

        anyhow::bail!(
            "Screen mismatch:\n\nExpected:\n{}\n\nActual:\n{}\n\nDiff:\n{}",
            expected_clean,
            actual_clean,
            diff_output
        )
    }

    pub fn assert_contains(&self, rows: &[String], needle: &str) -> Result<()> {
        let capture = ScreenCapture::from_rows(rows);
        if !capture.contains(needle) {
            anyhow::bail!(
                "Screen does not contain expected text:\nExpected to find:\n{}\n\nIn screen:\n{}",
                needle,
                capture.text()
            );
        }
        Ok(())
    }

    pub fn assert_not_contains(&self, rows: &[String], needle: &str) -> Result<()> {
        let capture = ScreenCapture::from_rows(rows);
        if capture.contains(needle) {
            anyhow::bail!(
                "Screen contains unexpected text:\nDid not expect to find:\n{}\n\nIn screen:\n{}",
                needle,
                capture.text()
            );
        }
        Ok(())
    }
}
