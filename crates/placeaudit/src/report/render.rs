//! Plain-text rendering of a [`Report`].

use std::fmt;

use super::aggregate::Report;

const WIDTH: usize = 60;

/// `n` as a percentage of `total` with one decimal, or `n/a` when `total` is 0.
pub fn percentage(n: usize, total: usize) -> String {
    if total == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", n as f64 / total as f64 * 100.0)
    }
}

fn heavy_rule() -> String {
    "═".repeat(WIDTH)
}

fn light_rule() -> String {
    "─".repeat(WIDTH)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total;

        writeln!(f)?;
        writeln!(f, "{}", heavy_rule())?;
        writeln!(f, "  📊 Quality report - {total} records")?;
        writeln!(f, "{}", heavy_rule())?;
        writeln!(f)?;

        writeln!(f, "FILL RATE BY FIELD")?;
        writeln!(f, "  {:<22} {:>10}  {:>6}  {:>6}", "Field", "Filled", "%", "Null")?;
        writeln!(
            f,
            "  {}  {}  {}  {}",
            "-".repeat(22),
            "-".repeat(10),
            "-".repeat(6),
            "-".repeat(6)
        )?;
        for fill in &self.fields {
            let marker = if fill.sparse { " ⚠️ " } else { "" };
            writeln!(
                f,
                "  {:<22} {:>10}  {:>6}  {:>6}{}",
                fill.field,
                fill.filled,
                percentage(fill.filled, total),
                fill.null,
                marker
            )?;
        }

        writeln!(f)?;
        writeln!(f, "{}", light_rule())?;
        writeln!(f, "DEFECTS FOUND")?;
        if self.defects.is_empty() {
            writeln!(f, "  ✅ No problems found!")?;
        } else {
            writeln!(f, "  {:<50} {:>5}", "Defect", "Count")?;
            writeln!(f, "  {}  {}", "-".repeat(50), "-".repeat(5))?;
            for row in &self.defects {
                writeln!(
                    f,
                    "  {:<50} {:>5}  ({})",
                    row.description,
                    row.count,
                    percentage(row.count, total)
                )?;
                for example in &row.examples {
                    writeln!(f, "      e.g. {example}")?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", light_rule())?;
        writeln!(f, "RECORDS BY SEARCH TERM")?;
        for term in &self.search_terms {
            writeln!(f, "  {:<40} {:>5}", term.term, term.count)?;
        }

        if !self.samples.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", light_rule())?;
            writeln!(
                f,
                "SAMPLE PROBLEM RECORDS (first {} of {})",
                self.samples.len(),
                self.summary.defective
            )?;
            for sample in &self.samples {
                writeln!(f)?;
                writeln!(f, "  📍 {}", sample.label)?;
                if let Some(url) = &sample.url {
                    writeln!(f, "     {url}")?;
                }
                for defect in &sample.defects {
                    writeln!(f, "     ❌ {defect}")?;
                }
            }
        }

        let summary = &self.summary;
        writeln!(f)?;
        writeln!(f, "{}", heavy_rule())?;
        writeln!(
            f,
            "  ✅ Clean records: {}/{} ({})",
            summary.clean,
            summary.total,
            percentage(summary.clean, summary.total)
        )?;
        writeln!(
            f,
            "  ⚠️  Records with problems: {}/{} ({})",
            summary.defective,
            summary.total,
            percentage(summary.defective, summary.total)
        )?;
        writeln!(f, "{}", heavy_rule())
    }
}

/// Render the report as text.
pub fn render(report: &Report) -> String {
    report.to_string()
}
