//! Vertical card display for import reports.
//!
//! Renders the verdict, the counters (displayed vs reconciled) and the
//! failed-record list as a grouped, human-readable card.

use leadsalvage_core::{ImportReport, RecordReport, SalvageConfig, StatsTriple, Strategy};

const MAX_RECORDS: usize = 50;

// ── Public API ──

/// Print an import report as a vertical card.
pub fn print_report_card(report: &ImportReport, config: &SalvageConfig) {
    print!("{}", render_card(report, config));
}

/// Render the card to a string, one `\n` after every line.
pub fn render_card(report: &ImportReport, config: &SalvageConfig) -> String {
    let verdict = &report.verdict;
    let mut lines = vec![
        format!("=== {} ===", verdict.title),
        format!("[{}] {}", verdict.status, verdict.message),
        String::new(),
    ];

    render_stats(&mut lines, report);
    render_records(&mut lines, &report.records, config);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// ── Section rendering ──

fn render_stats(lines: &mut Vec<String>, report: &ImportReport) {
    lines.push("Counters".to_string());
    lines.push(stat_row("created", report.displayed.created, report.stats.created));
    lines.push(stat_row("total", report.displayed.total, report.stats.total));
    lines.push(stat_row("failed", report.displayed.failed, report.stats.failed));
    if report.corrected {
        lines.push(format!(
            "  (reconciled against {} recovered failed record(s))",
            report.authoritative_failed
        ));
    }
    lines.push(String::new());
}

fn stat_row(label: &str, shown: u64, reconciled: u64) -> String {
    if shown == reconciled {
        format!("  {:<26} {}", label, reconciled)
    } else {
        format!("  {:<26} {} (shown: {})", label, reconciled, shown)
    }
}

fn render_records(lines: &mut Vec<String>, records: &[RecordReport], config: &SalvageConfig) {
    if records.is_empty() {
        return;
    }

    lines.push(format!("Failed records ({}):", records.len()));
    for record in records.iter().take(MAX_RECORDS) {
        render_record(lines, record, config);
    }
    if records.len() > MAX_RECORDS {
        lines.push(format!("  ... and {} more", records.len() - MAX_RECORDS));
    }
    lines.push(String::new());
}

fn render_record(lines: &mut Vec<String>, record: &RecordReport, config: &SalvageConfig) {
    let extraction = &record.extraction;

    if let Some(text) = &extraction.verbatim {
        lines.push(format!("  - {}", text));
        return;
    }

    let heading = match extraction.strategy {
        Strategy::PlainText => &config.plain_text_heading,
        _ => &config.structured_heading,
    };
    lines.push(format!("  - {}", heading));

    for entry in &record.rendered {
        // Plain-text findings carry the placeholder name only.
        if extraction.strategy.is_structured() {
            lines.push(match &entry.email {
                Some(email) => format!("    {} ({})", entry.display_name, email),
                None => format!("    {}", entry.display_name),
            });
        }
        lines.extend(entry.messages.iter().map(|m| format!("      * {}", m)));
    }
}

/// One-line counter summary for log output.
pub fn summary_line(stats: &StatsTriple) -> String {
    format!(
        "created={} total={} failed={}",
        stats.created, stats.total, stats.failed
    )
}
