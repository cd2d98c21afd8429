use chrono::{DateTime, Utc};

use crate::application::dto::LegacyReport;
use crate::ports::outbound::ReportSurface;
use crate::scanning::domain::ScanResult;

/// ReportRenderer - walks a scan result and drives a `ReportSurface`.
///
/// Layout is a pure function of the input: title block, summary counts,
/// then one section per vulnerable dependency with one line pair per
/// vulnerability. A page break is inserted when the cursor passes the
/// relevant threshold *before* writing the next element, so a section header
/// never lands on the very bottom of a page.
pub struct ReportRenderer;

/// Cursor threshold checked before each dependency header.
const DEPENDENCY_PAGE_BREAK: f32 = 650.0;

/// Tighter threshold checked before each individual vulnerability line.
const VULNERABILITY_PAGE_BREAK: f32 = 700.0;

/// Legacy path caps: findings, vulnerabilities per finding, and description
/// length, preserved from the pre-store report endpoint.
const LEGACY_MAX_FINDINGS: usize = 10;
const LEGACY_MAX_VULNERABILITIES: usize = 5;
const LEGACY_MAX_DESCRIPTION_CHARS: usize = 100;

impl ReportRenderer {
    /// Renders the full report for a stored scan result.
    pub fn render(result: &ScanResult, surface: &mut dyn ReportSurface) {
        surface.write_line(20.0, "Vulnerability Scan Report");
        surface.write_line(
            12.0,
            &format!(
                "Generated on: {}",
                result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        );
        surface.write_line(12.0, &format!("Scan ID: {}", result.scan_id));
        surface.move_down(2.0);

        surface.write_line(16.0, "Scan Summary");
        surface.write_line(
            10.0,
            &format!("Total Dependencies: {}", result.total_dependencies),
        );
        surface.write_line(
            10.0,
            &format!("Dependencies Scanned: {}", result.scanned_dependencies),
        );
        surface.write_line(
            10.0,
            &format!(
                "Vulnerable Dependencies Found: {}",
                result.vulnerable_dependencies
            ),
        );
        surface.move_down(1.0);

        if result.results.is_empty() {
            surface.write_line(12.0, "No vulnerabilities found!");
            return;
        }

        surface.write_line(16.0, "Vulnerabilities Found:");
        surface.move_down(1.0);

        for (index, finding) in result.results.iter().enumerate() {
            if surface.cursor() > DEPENDENCY_PAGE_BREAK {
                surface.add_page();
            }
            surface.write_line(
                12.0,
                &format!(
                    "{}. {}@{} ({})",
                    index + 1,
                    finding.dependency,
                    finding.version,
                    finding.ecosystem
                ),
            );
            surface.move_down(0.3);

            for (vuln_index, vuln) in finding.vulnerabilities.iter().enumerate() {
                if surface.cursor() > VULNERABILITY_PAGE_BREAK {
                    surface.add_page();
                }
                surface.write_line(
                    10.0,
                    &format!(
                        "   {}. {} - Severity: {} - Score: {}",
                        vuln_index + 1,
                        vuln.id,
                        vuln.severity,
                        vuln.score
                    ),
                );
                surface.write_line(10.0, &format!("   Description: {}", vuln.description));
                surface.move_down(0.2);
            }
            surface.move_down(0.5);
        }
    }

    /// Legacy rendering path for directly-posted results: tighter caps, a
    /// two-count summary, and the render time in the header instead of a
    /// scan timestamp. Kept distinct for backward compatibility.
    pub fn render_legacy(
        report: &LegacyReport,
        title: &str,
        generated_at: DateTime<Utc>,
        surface: &mut dyn ReportSurface,
    ) {
        surface.write_line(20.0, title);
        surface.write_line(
            12.0,
            &format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        );
        surface.move_down(2.0);

        surface.write_line(16.0, "Scan Summary");
        surface.write_line(
            10.0,
            &format!("Total Dependencies Scanned: {}", report.total_dependencies),
        );
        surface.write_line(
            10.0,
            &format!(
                "Vulnerable Dependencies Found: {}",
                report.vulnerable_dependencies
            ),
        );
        surface.move_down(1.0);

        let findings = report.findings();
        if findings.is_empty() {
            surface.write_line(12.0, "No vulnerabilities found!");
            return;
        }

        surface.write_line(16.0, "Vulnerabilities Found:");
        surface.move_down(1.0);

        for (index, finding) in findings.iter().take(LEGACY_MAX_FINDINGS).enumerate() {
            if surface.cursor() > DEPENDENCY_PAGE_BREAK {
                surface.add_page();
            }
            surface.write_line(
                12.0,
                &format!("{}. {}@{}", index + 1, finding.dependency, finding.version),
            );
            surface.move_down(0.3);

            for (vuln_index, vuln) in finding
                .vulnerabilities
                .iter()
                .take(LEGACY_MAX_VULNERABILITIES)
                .enumerate()
            {
                let description: String = vuln
                    .description
                    .chars()
                    .take(LEGACY_MAX_DESCRIPTION_CHARS)
                    .collect();
                surface.write_line(
                    10.0,
                    &format!(
                        "   {}. {} - {} (Score: {})",
                        vuln_index + 1,
                        vuln.id,
                        vuln.severity,
                        vuln.score
                    ),
                );
                surface.write_line(10.0, &format!("      Description: {}...", description));
                surface.move_down(0.2);
            }
            surface.move_down(1.0);
        }
    }
}
