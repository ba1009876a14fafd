//! Console reporter with colored output

use crate::{FindingStatus, ModuleStatus, Priority, Report};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a full audit
    pub fn report(&self, report: &Report) {
        self.print_header(report);
        self.print_score(report);
        self.print_breakdown(report);
        self.print_findings(report);
        self.print_recommendations(report);
        println!();
    }

    /// Report in quiet mode (just the score)
    pub fn report_quiet(&self, report: &Report) {
        println!("{}/100", report.overall_score);
    }

    fn print_header(&self, report: &Report) {
        println!();
        println!("{}", format!("GEO Audit: {}", report.url).bold());
        println!(
            "   {}",
            report
                .generated_at
                .format("%Y-%m-%d %H:%M UTC")
                .to_string()
                .dimmed()
        );
        println!();
    }

    fn print_score(&self, report: &Report) {
        let bar = self.create_score_bar(report.overall_score);
        println!("   Score: {}", bar);
        println!();
    }

    fn print_breakdown(&self, report: &Report) {
        println!("   {}", "Module Breakdown:".bold());

        for module in &report.breakdown.modules {
            let raw = module.raw_score.round() as u8;
            let bar = self.create_mini_bar(raw);
            let score_str = format!("{raw:>3}");
            let colored_score = if module.status == ModuleStatus::Unavailable {
                "  -".dimmed()
            } else if raw >= 80 {
                score_str.green()
            } else if raw >= 50 {
                score_str.yellow()
            } else {
                score_str.red()
            };

            let note = match module.status {
                ModuleStatus::Ok => String::new(),
                ModuleStatus::Degraded => " (degraded)".to_string(),
                ModuleStatus::Unavailable => " (unavailable, weight redistributed)".to_string(),
            };

            println!(
                "   {} {} {} (weight {:.0}%){}",
                bar,
                colored_score,
                module.module.title(),
                module.weight * 100.0,
                note.dimmed()
            );
        }
        println!();
    }

    /// Print finding detail lines. Passing findings only show up in
    /// verbose mode.
    fn print_findings(&self, report: &Report) {
        let shown: Vec<_> = report
            .findings
            .iter()
            .filter(|f| self.verbose || f.status != FindingStatus::Pass)
            .collect();
        if shown.is_empty() {
            return;
        }

        println!("   {}", "Findings:".bold());
        for finding in shown {
            let icon = match finding.status {
                FindingStatus::Pass => "✓".green(),
                FindingStatus::Partial => "⚠".yellow(),
                FindingStatus::Fail => "✗".red(),
            };
            println!(
                "   {} [{}] {}",
                icon,
                finding.rule.to_string().dimmed(),
                finding.detail
            );
        }
        println!();
    }

    fn print_recommendations(&self, report: &Report) {
        if report.recommendations.is_empty() {
            println!("   {}", "No recommendations — page is in good shape.".green());
            return;
        }

        println!("   {}", "Recommendations:".bold());
        for (index, rec) in report.recommendations.iter().enumerate() {
            println!(
                "   {:>2}. {} {}",
                index + 1,
                self.colorize_priority(rec.priority),
                rec.text
            );
        }
    }

    fn colorize_priority(&self, priority: Priority) -> colored::ColoredString {
        let tag = format!("[{priority}]");
        match priority {
            Priority::Critical => tag.red().bold(),
            Priority::High => tag.red(),
            Priority::Medium => tag.yellow(),
            Priority::Low => tag.blue(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>3}/100",
            "█".repeat(filled),
            "░".repeat(empty),
            score
        );

        if score >= 80 {
            bar.green().to_string()
        } else if score >= 50 {
            bar.yellow().to_string()
        } else {
            bar.red().to_string()
        }
    }

    fn create_mini_bar(&self, score: u8) -> String {
        let filled = (score as usize * 10) / 100;
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bar_fills_proportionally() {
        let reporter = ConsoleReporter::new();
        let bar = reporter.create_score_bar(100);
        assert!(bar.contains(&"█".repeat(20)));
        let bar = reporter.create_score_bar(0);
        assert!(bar.contains(&"░".repeat(20)));
    }

    #[test]
    fn mini_bar_is_ten_cells() {
        let reporter = ConsoleReporter::new();
        let bar = reporter.create_mini_bar(50);
        assert_eq!(bar.chars().count(), 12); // brackets + 10 cells
    }
}
