//! Page size analyzer.
//!
//! Single-finding module over the decoded payload size. Oversized pages risk
//! truncation when AI engines load them into bounded context windows.

use super::{Analyzer, AuditInput};
use crate::config::Config;
use crate::{AnalyzerResult, Finding, Module, Rule};

pub struct PageSizeAnalyzer;

impl Analyzer for PageSizeAnalyzer {
    fn module(&self) -> Module {
        Module::PageSize
    }

    fn analyze(&self, input: &AuditInput, config: &Config) -> AnalyzerResult {
        let bytes = input.payload_bytes;
        let thresholds = &config.page_size;

        let finding = if bytes < thresholds.warn_bytes {
            Finding::pass(
                Rule::PayloadSize,
                Module::PageSize,
                1.0,
                format!("payload is {} ({bytes} bytes)", human_size(bytes)),
            )
        } else if bytes < thresholds.max_bytes {
            Finding::scored(
                Rule::PayloadSize,
                Module::PageSize,
                1.0,
                0.5,
                format!(
                    "payload is {} ({bytes} bytes); AI engines may truncate pages over {}",
                    human_size(bytes),
                    human_size(thresholds.warn_bytes)
                ),
                "Reduce page weight (inline assets, markup bloat) below the warning threshold",
            )
        } else {
            Finding::fail(
                Rule::PayloadSize,
                Module::PageSize,
                1.0,
                format!(
                    "payload is {} ({bytes} bytes), above the {} hard ceiling",
                    human_size(bytes),
                    human_size(thresholds.max_bytes)
                ),
                "Split or slim the page; at this size AI context windows will truncate it",
            )
        };

        AnalyzerResult::ok(Module::PageSize, vec![finding])
    }
}

fn human_size(bytes: usize) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.0} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes} B")
    }
}
