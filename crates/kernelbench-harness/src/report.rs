use std::fmt;

use crate::BenchmarkReport;

/// Plain-text rendering of a report for one model.
pub struct ReportDisplay<'a> {
    model: &'a str,
    report: &'a BenchmarkReport,
}

impl BenchmarkReport {
    pub fn display_for<'a>(&'a self, model: &'a str) -> ReportDisplay<'a> {
        ReportDisplay {
            model,
            report: self,
        }
    }
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        writeln!(f, "===== Inference Performance Results =====")?;
        writeln!(f, "Model: {}", self.model)?;
        writeln!(f, "Iterations: {}", r.count)?;
        writeln!(f, "Total time: {:.3} ms", r.total_ms)?;
        writeln!(f, "Average time: {:.3} ms", r.mean_ms)?;
        writeln!(f, "Median time: {:.3} ms", r.median_ms)?;
        writeln!(f, "Min time: {:.3} ms", r.min_ms)?;
        writeln!(f, "Max time: {:.3} ms", r.max_ms)?;
        writeln!(f, "Standard deviation: {:.3} ms", r.std_dev_ms)?;
        write!(f, "Throughput: {:.3} inferences/second", r.throughput_per_sec)
    }
}
