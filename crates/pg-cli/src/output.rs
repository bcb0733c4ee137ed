use pg_core::{Report, ReviewScores};
use serde::Serialize;

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
struct ReportResponse<'a> {
    #[serde(flatten)]
    report: &'a Report,
    scores: ReviewScores,
}

/// The review message Gerrit shows for a report: the rendered verdicts,
/// with the verified score appended when it is not zero.
#[must_use]
pub fn review_message(report: &Report) -> String {
    let scores = report.scores();
    let mut message = report.render();
    if scores.verified != 0 {
        message.push_str(&format!(" ({})", scores.verified));
    }
    message
}

/// Render a hook report in the requested format.
pub fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    let scores = report.scores();
    match format {
        OutputFormat::Review => Ok(format!(
            "{}\n{}\n{}",
            scores.code_review,
            scores.verified,
            review_message(report)
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ReportResponse {
            report,
            scores,
        })?),
        OutputFormat::Raw => Ok(serde_json::to_string(&ReportResponse { report, scores })?),
    }
}

/// Print a hook report in the requested format.
pub fn output(report: &Report, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(report, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pg_core::{HookContext, HookKind, Verdict};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;

    fn backport_report() -> Report {
        let mut report = Report::new(HookContext::new(HookKind::CheckBackport));
        report.push(Verdict::warn("The patch wasn't backported to all the relevant stable branches."));
        report
    }

    #[test]
    fn review_format_lists_scores_then_message() {
        assert_eq!(
            render(&backport_report(), OutputFormat::Review).unwrap(),
            "0\n-1\n* Check Backport::WARN, The patch wasn't backported to all the relevant stable branches. (-1)"
        );
    }

    #[test]
    fn clean_report_has_no_score_suffix() {
        let report = Report::single(
            HookContext::new(HookKind::CheckProduct),
            Verdict::ok("product: vdsm").for_bug(1234),
        );
        assert_eq!(
            render(&report, OutputFormat::Review).unwrap(),
            "0\n0\n* Check Product::#1234::OK, product: vdsm"
        );
    }

    #[test]
    fn json_format_includes_scores() {
        let value: Value =
            serde_json::from_str(&render(&backport_report(), OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(value["scores"]["verified"], -1);
        assert_eq!(value["context"]["hook"], "check_backport");
        assert_eq!(value["verdicts"][0]["level"], "WARN");
    }

    #[test]
    fn raw_format_is_one_line() {
        let rendered = render(&backport_report(), OutputFormat::Raw).unwrap();
        assert_eq!(rendered.lines().count(), 1);
    }
}
