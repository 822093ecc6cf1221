use crate::agent::types::VerificationResult;

const RULE_WIDTH: usize = 60;
const TITLE: &str = "AI OPERATIONS ASSISTANT - RESULTS";

/// Renders a verification outcome as the plain-text report shown to users.
pub fn format_output(verification: &VerificationResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut output = vec![rule.clone(), TITLE.to_string(), rule.clone()];

    let status = if verification.is_complete {
        "✓ COMPLETE"
    } else {
        "⚠ INCOMPLETE"
    };
    output.push(format!("\nStatus: {status}"));
    output.push(format!(
        "Confidence: {}",
        verification.confidence.to_string().to_uppercase()
    ));

    if !verification.issues_found.is_empty() {
        output.push("\n⚠ Issues Found:".to_string());
        for issue in &verification.issues_found {
            output.push(format!("  - {issue}"));
        }
    }

    output.push(format!("\n{rule}"));
    output.push("ANSWER:".to_string());
    output.push(rule.clone());
    output.push(verification.final_answer.clone());
    output.push(format!("\n{rule}"));

    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::types::ExecutionResult;

    #[test]
    fn test_complete_report() {
        let report = format_output(&VerificationResult::complete("All good".into()));

        assert!(report.starts_with(&"=".repeat(60)));
        assert!(report.contains("Status: ✓ COMPLETE"));
        assert!(report.contains("Confidence: HIGH"));
        assert!(!report.contains("Issues Found"));
        assert!(report.contains("ANSWER:\n============================================================\nAll good"));
        assert!(report.ends_with(&"=".repeat(60)));
    }

    #[test]
    fn test_incomplete_report_lists_issues() {
        let verification =
            VerificationResult::incomplete("No data returned from tools", ExecutionResult::new("t"));
        let report = format_output(&verification);

        assert!(report.contains("Status: ⚠ INCOMPLETE"));
        assert!(report.contains("Confidence: LOW"));
        assert!(report.contains("⚠ Issues Found:\n  - No data returned from tools"));
        assert!(report.contains("Unable to fully complete the task: No data returned from tools."));
    }
}
