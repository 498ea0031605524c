//! Diagnostic JSON emission and terminal rendering (§6).

use crate::diagnostic::{NextGenDiagnostic, Severity, DIAGNOSTIC_SCHEMA_VERSION};

fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn severity_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
        Severity::Hint => "hint",
    }
}

impl NextGenDiagnostic {
    /// `{"schema_version":1,"code":"S1101","severity":"error","location":{...},
    /// "summary":...,"hypothesis_count":N,"primary_hypothesis":{...},"is_cascade_effect":bool}`
    /// per §6. Hand-built rather than via `serde_json::to_string`, since
    /// the format names an exact, narrow field set rather than this
    /// struct's full internal shape.
    #[must_use]
    pub fn to_json(&self) -> String {
        let loc = &self.primary_location;
        let primary_hypothesis = self
            .primary_hypothesis()
            .map(|h| {
                format!(
                    r#"{{"probability":{:.6},"category":"{}"}}"#,
                    h.confidence(),
                    escape_json(&h.category)
                )
            })
            .unwrap_or_else(|| "null".to_string());

        format!(
            r#"{{"schema_version":{},"code":"{}","severity":"{}","location":{{"file":"{}","line":{},"column":{}}},"summary":"{}","hypothesis_count":{},"primary_hypothesis":{},"is_cascade_effect":{}}}"#,
            DIAGNOSTIC_SCHEMA_VERSION,
            escape_json(&self.code),
            severity_str(self.severity),
            escape_json(&loc.file),
            loc.line,
            loc.column,
            escape_json(&self.summary),
            self.hypotheses().len(),
            primary_hypothesis,
            self.cascade_root.is_some(),
        )
    }

    /// `severity[CODE]: summary\n  --> file:line:col\n[  Most likely
    /// causes: …][  Type flow chain: …][  Correlated changes: …]
    /// [  Suggested fixes: …]` per §6.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut out = format!(
            "{}[{}]: {}\n  --> {}:{}:{}\n",
            severity_str(self.severity),
            self.code,
            self.summary,
            self.primary_location.file,
            self.primary_location.line,
            self.primary_location.column,
        );

        if !self.hypotheses().is_empty() {
            out.push_str("  Most likely causes:\n");
            for h in self.hypotheses() {
                out.push_str(&format!(
                    "    - ({:.0}%) {}\n",
                    h.confidence() * 100.0,
                    h.description
                ));
            }
        }

        if let Some(flow) = &self.type_flow {
            if !flow.is_empty() {
                out.push_str("  Type flow chain:\n");
                for step in &flow.steps {
                    out.push_str(&format!("    - {}\n", step.description));
                }
            }
        }

        if let Some(ctx) = &self.semantic_context {
            if !ctx.correlated_changes.is_empty() {
                out.push_str("  Correlated changes:\n");
                for cid in &ctx.correlated_changes {
                    out.push_str(&format!("    - {}\n", cid.to_hex()));
                }
            }
        }

        if !self.fix_suggestions.is_empty() {
            out.push_str("  Suggested fixes:\n");
            for fix in &self.fix_suggestions {
                out.push_str(&format!("    - {}\n", fix.description));
            }
        }

        out
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::hypothesis::Hypothesis;
    use dispatch_common::SourceLocation;

    #[test]
    fn json_escapes_quotes_and_newlines() {
        let mut d = NextGenDiagnostic::new(
            1,
            "S1101",
            Severity::Error,
            SourceLocation::new("a\"b\n.rs", 1, 1, dispatch_common::Span::DUMMY),
            "ambiguous call to \"add\"",
        );
        d.add_hypothesis(Hypothesis::new("dispatch", "two exact matches").with_confidence(0.8));
        let json = d.to_json();
        assert!(json.contains("\\\"add\\\""));
        assert!(json.contains("a\\\"b\\n.rs"));
    }

    #[test]
    fn terminal_format_starts_with_severity_and_code() {
        let d = NextGenDiagnostic::new(
            1,
            "S1102",
            Severity::Error,
            SourceLocation::new("x.dp", 3, 5, dispatch_common::Span::DUMMY),
            "no matching implementation",
        );
        let rendered = d.to_terminal();
        assert!(rendered.starts_with("error[S1102]: no matching implementation\n"));
        assert!(rendered.contains("--> x.dp:3:5"));
    }
}
