//! Operation outcomes: a status line or a JSON payload, never both.

use serde_json::Value;

/// The sole observable result of an operation besides persisted files.
/// Status lines embed the literal facts callers key assertions off of
/// (counts, indices, previous state names); JSON payloads carry stable
/// field names for listing/inspection operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Line(String),
    Json(Value),
}

impl Report {
    pub fn line(message: impl Into<String>) -> Self {
        Report::Line(message.into())
    }

    pub fn json(value: Value) -> Self {
        Report::Json(value)
    }

    pub fn render(&self) -> String {
        match self {
            Report::Line(message) => message.clone(),
            // Pretty-printing a value we built ourselves cannot fail.
            Report::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// What a handler hands back to the dispatcher: the report plus whether the
/// document was mutated and therefore needs persisting.
#[derive(Debug)]
pub struct OpOutcome {
    pub report: Report,
    pub changed: bool,
}

impl OpOutcome {
    pub fn changed(report: Report) -> Self {
        OpOutcome {
            report,
            changed: true,
        }
    }

    pub fn read_only(report: Report) -> Self {
        OpOutcome {
            report,
            changed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn line_renders_verbatim() {
        let report = Report::line("Deleted slide at index 2; 4 slides remaining.");
        assert_eq!(report.render(), "Deleted slide at index 2; 4 slides remaining.");
    }

    #[test]
    fn json_renders_pretty_with_stable_keys() {
        let report = Report::json(json!({"count": 3, "hasNotes": false}));
        let rendered = report.render();
        assert!(rendered.contains("\"count\": 3"));
        assert!(rendered.contains("\"hasNotes\": false"));
    }
}
