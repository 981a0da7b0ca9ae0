use serde::{Deserialize, Serialize};

/// A terminal syntax error. Raised once no declaration matches at the
/// top-level loop; the parse never returns a partial AST alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[error("{message} (line {line})")]
pub struct ThriftSyntaxError {
    pub message: String,
    /// Source excerpt starting at the failure offset.
    pub context: String,
    /// 1-based line of the failure offset.
    pub line: u32,
}

impl ThriftSyntaxError {
    pub fn new(message: impl Into<String>, context: impl Into<String>, line: u32) -> Self {
        ThriftSyntaxError {
            message: message.into(),
            context: context.into(),
            line,
        }
    }

    /// Serialize to the fixed error JSON shape consumed by drivers.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "context": self.context,
            "line":    self.line,
            "message": self.message,
        })
    }
}

/// Why a rule did not match.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reason {
    /// The input did not start with what the rule needs.
    Expected(String),
    /// The input matched but is not acceptable, e.g. a duplicate field id.
    Invalid(String),
}

/// A speculative failure. Every grammar rule returns one of these on
/// non-match; combinators turn it into rollback-and-retry or
/// rollback-and-stop. Never escapes [`crate::parse`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Miss {
    pub offset: usize,
    pub reason: Reason,
}

impl Miss {
    /// Whether this miss is a better diagnostic than `other`.
    pub fn outranks(&self, other: &Miss) -> bool {
        match (&self.reason, &other.reason) {
            (Reason::Invalid(_), Reason::Expected(_)) => true,
            (Reason::Expected(_), Reason::Invalid(_)) => false,
            _ => self.offset >= other.offset,
        }
    }
}

/// Result of a single grammar rule.
pub(crate) type Rule<T> = Result<T, Miss>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_line() {
        let e = ThriftSyntaxError::new("unexpected `}`", "}", 4);
        assert_eq!(e.to_string(), "unexpected `}` (line 4)");
    }

    #[test]
    fn json_shape_has_three_fields() {
        let e = ThriftSyntaxError::new("m", "ctx", 2);
        let v = e.to_json_value();
        assert_eq!(v["line"], 2);
        assert_eq!(v["context"], "ctx");
        assert_eq!(v.as_object().map(|o| o.len()), Some(3));
    }

    #[test]
    fn invalid_miss_outranks_deeper_expectation() {
        let invalid = Miss {
            offset: 3,
            reason: Reason::Invalid("duplicate".into()),
        };
        let expected = Miss {
            offset: 10,
            reason: Reason::Expected("`}`".into()),
        };
        assert!(invalid.outranks(&expected));
        assert!(!expected.outranks(&invalid));
    }
}
