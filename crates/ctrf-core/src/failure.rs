//! Failure detail extraction.

use crate::tree::TaskResult;

/// Message and stack trace surfaced for a test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureDetails {
    pub message: String,
    pub trace: String,
}

/// Only the first recorded error is surfaced: one representative cause per test.
/// No result, no errors, or an empty error list all yield empty strings.
#[must_use]
pub fn extract_failure_details(result: Option<&TaskResult>) -> FailureDetails {
    let Some(first) = result
        .and_then(|r| r.errors.as_deref())
        .and_then(|errors| errors.first())
    else {
        return FailureDetails::default();
    };
    FailureDetails {
        message: first.message.clone().unwrap_or_default(),
        trace: first.stack_str.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TaskError;

    #[test]
    fn no_result_or_no_errors_is_empty() {
        assert_eq!(extract_failure_details(None), FailureDetails::default());

        let r = TaskResult {
            state: Some("pass".into()),
            ..TaskResult::default()
        };
        assert_eq!(extract_failure_details(Some(&r)), FailureDetails::default());

        let r = TaskResult {
            errors: Some(vec![]),
            ..TaskResult::default()
        };
        assert_eq!(extract_failure_details(Some(&r)), FailureDetails::default());
    }

    #[test]
    fn first_error_wins() {
        let r = TaskResult {
            state: Some("fail".into()),
            duration: Some(3.0),
            errors: Some(vec![
                TaskError {
                    message: Some("boom".into()),
                    stack_str: Some("at math.test.ts:4".into()),
                },
                TaskError {
                    message: Some("second".into()),
                    stack_str: None,
                },
            ]),
        };
        let d = extract_failure_details(Some(&r));
        assert_eq!(d.message, "boom");
        assert_eq!(d.trace, "at math.test.ts:4");
    }

    #[test]
    fn missing_fields_become_empty() {
        let r = TaskResult {
            errors: Some(vec![TaskError::default()]),
            ..TaskResult::default()
        };
        assert_eq!(extract_failure_details(Some(&r)), FailureDetails::default());
    }
}
