use serde_json::Value;
use thiserror::Error;

use crate::models::HomeworkStatus;

/// Generic class of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Type,
    Key,
    Value,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("API response is not a JSON object")]
    NotAnObject,
    #[error("API response is missing key \"{0}\"")]
    MissingKey(&'static str),
    #[error("\"current_date\" is not an integer")]
    CurrentDateNotInteger,
    #[error("\"homeworks\" is not a list")]
    HomeworksNotList,
    #[error("homework in API response has no \"homework_name\": homework = {0}")]
    MissingHomeworkName(String),
    #[error("unknown homework status in API response, status = {0}")]
    UnknownStatus(String),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAnObject | Self::CurrentDateNotInteger | Self::HomeworksNotList => {
                ErrorKind::Type
            }
            Self::MissingKey(_) | Self::MissingHomeworkName(_) => ErrorKind::Key,
            Self::UnknownStatus(_) => ErrorKind::Value,
        }
    }
}

/// Checks the envelope shape. Elements of `homeworks` are left to [`parse_status`].
#[tracing::instrument(name = "check_response", skip_all)]
pub fn check_response(response: &Value) -> Result<(), ValidationError> {
    tracing::info!("Checking API response");
    let envelope = response.as_object().ok_or(ValidationError::NotAnObject)?;

    let homeworks = envelope
        .get("homeworks")
        .ok_or(ValidationError::MissingKey("homeworks"))?;
    let current_date = envelope
        .get("current_date")
        .ok_or(ValidationError::MissingKey("current_date"))?;

    if !(current_date.is_i64() || current_date.is_u64()) {
        return Err(ValidationError::CurrentDateNotInteger);
    }
    if !homeworks.is_array() {
        return Err(ValidationError::HomeworksNotList);
    }
    Ok(())
}

#[tracing::instrument(name = "parse_status", skip_all)]
pub fn parse_status(homework: &Value) -> Result<String, ValidationError> {
    let name = homework
        .get("homework_name")
        .ok_or_else(|| ValidationError::MissingHomeworkName(homework.to_string()))?;
    let name = name
        .as_str()
        .map(str::to_owned)
        .unwrap_or_else(|| name.to_string());

    let raw_status = homework.get("status");
    let status = raw_status
        .and_then(Value::as_str)
        .and_then(HomeworkStatus::from_wire)
        .ok_or_else(|| {
            ValidationError::UnknownStatus(
                raw_status.map_or_else(|| "null".to_string(), Value::to_string),
            )
        })?;

    Ok(format!(
        "Changed review status of work \"{}\". {}",
        name,
        status.verdict()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_envelope() {
        let response = json!({"homeworks": [{"homework_name": "X"}], "current_date": 100});
        assert_eq!(check_response(&response), Ok(()));

        let empty = json!({"homeworks": [], "current_date": 0});
        assert_eq!(check_response(&empty), Ok(()));
    }

    #[test]
    fn rejects_non_object() {
        let err = check_response(&json!([1, 2])).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject);
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn rejects_missing_keys() {
        let err = check_response(&json!({"current_date": 100})).unwrap_err();
        assert_eq!(err, ValidationError::MissingKey("homeworks"));
        assert_eq!(err.kind(), ErrorKind::Key);

        let err = check_response(&json!({"homeworks": []})).unwrap_err();
        assert_eq!(err, ValidationError::MissingKey("current_date"));
        assert_eq!(err.kind(), ErrorKind::Key);
    }

    #[test]
    fn rejects_non_integer_current_date() {
        for current_date in [json!("100"), json!(1.5), json!(null)] {
            let response = json!({"homeworks": [], "current_date": current_date});
            let err = check_response(&response).unwrap_err();
            assert_eq!(err, ValidationError::CurrentDateNotInteger);
            assert_eq!(err.kind(), ErrorKind::Type);
        }
    }

    #[test]
    fn rejects_non_list_homeworks() {
        let response = json!({"homeworks": {"homework_name": "X"}, "current_date": 100});
        let err = check_response(&response).unwrap_err();
        assert_eq!(err, ValidationError::HomeworksNotList);
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn current_date_is_checked_before_homeworks() {
        let response = json!({"homeworks": "nope", "current_date": "nope"});
        assert_eq!(
            check_response(&response),
            Err(ValidationError::CurrentDateNotInteger)
        );
    }

    #[test]
    fn formats_approved_message() {
        let homework = json!({"homework_name": "Project1", "status": "approved"});
        assert_eq!(
            parse_status(&homework).unwrap(),
            "Changed review status of work \"Project1\". Review complete: the reviewer liked everything. Hooray!"
        );
    }

    #[test]
    fn formats_each_verdict() {
        let reviewing = json!({"homework_name": "hw", "status": "reviewing"});
        assert!(parse_status(&reviewing)
            .unwrap()
            .ends_with("The work has been taken for review by the reviewer."));

        let rejected = json!({"homework_name": "hw", "status": "rejected"});
        assert!(parse_status(&rejected)
            .unwrap()
            .ends_with("Review complete: the reviewer has comments."));
    }

    #[test]
    fn unknown_status_is_a_value_error() {
        let homework = json!({"homework_name": "hw", "status": "lost"});
        let err = parse_status(&homework).unwrap_err();
        assert_eq!(err, ValidationError::UnknownStatus("\"lost\"".to_string()));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn missing_status_is_a_value_error() {
        let homework = json!({"homework_name": "hw"});
        let err = parse_status(&homework).unwrap_err();
        assert_eq!(err, ValidationError::UnknownStatus("null".to_string()));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn missing_name_is_a_key_error() {
        let homework = json!({"status": "approved"});
        let err = parse_status(&homework).unwrap_err();
        assert!(matches!(err, ValidationError::MissingHomeworkName(_)));
        assert_eq!(err.kind(), ErrorKind::Key);
    }
}
