use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use web_sys::FormData;

use super::form::{SubmitError, Submission};

pub const FALLBACK_REJECTION: &str = "Unable to send message.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("unreadable relay reply: {0}")]
    MalformedReply(String),
}

/// Status line and raw body of a completed relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub ok: bool,
    pub status: u16,
    pub body: String,
}

/// Error body of a rejected submission. Only `message` is read, and it may
/// hold any JSON value.
#[derive(Debug, Default, Deserialize)]
struct Rejection {
    #[serde(default)]
    message: Value,
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a reply value the way the browser stringifies it for display.
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => format!("{f}"),
            _ => n.to_string(),
        },
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_null() { String::new() } else { display_text(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Text shown after `Error: ` for a rejected submission.
pub fn rejection_text(reply: &Value) -> String {
    let rejection: Rejection = match reply {
        Value::Object(_) => serde_json::from_value(reply.clone()).unwrap_or_default(),
        _ => Rejection::default(),
    };
    if is_truthy(&rejection.message) {
        display_text(&rejection.message)
    } else {
        FALLBACK_REJECTION.to_string()
    }
}

/// Maps a completed response onto the submit outcome. The body must be JSON
/// whatever the status; anything else is treated like a dropped connection.
/// Accepted submissions never look inside the body.
pub fn interpret(response: &RelayResponse) -> Result<(), SubmitError> {
    let reply: Value = serde_json::from_str(&response.body)
        .map_err(|err| RelayError::MalformedReply(err.to_string()))?;
    if response.ok {
        return Ok(());
    }
    if reply.is_null() {
        let detail = format!("empty rejection from {}", response.status);
        return Err(RelayError::MalformedReply(detail).into());
    }
    Err(SubmitError::Rejected(rejection_text(&reply)))
}

#[allow(async_fn_in_trait)]
pub trait FormRelay {
    async fn post(&self, submission: &Submission) -> Result<RelayResponse, RelayError>;
}

/// Posts submissions as multipart form data to a Web3Forms-style endpoint.
pub struct Web3FormsRelay {
    url: String,
}

impl Web3FormsRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn form_data(submission: &Submission) -> Result<FormData, RelayError> {
        let data = FormData::new().map_err(|err| RelayError::Network(format!("{err:?}")))?;
        for (name, value) in submission.entries() {
            data.append_with_str(name, value)
                .map_err(|err| RelayError::Network(format!("{err:?}")))?;
        }
        Ok(data)
    }
}

impl FormRelay for Web3FormsRelay {
    async fn post(&self, submission: &Submission) -> Result<RelayResponse, RelayError> {
        let body = Self::form_data(submission)?;
        let response = Request::post(&self.url)
            .body(body)
            .send()
            .await
            .map_err(|err| RelayError::Network(err.to_string()))?;

        let ok = response.ok();
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RelayError::MalformedReply(err.to_string()))?;
        log::debug!("relay answered {status}");
        Ok(RelayResponse { ok, status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(ok: bool, status: u16, body: &str) -> RelayResponse {
        RelayResponse { ok, status, body: body.to_string() }
    }

    #[test]
    fn ok_with_empty_object_is_success() {
        assert_eq!(interpret(&response(true, 200, "{}")), Ok(()));
    }

    #[test]
    fn rejection_carries_server_message() {
        let err = interpret(&response(false, 400, r#"{"message":"Invalid key"}"#)).unwrap_err();
        assert_eq!(err.to_string(), "Error: Invalid key");
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let err = interpret(&response(false, 500, r#"{"message":""}"#)).unwrap_err();
        assert_eq!(err.to_string(), "Error: Unable to send message.");
        let err = interpret(&response(false, 500, "{}")).unwrap_err();
        assert_eq!(err, SubmitError::Rejected(FALLBACK_REJECTION.to_string()));
    }

    #[test]
    fn accepted_submission_ignores_reply_shape() {
        for body in [r#"{"success":"true"}"#, "null", "[]", "42", r#""sent""#, r#"{"success":false}"#] {
            assert_eq!(interpret(&response(true, 200, body)), Ok(()), "{body}");
        }
    }

    #[test]
    fn rejected_null_reply_is_a_transport_failure() {
        let err = interpret(&response(false, 400, "null")).unwrap_err();
        assert!(matches!(err, SubmitError::Transport(RelayError::MalformedReply(_))));
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
    }

    #[test]
    fn rejected_non_object_reply_uses_fallback() {
        for body in ["[]", "42", r#""nope""#, "true"] {
            let err = interpret(&response(false, 422, body)).unwrap_err();
            assert_eq!(err, SubmitError::Rejected(FALLBACK_REJECTION.to_string()), "{body}");
        }
    }

    #[test]
    fn rejection_message_follows_browser_truthiness() {
        let cases = [
            (r#"{"message":null}"#, "Error: Unable to send message."),
            (r#"{"message":false}"#, "Error: Unable to send message."),
            (r#"{"message":0}"#, "Error: Unable to send message."),
            (r#"{"message":""}"#, "Error: Unable to send message."),
            (r#"{"message":[]}"#, "Error: "),
            (r#"{"message":["a",null,2]}"#, "Error: a,,2"),
            (r#"{"message":{}}"#, "Error: [object Object]"),
            (r#"{"message":429}"#, "Error: 429"),
            (r#"{"message":1.5}"#, "Error: 1.5"),
            (r#"{"message":true}"#, "Error: true"),
        ];
        for (body, expected) in cases {
            let err = interpret(&response(false, 400, body)).unwrap_err();
            assert_eq!(err.to_string(), expected, "{body}");
        }
    }

    #[test]
    fn non_json_body_is_a_transport_failure() {
        let err = interpret(&response(true, 200, "<html>bad gateway</html>")).unwrap_err();
        assert!(matches!(err, SubmitError::Transport(RelayError::MalformedReply(_))));
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
    }
}
