//! GraphQL error body shape.
//!
//! NerdGraph reports query errors as `{"errors": [{"message": ...}]}`, usually
//! with HTTP status 200. [`GraphqlErrorResponse`] is installed as the error
//! value of every [`GraphqlClient`](super::GraphqlClient), so such responses
//! surface as [`HttpError::Embedded`](crate::clients::HttpError::Embedded)
//! carrying every message joined by `", "`.

use serde::Deserialize;

use crate::clients::ErrorValue;

/// One entry of a GraphQL `errors` array.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct GraphqlErrorDetail {
    /// The error message.
    #[serde(default)]
    pub message: String,
    /// The response path the error applies to, if reported.
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

/// The GraphQL error envelope.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct GraphqlErrorResponse {
    /// The reported errors; empty when the query succeeded.
    #[serde(default)]
    pub errors: Vec<GraphqlErrorDetail>,
}

impl ErrorValue for GraphqlErrorResponse {
    fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_joined() {
        let response: GraphqlErrorResponse = serde_json::from_str(
            r#"{"errors":[{"message":"first"},{"message":"second","path":["actor","entity"]}]}"#,
        )
        .unwrap();
        assert_eq!(response.message(), "first, second");
        assert_eq!(response.errors[1].path.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_data_only_body_has_no_message() {
        let response: GraphqlErrorResponse =
            serde_json::from_str(r#"{"data":{"actor":{"entity":null}}}"#).unwrap();
        assert!(response.errors.is_empty());
        assert_eq!(response.message(), "");
    }

    #[test]
    fn test_empty_errors_array_has_no_message() {
        let response: GraphqlErrorResponse = serde_json::from_str(r#"{"errors":[]}"#).unwrap();
        assert_eq!(response.message(), "");
    }
}
