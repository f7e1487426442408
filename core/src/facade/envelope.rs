use serde::{Deserialize, Serialize};

/// Uniform result of every facade operation.
///
/// Serializes as `{"data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope<T> {
    Data(T),
    Error(String),
}

impl<T> Envelope<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Data(data) => Some(data),
            Envelope::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Envelope::Data(_) => None,
            Envelope::Error(message) => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let data: Envelope<String> = Envelope::Data("Build boldly".to_string());
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({ "data": "Build boldly" }));

        let error: Envelope<String> = Envelope::error("Invalid input format.");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "error": "Invalid input format." })
        );
    }

    #[test]
    fn test_accessors() {
        let error: Envelope<u32> = Envelope::error("nope");
        assert!(error.is_error());
        assert_eq!(error.error_message(), Some("nope"));
        assert_eq!(error.data(), None);

        let data: Envelope<u32> = Envelope::Data(3);
        assert!(!data.is_error());
        assert_eq!(data.data(), Some(&3));
        assert_eq!(data.error_message(), None);
    }
}
