use serde::de::DeserializeOwned;
use thiserror::Error;

/// Deserialization failure with the JSON path where it happened.
#[derive(Debug, Error)]
#[error("at JSON path {path} → {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

/// Deserialize JSON text with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_path_error)
}

/// Same, for an already-parsed document.
pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, PathError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(into_path_error)
}

fn into_path_error(err: serde_path_to_error::Error<serde_json::Error>) -> PathError {
    PathError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer { inner: Inner }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Inner { limit: usize }

    #[test]
    fn errors_carry_the_failing_path() {
        let err = from_str_with_path::<Outer>(r#"{"inner": {"limit": "ten"}}"#).unwrap_err();
        assert_eq!(err.path, "inner.limit");

        let err = from_value_with_path::<Outer>(serde_json::json!({"inner": {}})).unwrap_err();
        assert!(err.message.contains("limit"), "{err}");
    }
}
