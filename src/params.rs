//!
//! GhmmParams, the tunable bounds of the GHMM dynamic programs
//!
use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

///
/// Parameters of GHMM inference
///
/// Both bounds silently truncate: a segment longer than `max_backtracking`
/// or an explicit duration longer than `max_explicit_duration` is never
/// considered by the dynamic programs.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhmmParams {
    ///
    /// how far back (in positions) a segment may start from its end
    pub max_backtracking: usize,
    ///
    /// upper bound of the admissible lengths of explicit durations
    pub max_explicit_duration: usize,
    ///
    /// use prefix-sum cached evaluators for observation models
    pub cached_emissions: bool,
}

impl GhmmParams {
    pub fn new(max_backtracking: usize, max_explicit_duration: usize) -> Result<GhmmParams> {
        GhmmParams {
            max_backtracking,
            max_explicit_duration,
            cached_emissions: true,
        }
        .validated()
    }
    /// Both bounds must be positive.
    fn validated(self) -> Result<GhmmParams> {
        if self.max_backtracking == 0 {
            return Err(ModelError::InvalidParams(
                "max_backtracking must be positive".to_string(),
            ));
        }
        if self.max_explicit_duration == 0 {
            return Err(ModelError::InvalidParams(
                "max_explicit_duration must be positive".to_string(),
            ));
        }
        Ok(self)
    }
    /// Same bounds, evaluating observation models without the prefix cache.
    pub fn uncached(self) -> GhmmParams {
        GhmmParams {
            cached_emissions: false,
            ..self
        }
    }
    ///
    /// Parse from json like `{"max_backtracking": 500}`.
    /// Missing fields take the default value.
    ///
    pub fn from_json_str(json: &str) -> Result<GhmmParams> {
        let params: GhmmParams = serde_json::from_str(json)?;
        params.validated()
    }
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<GhmmParams> {
        let json = std::fs::read_to_string(path)?;
        GhmmParams::from_json_str(&json)
    }
}

impl Default for GhmmParams {
    fn default() -> Self {
        GhmmParams {
            max_backtracking: 15000,
            max_explicit_duration: 100,
            cached_emissions: true,
        }
    }
}

impl std::fmt::Display for GhmmParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "max_backtracking: {}", self.max_backtracking)?;
        writeln!(f, "max_explicit_duration: {}", self.max_explicit_duration)?;
        writeln!(f, "cached_emissions: {}", self.cached_emissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use std::io::Write;

    #[test]
    fn params_default() {
        let param = GhmmParams::default();
        assert_eq!(param.max_backtracking, 15000);
        assert_eq!(param.max_explicit_duration, 100);
        assert!(param.cached_emissions);
        assert!(!param.uncached().cached_emissions);
    }
    #[test]
    fn params_from_json() {
        let param = GhmmParams::from_json_str(r#"{"max_backtracking": 50}"#).unwrap();
        assert_eq!(param.max_backtracking, 50);
        assert_eq!(param.max_explicit_duration, 100);

        let json = serde_json::to_string(&param).unwrap();
        assert_eq!(GhmmParams::from_json_str(&json).unwrap(), param);

        assert!(matches!(
            GhmmParams::from_json_str("{max_backtracking"),
            Err(ModelError::Json(_))
        ));
    }
    #[test]
    fn params_must_be_positive() {
        assert!(GhmmParams::new(10, 3).is_ok());
        assert!(matches!(
            GhmmParams::new(0, 100),
            Err(ModelError::InvalidParams(_))
        ));
        assert!(matches!(
            GhmmParams::new(100, 0),
            Err(ModelError::InvalidParams(_))
        ));
        assert!(matches!(
            GhmmParams::from_json_str(r#"{"max_backtracking": 0}"#),
            Err(ModelError::InvalidParams(_))
        ));
        assert!(matches!(
            GhmmParams::from_json_str(r#"{"max_explicit_duration": 0}"#),
            Err(ModelError::InvalidParams(_))
        ));
    }
    #[test]
    fn params_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"max_explicit_duration": 12, "cached_emissions": false}}"#
        )
        .unwrap();
        let param = GhmmParams::from_json_file(file.path()).unwrap();
        assert_eq!(param.max_explicit_duration, 12);
        assert!(!param.cached_emissions);

        assert!(matches!(
            GhmmParams::from_json_file("/nonexistent/params.json"),
            Err(ModelError::Io(_))
        ));
    }
}
