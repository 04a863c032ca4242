//! `details.json`: where a device keeps its own manuals.

use std::path::Path;

use serde::Deserialize;

use super::BuildError;

/// Device manifest. Only the firmware repository is read; other fields
/// belong to other tools.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Details {
    pub firmware_repository: String,
}

impl Details {
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self, BuildError> {
        let manifest_error = |source| BuildError::Manifest {
            path: path.to_path_buf(),
            source,
        };

        let details: Self = serde_json::from_slice(bytes).map_err(manifest_error)?;
        if details.firmware_repository.trim().is_empty() {
            return Err(manifest_error(serde::de::Error::custom(
                "`firmware_repository` is empty",
            )));
        }
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let details = Details::parse(
            Path::new("devices/SensorX/details.json"),
            br#"{"name": "SensorX", "firmware_repository": "https://github.com/org/sensor-x", "tags": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(details.firmware_repository, "https://github.com/org/sensor-x");
    }

    #[test]
    fn test_parse_errors() {
        for bad in [&b"{"[..], br#"{"name": "x"}"#, br#"{"firmware_repository": 3}"#, br#"{"firmware_repository": " "}"#] {
            assert!(matches!(
                Details::parse(Path::new("details.json"), bad),
                Err(BuildError::Manifest { .. })
            ));
        }
    }
}
