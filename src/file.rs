//! File utilities.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::from_reader;

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, io::Error> {
    let file = File::open(path)?;
    Ok(from_reader(BufReader::new(file))?)
}

pub trait FromJsonFile<D> {
    fn from_json_file(path: impl AsRef<Path>) -> Result<D, io::Error>;
}

impl<D: DeserializeOwned> FromJsonFile<D> for D {
    fn from_json_file(path: impl AsRef<Path>) -> Result<D, io::Error> {
        read_json(path)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use super::*;
    use crate::glm::FitOptions;

    #[test]
    fn fit_options_from_json_file() {
        let path = env::temp_dir().join(format!("goalcast-fit-options-{}.json", std::process::id()));
        fs::write(&path, r#"{"tolerance": 1e-6}"#).unwrap();
        let options = FitOptions::from_json_file(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(
            FitOptions {
                tolerance: 1e-6,
                ..FitOptions::default()
            },
            options.unwrap()
        );
    }

    #[test]
    fn missing_file() {
        let err = FitOptions::from_json_file("/nonexistent/fit.json").unwrap_err();
        assert_eq!(io::ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn malformed_json() {
        let path = env::temp_dir().join(format!("goalcast-malformed-{}.json", std::process::id()));
        fs::write(&path, "{max_iterations").unwrap();
        let result = FitOptions::from_json_file(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
