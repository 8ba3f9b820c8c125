use std::path::{Path, PathBuf};

use tracing::debug;

use crate::filters::City;

/// Environment variable naming the directory that holds the city CSV files.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// Where the city datasets live on disk.
#[derive(Debug, Clone)]
pub struct DataConfig {
    data_dir: PathBuf,
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Reads `BIKESHARE_DATA_DIR`, defaulting to the working directory.
    pub fn from_env() -> Self {
        let dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| ".".to_string());
        Self::new(dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the city's source file. A plain `.csv` wins over a gzipped
    /// `.csv.gz`; when neither exists the plain path is returned so the
    /// loader reports it as unavailable.
    pub fn source_path(&self, city: City) -> PathBuf {
        let plain = self.data_dir.join(city.file_name());
        if plain.exists() {
            return plain;
        }
        let gz = self.data_dir.join(format!("{}.gz", city.file_name()));
        if gz.exists() {
            debug!(path = %gz.display(), "Using gzipped source");
            return gz;
        }
        plain
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_source_path_defaults_to_plain_csv() {
        let dir = temp_dir("bikeshare_stats_config_missing");
        let config = DataConfig::new(&dir);
        assert_eq!(config.source_path(City::Chicago), dir.join("chicago.csv"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_source_path_falls_back_to_gz() {
        let dir = temp_dir("bikeshare_stats_config_gz");
        fs::write(dir.join("washington.csv.gz"), b"").unwrap();
        let config = DataConfig::new(&dir);
        assert_eq!(
            config.source_path(City::Washington),
            dir.join("washington.csv.gz")
        );

        fs::write(dir.join("washington.csv"), b"").unwrap();
        assert_eq!(
            config.source_path(City::Washington),
            dir.join("washington.csv")
        );
        fs::remove_dir_all(&dir).unwrap();
    }
}
