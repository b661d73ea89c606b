//! CSV Data Loader Module
//! Reads the air-quality export into a Polars DataFrame with trimmed headers.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Cell values read as missing, regardless of column.
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file {0} was not found")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, reading every column as text.
    ///
    /// Type coercion is left to the cleaner so that one bad cell never
    /// changes how a whole column is read.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = Self::read_text_frame(path).map_err(|source| LoaderError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!(
            "Dataset loaded: {} records, columns {:?}",
            df.height(),
            Self::get_columns(&df)
        );
        Ok(df)
    }

    fn read_text_frame(path: &Path) -> PolarsResult<DataFrame> {
        let null_values = NullValues::AllColumns(
            MISSING_TOKENS.iter().map(|token| (*token).into()).collect(),
        );

        let mut df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_null_values(Some(null_values))
            .finish()?
            .collect()?;

        let trimmed = Self::trimmed_names(df.get_column_names().iter().map(|n| n.as_str()));
        df.set_column_names(trimmed)?;

        Ok(df)
    }

    /// Trim header names. A name that collides with an earlier one after
    /// trimming gets the first free `.N` suffix (`pm25`, `pm25.1`, ...).
    fn trimmed_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let base = name.trim();
            let mut candidate = base.to_string();
            let mut suffix = 1;
            while out.contains(&candidate) {
                candidate = format!("{base}.{suffix}");
                suffix += 1;
            }
            out.push(candidate);
        }
        out
    }

    /// Get list of column names.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("air.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(p) if p == path));
    }

    #[test]
    fn trims_header_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date, pm25, pm10 ,o3\n2023/1/5, 30, 12, 4\n");

        let df = DataLoader::load_csv(&path).unwrap();
        assert_eq!(DataLoader::get_columns(&df), vec!["date", "pm25", "pm10", "o3"]);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn headers_colliding_after_trim_get_suffixes() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date,pm25, pm25,pm25 \n2023-01-05,30,31,32\n");

        let df = DataLoader::load_csv(&path).unwrap();
        assert_eq!(
            DataLoader::get_columns(&df),
            vec!["date", "pm25", "pm25.1", "pm25.2"]
        );
        assert_eq!(df.column("pm25").unwrap().str().unwrap().get(0), Some("30"));
        assert_eq!(df.column("pm25.1").unwrap().str().unwrap().get(0), Some("31"));
    }

    #[test]
    fn trimmed_names_keep_distinct_headers() {
        let names = DataLoader::trimmed_names(["a", " b ", "a.1", " a"].into_iter());
        assert_eq!(names, vec!["a", "b", "a.1", "a.2"]);
    }

    #[test]
    fn reads_every_column_as_text() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date,pm25\n2023-01-05,30\n2023-01-06,abc\n");

        let df = DataLoader::load_csv(&path).unwrap();
        let pm25 = df.column("pm25").unwrap();
        assert_eq!(pm25.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = pm25.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("30"), Some("abc")]);
    }

    #[test]
    fn missing_tokens_become_null() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date,pm25,pm10\n2023-01-05,N/A,\n2023-01-06,NaN,7\n");

        let df = DataLoader::load_csv(&path).unwrap();
        assert_eq!(df.column("pm25").unwrap().null_count(), 2);
        assert_eq!(df.column("pm10").unwrap().null_count(), 1);
    }

    #[test]
    fn empty_file_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "");

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::ReadFailure { .. }));
    }
}
