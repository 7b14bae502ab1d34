//! JSON case files: the same `{ "case": ..., "today"?: ... }` shape the HTTP
//! compute endpoint accepts. Profile files hold a [`ProfilePrefill`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::prefill::ProfilePrefill;
use super::router::ComputeRequest;

#[derive(Debug, thiserror::Error)]
pub enum CaseFileError {
    #[error("unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} could not be parsed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn parse_case(json: &str) -> Result<ComputeRequest, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn read_case_file(path: &Path) -> Result<ComputeRequest, CaseFileError> {
    read_json(path)
}

pub fn read_profile_file(path: &Path) -> Result<ProfilePrefill, CaseFileError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CaseFileError> {
    let raw = fs::read_to_string(path).map_err(|source| CaseFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CaseFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
