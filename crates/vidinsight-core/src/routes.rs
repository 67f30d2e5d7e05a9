//! Route surface: `/` is the upload page, `/:id` the results for an uploaded video.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::keys::route_id_for_key;

static ROUTE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("route id pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Upload,
    Results(String),
}

impl Route {
    /// Results route for a freshly generated storage key.
    pub fn for_key(key: &str) -> Result<Self, CoreError> {
        Self::results(route_id_for_key(key))
    }

    pub fn results(id: &str) -> Result<Self, CoreError> {
        validate_route_id(id)?;
        Ok(Route::Results(id.to_string()))
    }

    /// Parse a path (`/`, `/<id>`) or a bare id.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let path = trimmed.trim_start_matches('/').trim_end_matches('/');
        if path.is_empty() {
            return Ok(Route::Upload);
        }
        Self::results(path)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Upload => "/".to_string(),
            Route::Results(id) => format!("/{}", id),
        }
    }

    pub fn result_id(&self) -> Option<&str> {
        match self {
            Route::Upload => None,
            Route::Results(id) => Some(id),
        }
    }
}

impl FromStr for Route {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.path())
    }
}

/// Ids are path segments on the gateway, so only `[A-Za-z0-9_-]` is allowed.
pub fn validate_route_id(id: &str) -> Result<(), CoreError> {
    if ROUTE_ID_PATTERN.is_match(id) {
        Ok(())
    } else {
        Err(CoreError::InvalidRoute(id.to_string()))
    }
}
