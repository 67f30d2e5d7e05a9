//! Application-wide constants.

use std::time::Duration;

/// The only content type the upload page accepts, and the one sent with the storage PUT.
pub const ACCEPTED_CONTENT_TYPE: &str = "video/mp4";

/// Extension used for generated keys when the original name has none.
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// Length of the random base-36 suffix in generated keys.
pub const KEY_SUFFIX_LEN: usize = 6;

/// How often the result page re-fetches while auto-refresh is on.
pub const RESULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Deadline for a whole gateway call (`/url`, `/results/{id}`).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Connect deadline for every request. The storage PUT has no overall deadline.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the gateway base URL.
pub const GATEWAY_URL_ENV: &str = "VIDINSIGHT_API_GATEWAY_URL";

/// Fallback environment variable for the gateway base URL.
pub const GATEWAY_URL_ENV_FALLBACK: &str = "API_GATEWAY_URL";
