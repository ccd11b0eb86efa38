//! Constants and wire strings for the SJSON envelope

/// Envelope key holding the JSON-legal shadow of the value.
pub const ENVELOPE_JSON_KEY: &str = "json";
/// Envelope key holding transformation metadata.
pub const ENVELOPE_META_KEY: &str = "meta";
/// Key under `meta` holding the path-to-marker map.
pub const META_VALUES_KEY: &str = "values";

/// Prefix of opaque-class markers (`"class:" + name`).
pub const CLASS_MARKER_PREFIX: &str = "class:";

/// Wire tag for date/time values.
pub const TAG_DATE: &str = "Date";
/// Wire tag for arbitrary-precision integers.
pub const TAG_BIGINT: &str = "bigint";
/// Wire tag for deduplicated item lists.
pub const TAG_SET: &str = "set";
/// Wire tag for ordered key/value lists.
pub const TAG_MAP: &str = "map";
/// Wire tag for regular-expression patterns.
pub const TAG_REGEXP: &str = "regexp";
/// Wire tag for absolute URLs.
pub const TAG_URL: &str = "URL";
/// Wire tag for structured errors.
pub const TAG_ERROR: &str = "Error";

/// Byte ceiling for textual input (10 MiB).
pub const MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Maximum number of frames kept in a structured error trace.
pub const MAX_TRACE_FRAMES: usize = 10;

/// Digit count from which a plain string is treated as a big integer.
pub const BIGINT_HEURISTIC_MIN_DIGITS: usize = 16;
