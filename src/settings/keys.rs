//! Fixed settings keys understood by the update engine

// Proxy
pub const PROXY_SERVER: &str = "proxy.server";
pub const PROXY_PORT: &str = "proxy.port";
pub const PROXY_USERNAME: &str = "proxy.username";
pub const PROXY_PASSWORD: &str = "proxy.password";

/// Connection timeout in milliseconds for feed downloads
pub const CONNECTION_TIMEOUT: &str = "connection.timeout";

// Local vulnerability database
pub const DATA_DIRECTORY: &str = "data.directory";
pub const DB_FILE_NAME: &str = "data.file_name";
pub const DB_DRIVER_NAME: &str = "data.driver_name";
pub const DB_DRIVER_PATH: &str = "data.driver_path";
pub const DB_CONNECTION_STRING: &str = "data.connection_string";
pub const DB_USER: &str = "data.user";
pub const DB_PASSWORD: &str = "data.password";

// NVD feeds
pub const CVE_MODIFIED_12_URL: &str = "cve.url-1.2.modified";
pub const CVE_MODIFIED_20_URL: &str = "cve.url-2.0.modified";
pub const CVE_SCHEMA_1_2: &str = "cve.url-1.2.base";
pub const CVE_SCHEMA_2_0: &str = "cve.url-2.0.base";
pub const CVE_START_YEAR: &str = "cve.startyear";
pub const CVE_MODIFIED_VALID_FOR_DAYS: &str = "cve.url.modified.validfordays";

/// Parent directory for the per-run temporary directory
pub const TEMP_DIRECTORY: &str = "temp.directory";

/// Whether a key holds a credential that must never be logged
#[must_use]
pub fn is_sensitive(key: &str) -> bool {
    key.contains("password")
}
