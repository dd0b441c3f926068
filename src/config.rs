//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// The base URL of the Kando REST API (with no trailing slash).
/// Feel free to override it when initing this library, e.g. to point at a staging server.
pub static API_BASE_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(||
    Arc::new(Mutex::new("https://kando-backend-production.up.railway.app/api/v1".to_string())));

/// How long a single HTTP request may take before it is reported as a transport failure.
///
/// The upstream protocol does not mandate a timeout; 10 seconds is this crate's choice
/// (it matches what the reference web client used). A timed-out status update settles
/// like any other transport failure, i.e. the board rolls the optimistic move back.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
