//! Where the backend lives relative to the page.

/// Port the backend listens on (see `server.port` in the backend config)
pub const BACKEND_PORT: u16 = 3000;

fn base_for(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Backend origin on the page's host, e.g. "http://localhost:3000".
/// Empty when there is no window.
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    base_for(&protocol, &hostname)
}

/// `path` must start with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
