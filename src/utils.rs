use std::{
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use chrono::NaiveDateTime;

/// Formats accepted for ISO-8601 local date-times, seconds and fraction optional
const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Checks if something already listens on `address`
///
/// # Arguments
/// * `address` host and port, e.g. `localhost:5900`
pub fn is_server_running(address: &str) -> Result<bool, std::io::Error> {
    let timeout = Duration::from_millis(250);

    for addr in address.to_socket_addrs()? {
        if TcpStream::connect_timeout(&addr, timeout).is_ok() {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Parses an ISO-8601 local date-time such as `2024-05-01T10:00:00`
pub fn parse_local_datetime(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let [with_seconds, without_seconds] = LOCAL_DATETIME_FORMATS;

    NaiveDateTime::parse_from_str(value, with_seconds)
        .or_else(|_| NaiveDateTime::parse_from_str(value, without_seconds))
}

/// Url of an api resource on `host`
pub fn api_url(host: &str, resource: &str) -> String {
    format!("http://{}/api/{}", host.trim_end_matches('/'), resource)
}
