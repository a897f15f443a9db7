use std::error::Error;

pub mod config;
pub mod db;
pub mod devotions;
pub mod error;
pub mod handler;
pub mod model;
pub mod routes;
pub mod seed;

pub fn unpack_error(err: &dyn Error) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().json().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_unpack_error_single() {
        let err = StoreError::NotYetSupported("searching devotions");
        assert_eq!(unpack_error(&err), "searching devotions is not supported yet");
    }
}
