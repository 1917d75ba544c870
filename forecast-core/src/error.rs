use thiserror::Error;

/// Errors that abort a single collection cycle.
///
/// Both kinds are recoverable: the collector logs them and waits for the
/// next trigger. Transport failures and provider error payloads are folded
/// into [`CollectorError::Fetch`].
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Error while requesting Dark Sky forecast: {0}")]
    Fetch(String),

    #[error("Error writing to InfluxDB: {0}")]
    Write(String),
}

impl CollectorError {
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        CollectorError::Fetch(err.to_string())
    }

    pub fn write(err: impl std::fmt::Display) -> Self {
        CollectorError::Write(err.to_string())
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, CollectorError::Fetch(_))
    }

    pub fn is_write(&self) -> bool {
        matches!(self, CollectorError::Write(_))
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("nope"), "nope");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }

    #[test]
    fn error_kinds() {
        assert!(CollectorError::fetch("boom").is_fetch());
        assert!(CollectorError::write("boom").is_write());
        assert!(CollectorError::write("boom").to_string().contains("InfluxDB"));
    }
}
