use railmap_api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("config could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A recoverable failure shown to the user. Carrying one never implies any
/// change to the camera or the current route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserNotice {
    pub title: String,
    pub message: String,
}

impl UserNotice {
    pub fn lookup_failed(code: &str, error: &ApiError) -> Self {
        let title = match error {
            ApiError::NotFound(_) => "Station not found",
            ApiError::MissingApiKey => "Live data unavailable",
            _ => "Lookup failed",
        };
        Self {
            title: title.to_owned(),
            message: format!("{code}: {error}"),
        }
    }

    /// The lookup succeeded but returned coordinates that cannot be shown
    pub fn unmappable(code: &str) -> Self {
        Self {
            title: "Station not found".to_owned(),
            message: format!("{code}: no usable coordinates"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_titles() {
        let notice = UserNotice::lookup_failed("ZZZZZZ", &ApiError::NotFound("ZZZZZZ".into()));
        assert_eq!(notice.title, "Station not found");
        assert_eq!(notice.message, "ZZZZZZ: Location not found for TIPLOC: ZZZZZZ");

        let notice = UserNotice::lookup_failed(
            "EUSTON",
            &ApiError::Status {
                context: "Schedule fetch failed",
                status: 503,
            },
        );
        assert_eq!(notice.title, "Lookup failed");
        assert!(notice.message.contains("Status: 503"));
    }
}
