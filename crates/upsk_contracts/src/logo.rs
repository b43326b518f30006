#![forbid(unsafe_code)]

use crate::ContractViolation;

/// Application logo stored as a self-describing data URI.
///
/// The image bytes are never inspected. Only the `data:` header is parsed,
/// and only for display and logging purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAsset(String);

impl LogoAsset {
    pub fn from_data_uri(uri: impl Into<String>) -> Result<Self, ContractViolation> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "logo.data_uri",
                reason: "must not be empty",
            });
        }
        Ok(Self(uri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    fn header(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        rest.split_once(',').map(|(header, _)| header)
    }

    pub fn is_data_uri(&self) -> bool {
        self.header().is_some()
    }

    /// Declared media type, e.g. `image/png`. `None` when the value carries no
    /// data-URI header or declares no type.
    pub fn media_type(&self) -> Option<&str> {
        let header = self.header()?;
        let media = header.split(';').next().unwrap_or_default().trim();
        if media.is_empty() {
            None
        } else {
            Some(media)
        }
    }

    pub fn is_base64(&self) -> bool {
        self.header()
            .map(|header| header.split(';').any(|param| param.trim() == "base64"))
            .unwrap_or(false)
    }

    pub fn payload(&self) -> &str {
        self.0
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::LogoAsset;

    #[test]
    fn at_logo_01_header_is_parsed_without_touching_payload() {
        let logo = LogoAsset::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert!(logo.is_data_uri());
        assert_eq!(logo.media_type(), Some("image/png"));
        assert!(logo.is_base64());
        assert_eq!(logo.payload(), "iVBORw0KGgo=");
    }

    #[test]
    fn at_logo_02_non_data_uri_is_kept_verbatim() {
        let logo = LogoAsset::from_data_uri("https://example.com/logo.png").unwrap();
        assert!(!logo.is_data_uri());
        assert_eq!(logo.media_type(), None);
        assert_eq!(logo.as_str(), "https://example.com/logo.png");
    }

    #[test]
    fn at_logo_03_empty_value_is_rejected() {
        assert!(LogoAsset::from_data_uri("").is_err());
    }
}
