use crate::api::HttpApi;
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Splits `raw` on `sep`, trimming every piece and dropping empty ones.
pub fn split_list(raw: &str, sep: char) -> Vec<String> {
    let mut items = Vec::new();
    for item in raw.split(sep) {
        let trimmed = item.trim();
        if !trimmed.is_empty() {
            items.push(trimmed.to_string());
        }
    }
    items
}

/// `+` followed by 8 to 15 digits, the first of which is not zero.
pub fn looks_like_e164(phone: &str) -> bool {
    let digits = match phone.strip_prefix('+') {
        Some(rest) => rest,
        None => return false,
    };
    (8..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

pub fn build_api(cfg: &ClientConfig) -> Result<HttpApi, ClientError> {
    cfg.validate()?;
    HttpApi::new(&cfg.backend_url, cfg.timeout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_and_drops_empty_segments() {
        assert_eq!(split_list("a, b ,c", ','), vec!["a", "b", "c"]);
        assert_eq!(split_list(" , ,x,, ", ','), vec!["x"]);
        assert!(split_list("", ';').is_empty());
    }

    #[test]
    fn split_on_semicolons_keeps_commas() {
        assert_eq!(
            split_list("hello, there; bye", ';'),
            vec!["hello, there", "bye"]
        );
    }

    #[test]
    fn e164_shape() {
        assert!(looks_like_e164("+11234567890"));
        assert!(looks_like_e164("+919876543210"));
        assert!(!looks_like_e164("11234567890"));
        assert!(!looks_like_e164("+1 123 456 7890"));
        assert!(!looks_like_e164("+0123456789"));
        assert!(!looks_like_e164("+1234"));
    }

    #[test]
    fn build_api_rejects_invalid_config() {
        let cfg = ClientConfig::default().with_backend("localhost:8000");
        assert!(build_api(&cfg).is_err());
    }
}
