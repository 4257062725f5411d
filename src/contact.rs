/// Inquiry form opened by every contact button.
pub const DEFAULT_CONTACT_FORM_URL: &str = "https://shokunin-san-com.studio.site/AI-form1";

/// Form URL with the launch query string appended verbatim (e.g. `?utm_source=demo`).
pub fn contact_url(base: &str, query: &str) -> String {
    format!("{}{}", base, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_query() {
        assert_eq!(
            contact_url(DEFAULT_CONTACT_FORM_URL, ""),
            "https://shokunin-san-com.studio.site/AI-form1"
        );
    }

    #[test]
    fn test_query_is_appended_verbatim() {
        assert_eq!(
            contact_url(DEFAULT_CONTACT_FORM_URL, "?utm_source=expo&ref=a%20b"),
            "https://shokunin-san-com.studio.site/AI-form1?utm_source=expo&ref=a%20b"
        );
    }
}
