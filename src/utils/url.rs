//! Webhook URL validation

use reqwest::Url;

/// Parse a webhook endpoint, accepting only absolute `http`/`https` URLs.
///
/// # Examples
///
/// ```
/// use hookchat::utils::url::parse_webhook_url;
///
/// assert!(parse_webhook_url("https://hooks.example.com/webhook/abc").is_ok());
/// assert!(parse_webhook_url("  https://hooks.example.com/x  ").is_ok());
/// assert!(parse_webhook_url("ftp://hooks.example.com").is_err());
/// assert!(parse_webhook_url("not a url").is_err());
/// ```
pub fn parse_webhook_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| err.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}' (expected http or https)")),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(url)
}

/// Render a URL for display with any embedded credentials removed.
pub fn redact_url(url: &Url) -> String {
    let mut shown = url.clone();
    if !shown.username().is_empty() {
        let _ = shown.set_username("***");
    }
    if shown.password().is_some() {
        let _ = shown.set_password(Some("***"));
    }
    shown.to_string()
}
