/// Current UTC time as an RFC 3339 timestamp, the format review dates
/// are stored in.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Sanitize a file name for use in a storage object path: whitespace
/// runs become single dashes.
pub fn sanitize_object_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_dash = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !last_was_dash {
                out.push('-');
                last_was_dash = true;
            }
        } else {
            out.push(ch);
            last_was_dash = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_object_name() {
        assert_eq!(sanitize_object_name("my photo.jpg"), "my-photo.jpg");
        assert_eq!(sanitize_object_name("a  b\tc.png"), "a-b-c.png");
        assert_eq!(sanitize_object_name("clean.webp"), "clean.webp");
    }

    #[test]
    fn test_now_rfc3339_parses_back() {
        let ts = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
