use base64::Engine;

pub fn parse_data_uri(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(rest) = s.strip_prefix("data:") {
        // data:image/png;base64,....
        let (_, b64) = rest.split_once(',')?;
        return Some(b64.trim().to_string());
    }
    // assume plain base64
    Some(s.to_string())
}

pub fn b64_decode(input: &str) -> Option<Vec<u8>> {
    let b64 = parse_data_uri(input)?;
    let engine = base64::engine::general_purpose::STANDARD;
    engine.decode(b64.as_bytes()).ok()
}

pub fn truncate_with_ellipsis(mut s: String, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s;
    }
    if max_len <= 3 {
        return "...".to_string();
    }
    let keep = s
        .char_indices()
        .nth(max_len - 3)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s.truncate(keep);
    s.push_str("...");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_strips_prefix() {
        assert_eq!(parse_data_uri("data:image/png;base64,QUJD").as_deref(), Some("QUJD"));
        assert_eq!(b64_decode("data:image/png;base64,QUJD").as_deref(), Some(b"ABC".as_ref()));
    }

    #[test]
    fn bad_base64_is_none() {
        assert!(b64_decode("data:image/png;base64,@@@").is_none());
        assert!(b64_decode("").is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_with_ellipsis("short".into(), 10), "short");
        assert_eq!(truncate_with_ellipsis("abcdefghij".into(), 8), "abcde...");
        // multibyte input must not split a code point
        let t = truncate_with_ellipsis("মোহাম্মদ আব্দুল করিম".into(), 10);
        assert!(t.ends_with("..."));
    }
}
