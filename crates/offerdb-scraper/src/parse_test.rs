use super::*;

// -----------------------------------------------------------------------
// successful payloads
// -----------------------------------------------------------------------

#[test]
fn parses_snake_case_offer() {
    let out = br#"{"provider":"X","discount":"10%","deep_link":"http://x"}"#;
    let offer = parse_scraper_output(out).expect("offer");
    assert_eq!(offer.provider, "X");
    assert_eq!(offer.discount, "10%");
    assert_eq!(offer.deep_link, "http://x");
    assert!(offer.external_id.is_none());
}

#[test]
fn parses_camel_case_deep_link() {
    let out = br#"{"provider":"X","discount":"10%","deepLink":"http://x"}"#;
    let offer = parse_scraper_output(out).expect("offer");
    assert_eq!(offer.deep_link, "http://x");
}

#[test]
fn tolerates_surrounding_whitespace() {
    let out = b"\n  {\"provider\":\"X\",\"discount\":\"BOGO\",\"deep_link\":\"http://x\"}\n\n";
    assert!(parse_scraper_output(out).is_ok());
}

#[test]
fn keeps_external_id() {
    let out = br#"{"provider":"Y","discount":"5%","deep_link":"http://y","external_id":"y-9"}"#;
    let offer = parse_scraper_output(out).expect("offer");
    assert_eq!(offer.external_id.as_deref(), Some("y-9"));
}

#[test]
fn ignores_unknown_fields() {
    let out = br#"{"provider":"X","discount":"10%","deep_link":"http://x","restaurant":"Pizza Co"}"#;
    assert!(parse_scraper_output(out).is_ok());
}

#[test]
fn null_error_field_is_not_an_error() {
    let out = br#"{"error":null,"provider":"X","discount":"10%","deep_link":"http://x"}"#;
    assert!(parse_scraper_output(out).is_ok());
}

#[test]
fn falsy_error_fields_are_not_errors() {
    for error in [r#""""#, "false", "0"] {
        let out = format!(
            r#"{{"error":{error},"provider":"X","discount":"10%","deep_link":"http://x"}}"#
        );
        let offer = parse_scraper_output(out.as_bytes())
            .unwrap_or_else(|e| panic!("error {error} should be ignored, got {e:?}"));
        assert_eq!(offer.provider, "X");
    }
}

#[test]
fn true_error_field_is_application_error() {
    let err = parse_scraper_output(br#"{"error":true}"#).unwrap_err();
    assert!(matches!(err, ScraperError::Application(ref m) if m == "true"));
}

// -----------------------------------------------------------------------
// application errors
// -----------------------------------------------------------------------

#[test]
fn error_field_is_application_error() {
    let out = br#"{"error":"Restaurant not found"}"#;
    let err = parse_scraper_output(out).unwrap_err();
    assert!(matches!(err, ScraperError::Application(ref m) if m == "Restaurant not found"));
}

#[test]
fn non_string_error_is_rendered_as_json() {
    let out = br#"{"error":{"code":404}}"#;
    let err = parse_scraper_output(out).unwrap_err();
    assert!(matches!(err, ScraperError::Application(ref m) if m == r#"{"code":404}"#));
}

// -----------------------------------------------------------------------
// unparseable output
// -----------------------------------------------------------------------

#[test]
fn non_json_is_parse_error_with_raw_output() {
    let err = parse_scraper_output(b"Traceback (most recent call last)").unwrap_err();
    assert!(
        matches!(err, ScraperError::Parse { ref raw, .. } if raw == "Traceback (most recent call last)")
    );
}

#[test]
fn empty_output_is_parse_error() {
    assert!(matches!(
        parse_scraper_output(b"").unwrap_err(),
        ScraperError::Parse { .. }
    ));
}

#[test]
fn missing_fields_is_parse_error() {
    let out = br#"{"provider":"X"}"#;
    assert!(matches!(
        parse_scraper_output(out).unwrap_err(),
        ScraperError::Parse { .. }
    ));
}

#[test]
fn array_output_is_parse_error() {
    let out = br#"[{"provider":"X","discount":"10%","deep_link":"http://x"}]"#;
    assert!(matches!(
        parse_scraper_output(out).unwrap_err(),
        ScraperError::Parse { .. }
    ));
}
