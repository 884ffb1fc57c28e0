use notihist::config::parse_formats;
use notihist::parsing::{decode_history, read_xml_document};
use notihist::Error;
use std::error::Error as _;

#[test]
fn test_error_display() {
    let err = Error::Config("test error".to_string());
    assert_eq!(format!("{}", err), "Configuration error: test error");
}

#[test]
fn test_module_errors_convert() {
    let decode: Error = decode_history(&[0xff; 11]).unwrap_err().into();
    assert!(decode.to_string().starts_with("Decode error: malformed history container"));
    assert!(decode.source().is_some());

    let xml: Error = read_xml_document(b"<a><b></a>").unwrap_err().into();
    assert!(xml.to_string().starts_with("XML error:"));

    let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert_eq!(io.to_string(), "IO error: gone");
}

#[test]
fn test_unknown_format_is_config_error() {
    let err = parse_formats("html,pdf").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("pdf"));
}
