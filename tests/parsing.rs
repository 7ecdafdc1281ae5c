use bytesize::ByteSize;
use jsonx::{parse_str, Parser, ParserErrorDetails, ScannerMode, Value};
use std::time::Instant;

/// Build a reasonably large synthetic document exercising every value type
fn synthetic_document(records: usize) -> String {
    let mut buffer = String::from("[\n");
    for i in 0..records {
        if i > 0 {
            buffer.push_str(",\n");
        }
        buffer.push_str(&format!(
            r#"{{"id": {}, "name": "record-{}", "ratio": {}.5, "offset": -{}, "flag": {}, "payload": =Zm9vYmFyYmF6{}=, "children": [1, 2, 3], "note": null}}"#,
            i,
            i,
            i,
            i,
            i % 2 == 0,
            "Cg"
        ));
    }
    buffer.push_str("\n]");
    buffer
}

#[test]
fn should_parse_a_synthetic_document() {
    let input = synthetic_document(500);
    let start = Instant::now();
    let doc = parse_str(&input).unwrap();
    println!(
        "parsed {} in {:?}",
        ByteSize(input.len() as u64),
        start.elapsed()
    );
    assert_eq!(doc.size(), 500);
    let first = doc.get_index(0).unwrap();
    assert_eq!(first.get("id"), Some(&Value::UnsignedInt(0)));
    assert_eq!(first.get("ratio"), Some(&Value::Double(0.5)));
    assert!(first.get("payload").unwrap().is_blob());
}

#[test]
fn should_parse_a_commented_configuration_document() {
    let input = r#"
        # service configuration
        {
            "listen": "0.0.0.0:8080",   # bind address
            "workers": 4,
            "timeout": 2.5,
            # feature toggles
            "features": ["blobs", "comments"],
            "secret": =c2VjcmV0=
        }
    "#;
    let parser = Parser::default().with_mode(ScannerMode::HashComments);
    let doc = parser.parse_str(input).unwrap();
    assert_eq!(doc.get("workers"), Some(&Value::UnsignedInt(4)));
    assert_eq!(
        doc.get("secret").unwrap().as_blob().unwrap(),
        b"secret"
    );
}

#[test]
fn should_reject_comments_by_default() {
    let result = parse_str("# comment\n{}");
    assert!(result.is_err());
}

#[test]
fn should_surface_error_coordinates() {
    let result = parse_str("{\n  \"a\": 1,\n  \"b\": bogus\n}");
    let err = result.unwrap_err();
    assert_eq!(
        err.details,
        ParserErrorDetails::InvalidToken("bogus".to_string())
    );
    let coords = err.coords.unwrap();
    assert_eq!(coords.line, 3);
}

#[test]
fn should_reject_trailing_commas() {
    for input in ["[1, 2,]", r#"{"a": 1,}"#] {
        let err = parse_str(input).unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::TrailingComma);
    }
}

#[test]
fn should_reject_structural_errors() {
    assert!(parse_str("[1, 2").is_err());
    assert!(parse_str(r#"{"a" 1}"#).is_err());
    assert!(parse_str(r#"{"a": }"#).is_err());
    assert!(parse_str("\"open").is_err());
    assert!(parse_str("=Zm9v").is_err());
    assert!(parse_str("=Zm!v=").is_err());
    assert!(parse_str("01").is_err());
}

#[test]
fn should_treat_empty_input_as_undefined() {
    assert_eq!(parse_str("").unwrap(), Value::Undefined);
    assert_eq!(parse_str("   \n\t  ").unwrap(), Value::Undefined);
}

#[test]
fn should_parse_deeply_nested_arrays() {
    let depth = 128;
    let mut input = String::new();
    for _ in 0..depth {
        input.push('[');
    }
    input.push('1');
    for _ in 0..depth {
        input.push(']');
    }
    let doc = parse_str(&input).unwrap();
    let mut current = &doc;
    for _ in 0..depth {
        current = current.get_index(0).unwrap();
    }
    assert_eq!(current, &Value::UnsignedInt(1));
}

#[test]
fn should_parse_from_bytes() {
    let doc = Parser::default().parse_bytes(br#"{"k": true}"#).unwrap();
    assert_eq!(doc.get("k"), Some(&Value::Bool(true)));
}
