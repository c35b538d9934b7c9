use super::*;

#[test]
fn widget_request_with_defaults() {
    let req = RenderRequest::from_slice(br#"{"widget": {"type": "timeseries"}}"#, MAX_PAYLOAD_BYTES)
        .unwrap();
    assert!(matches!(req.payload, RequestPayload::Widget(_)));
    assert_eq!((req.width, req.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    assert_eq!(req.theme, None);
}

#[test]
fn option_request_is_accepted() {
    let req = RenderRequest::from_slice(
        br#"{"option": {"series": []}, "theme": "dark", "width": 800}"#,
        MAX_PAYLOAD_BYTES,
    )
    .unwrap();
    assert!(matches!(req.payload, RequestPayload::Options(_)));
    assert_eq!(req.width, 800);
    assert_eq!(req.height, DEFAULT_HEIGHT);
    assert_eq!(req.theme.as_deref(), Some("dark"));
}

#[test]
fn option_object_is_kept_verbatim() {
    let req = RenderRequest::from_slice(
        br#"{"option": {"grid": {"left": "3%"}, "xAxis": [{"type": "time"}], "series": [{"type": "scatter"}]}}"#,
        MAX_PAYLOAD_BYTES,
    )
    .unwrap();
    let RequestPayload::Options(option) = req.payload else {
        panic!("expected an option payload");
    };
    assert_eq!(option["grid"]["left"], "3%");
    assert_eq!(option["xAxis"][0]["type"], "time");
    assert_eq!(option["series"][0]["type"], "scatter");
}

#[test]
fn non_object_option_is_invalid_input() {
    let bodies: [&[u8]; 2] = [br#"{"option": [1, 2]}"#, br#"{"option": "chart"}"#];
    for body in bodies {
        let err = RenderRequest::from_slice(body, MAX_PAYLOAD_BYTES).unwrap_err();
        assert!(matches!(err, PlotshotError::InvalidInput(_)), "{err}");
    }
}

#[test]
fn widget_wins_over_option() {
    let req = RenderRequest::from_slice(br#"{"widget": {}, "option": {}}"#, MAX_PAYLOAD_BYTES)
        .unwrap();
    assert!(matches!(req.payload, RequestPayload::Widget(_)));
}

#[test]
fn dimensions_are_clamped() {
    let req = RenderRequest::from_slice(
        br#"{"widget": {}, "width": 5000, "height": 10}"#,
        MAX_PAYLOAD_BYTES,
    )
    .unwrap();
    assert_eq!((req.width, req.height), (MAX_DIMENSION, MIN_DIMENSION));

    assert_eq!(clamp_dimension(Some(-40.0), 600), MIN_DIMENSION);
    assert_eq!(clamp_dimension(Some(640.6), 600), 641);
    assert_eq!(clamp_dimension(None, 400), 400);

    let req = RenderRequest::for_widget(Widget::default()).with_size(1, 99_999);
    assert_eq!((req.width, req.height), (MIN_DIMENSION, MAX_DIMENSION));
}

#[test]
fn oversized_body_is_rejected_before_parsing() {
    // Not valid JSON either; the size check must come first.
    let body = vec![b'x'; 64];
    let err = RenderRequest::from_slice(&body, 32).unwrap_err();
    assert!(matches!(
        err,
        PlotshotError::PayloadTooLarge { size: 64, limit: 32 }
    ));
}

#[test]
fn body_at_the_limit_is_parsed() {
    let body = br#"{"widget":{}}"#;
    assert!(RenderRequest::from_slice(body, body.len()).is_ok());
}

#[test]
fn missing_payload_or_bad_json_is_invalid_input() {
    let bodies: [&[u8]; 3] = [br#"{"width": 300}"#, b"{not json", b"[]"];
    for body in bodies {
        let err = RenderRequest::from_slice(body, MAX_PAYLOAD_BYTES).unwrap_err();
        assert!(matches!(err, PlotshotError::InvalidInput(_)), "{err}");
        assert!(err.is_client_error());
    }
}

#[test]
fn blank_theme_is_ignored() {
    let req = RenderRequest::from_slice(br#"{"widget": {}, "theme": "  "}"#, MAX_PAYLOAD_BYTES)
        .unwrap();
    assert_eq!(req.theme, None);
}

#[test]
fn option_builder_uses_defaults() {
    let req = RenderRequest::for_options(serde_json::json!({ "series": [] })).with_theme("dark");
    assert!(matches!(req.payload, RequestPayload::Options(_)));
    assert_eq!((req.width, req.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    assert_eq!(req.theme.as_deref(), Some("dark"));
}
