use hic_browser_wasm::domain::errors::ViewStateParseError;
use hic_browser_wasm::domain::genome::Normalization;
use hic_browser_wasm::view_state::ViewState;
use insta::assert_snapshot;

#[test]
fn compact_string_lists_fields_in_order() {
    let state = ViewState {
        normalization: Normalization::from("KR"),
        ..ViewState::new(1, 2, 2, 125.5, 0.0, 1.2)
    };
    assert_snapshot!(state.to_string(), @"1,2,2,125.5,0,1.2,KR");
}

#[test]
fn parses_what_it_prints() {
    let state: ViewState = "3,5,1,10.25,4,2.5,VC".parse().unwrap();
    assert_eq!(state.to_string(), "3,5,1,10.25,4,2.5,VC");
}

#[test]
fn normalization_is_optional() {
    let state: ViewState = "1,1,0,0,0,1".parse().unwrap();
    assert!(state.normalization.is_none());
}

#[test]
fn malformed_strings_are_rejected() {
    assert_eq!(
        "1,2".parse::<ViewState>(),
        Err(ViewStateParseError::MissingField("zoom"))
    );
    assert_eq!(
        "1,2,x,0,0,1".parse::<ViewState>(),
        Err(ViewStateParseError::InvalidField { field: "zoom", value: "x".to_string() })
    );
    assert!("1,2,0,0,0,0".parse::<ViewState>().is_err());
    assert!("1,2,0,inf,0,1".parse::<ViewState>().is_err());
}
