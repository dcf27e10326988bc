use zoomBridge::resolver::{resolve_duration, ResolveError, DEFAULT_DURATION_MINUTES};

#[test]
fn whole_hours_scale_by_sixty() {
    for n in 1..=8u32 {
        let text = format!("{} hours", n);
        assert_eq!(resolve_duration(&text).unwrap(), 60 * n);
    }
}

#[test]
fn common_phrasings() {
    assert_eq!(resolve_duration("45 minutes").unwrap(), 45);
    assert_eq!(resolve_duration("1.5 hours").unwrap(), 90);
    assert_eq!(resolve_duration("90 mins").unwrap(), 90);
    assert_eq!(resolve_duration("1 hr").unwrap(), 60);
    assert_eq!(resolve_duration("30").unwrap(), 30);
}

#[test]
fn first_number_wins() {
    assert_eq!(resolve_duration("2 hours or maybe 3").unwrap(), 120);
}

#[test]
fn gibberish_fails_with_unrecognized_duration() {
    let err = resolve_duration("banana");
    assert!(matches!(err, Err(ResolveError::UnrecognizedDuration(_))));
}

#[test]
fn the_documented_default_is_an_hour() {
    assert_eq!(DEFAULT_DURATION_MINUTES, 60);
}
