use super::*;

#[test]
fn set_parses_owned_keys_and_declines_others() {
    let mut cfg = TransitionConfig::default();
    assert!(cfg.set("resource", " wipe.pgm ").unwrap());
    assert!(cfg.set("reverse", "1").unwrap());
    assert!(cfg.set("invert", "true").unwrap());
    assert!(cfg.set("softness", "0=0;10=0.5").unwrap());
    assert!(cfg.set("in", "10").unwrap());
    assert!(cfg.set("out", "109").unwrap());
    assert!(!cfg.set("producer.eof", "loop").unwrap());

    assert_eq!(cfg.resource(), Some("wipe.pgm"));
    assert!(cfg.reverse);
    assert!(cfg.invert);
    assert_eq!(cfg.softness.sample(5, 100), 0.25);
    assert_eq!((cfg.in_point, cfg.out_point), (10, 109));
}

#[test]
fn empty_resource_reads_as_absent() {
    let mut cfg = TransitionConfig::default();
    cfg.set("resource", "").unwrap();
    assert_eq!(cfg.resource(), None);
    cfg.resource = Some(String::new());
    assert_eq!(cfg.resource(), None);
}

#[test]
fn bad_values_are_validation_errors() {
    let mut cfg = TransitionConfig::default();
    assert!(matches!(
        cfg.set("reverse", "maybe"),
        Err(LumaError::Validation(_))
    ));
    assert!(matches!(cfg.set("in", "x"), Err(LumaError::Validation(_))));
    assert!(matches!(
        cfg.set("softness", "0=?"),
        Err(LumaError::Animation(_))
    ));

    cfg.in_point = 20;
    cfg.out_point = 10;
    assert!(cfg.validate().is_err());
}

#[test]
fn timing_uses_own_bounds() {
    let cfg = TransitionConfig {
        in_point: 100,
        out_point: 199,
        ..Default::default()
    };
    let t = cfg.timing(150, Some((0, 10)));
    assert_eq!(t.position, 50);
    assert_eq!(t.length, 100);
    assert_eq!(t.mix, 0.5);
}

#[test]
fn always_active_transition_falls_back_to_producer_range() {
    let cfg = TransitionConfig::default();
    let t = cfg.timing(25, Some((0, 99)));
    assert_eq!(t.length, 100);
    assert_eq!(t.mix, 0.25);

    let unbounded = cfg.timing(25, None);
    assert_eq!(unbounded.length, 0);
    assert_eq!(unbounded.mix, 0.0);
}

#[test]
fn progress_is_clamped() {
    assert_eq!(progress(-5, 10), 0.0);
    assert_eq!(progress(50, 10), 1.0);
    assert_eq!(progress(3, 0), 0.0);
}

#[test]
fn deserializes_with_renamed_bounds() {
    let cfg: TransitionConfig = serde_json::from_value(serde_json::json!({
        "resource": "wipe:ltr",
        "softness": "0=0;-1=1",
        "in": 0,
        "out": 49
    }))
    .unwrap();
    assert_eq!(cfg.resource(), Some("wipe:ltr"));
    assert_eq!(cfg.out_point, 49);
    assert!(serde_json::from_value::<TransitionConfig>(serde_json::json!({ "bogus": 1 })).is_err());
}
