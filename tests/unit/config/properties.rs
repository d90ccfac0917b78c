use super::*;

#[test]
fn setting_none_removes_the_key() {
    let mut p = Properties::new();
    p.set_double("progress", 0.25);
    assert!(p.contains("progress"));
    p.set("progress", None);
    assert!(!p.contains("progress"));
    assert!(p.is_empty());
}

#[test]
fn typed_getters_coerce_between_representations() {
    let mut p = Properties::new();
    p.set_string("length", " 250 ");
    p.set_int("reverse", 1);
    p.set_double("softness", 0.5);

    assert_eq!(p.get_int("length"), 250);
    assert_eq!(p.get_double("reverse"), Some(1.0));
    assert_eq!(p.get_string("softness").as_deref(), Some("0.5"));
    assert_eq!(p.get_int("missing"), 0);
    assert_eq!(p.get_double("missing"), None);
}

#[test]
fn pass_strips_prefix_and_ignores_other_keys() {
    let mut src = Properties::new();
    src.set_string("producer.eof", "pause");
    src.set_int("producer.length", 10);
    src.set_string("producer.", "ignored");
    src.set_string("resource", "wipe.pgm");
    src.set_string("producerx", "nope");

    let mut dst = Properties::new();
    assert_eq!(dst.pass(&src, "producer."), 2);
    assert_eq!(dst.get_string("eof").as_deref(), Some("pause"));
    assert_eq!(dst.get_int("length"), 10);
    assert_eq!(dst.len(), 2);
}

#[test]
fn with_prefix_is_sorted_and_bounded() {
    let mut p = Properties::new();
    p.set_int("b.2", 2);
    p.set_int("a", 0);
    p.set_int("b.1", 1);
    p.set_int("c", 3);

    let keys: Vec<&str> = p.with_prefix("b.").map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["b.1", "b.2"]);
}
