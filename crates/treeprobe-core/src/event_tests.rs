use crate::{Event, Value, click, event, keydown, keypress, keyup};

#[test]
fn click_targets_onclick() {
    let e = click();

    assert_eq!(e.name(), "onclick");
    assert_eq!(e.fields().count(), 0);
}

#[test]
fn key_events_carry_key_code() {
    for (e, name) in [
        (keypress(13), "onkeypress"),
        (keydown(27), "onkeydown"),
        (keyup(32), "onkeyup"),
    ] {
        assert_eq!(e.name(), name);
        assert!(e.get("keyCode").and_then(Value::as_f64).is_some());
    }
    assert_eq!(keypress(13).get("keyCode"), Some(&Value::Number(13.0)));
}

#[test]
fn custom_event_keeps_field_order() {
    let e = event("onchange", [("value", "abc"), ("source", "paste")]);
    let keys: Vec<&str> = e.fields().map(|(k, _)| k).collect();

    assert_eq!(e.name(), "onchange");
    assert_eq!(keys, ["value", "source"]);
}

#[test]
fn displays_as_flat_object() {
    let e = Event::new("onkeyup").with("keyCode", 32);
    assert_eq!(e.to_string(), r#"{"eventName":"onkeyup","keyCode":32}"#);
    assert_eq!(click().to_string(), r#"{"eventName":"onclick"}"#);
}
