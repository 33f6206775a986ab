use treeprobe_core::{
    Colors, ComponentRef, Props, Resolved, Scalar, Value, element, transition, void_element,
};

use super::session::Session;
use super::test_utils::run;
use super::trace::NoopTracer;

fn sample() -> ComponentRef {
    element(
        "div",
        Props::new().with("id", "x").on("onclick", |_| "hi"),
        [
            ComponentRef::thunk(|| "a"),
            ComponentRef::deferred(async { "b" }),
            "c".into(),
            void_element("img", Props::new()),
            transition("a", 1),
        ],
    )
}

#[test]
fn unresolved_parts_render_as_markers() {
    let session = Session::new();

    let dump = session.snapshot().component(&sample()).format(true, Colors::OFF);

    insta::assert_snapshot!(dump, @r#"
    {
      "tag": "div",
      "props": {
        "id": "x",
        "onclick": "<handler>"
      },
      "children": [
        "<thunk>",
        "<deferred>",
        "c",
        {
          "tag": "img",
          "props": {}
        },
        {
          "from": "a",
          "to": 1
        }
      ]
    }
    "#);
}

#[test]
fn cached_children_render_resolved() {
    let session = Session::new();
    let root = sample();
    run(session.resolver().children(root.clone(), &mut NoopTracer)).expect("children");

    let dump = session.snapshot().component(&root).format(false, Colors::OFF);

    insta::assert_snapshot!(dump, @r#"{"tag":"div","props":{"id":"x","onclick":"<handler>"},"children":["a","b","c",{"tag":"img","props":{}},{"from":"a","to":1}]}"#);
}

#[test]
fn completed_deferrals_render_their_value() {
    let session = Session::new();
    let deferred = ComponentRef::deferred(async { "done" });
    assert_eq!(session.snapshot().component(&deferred), Value::from("<deferred>"));

    run(session.resolver().unwrap(deferred.clone(), &mut NoopTracer)).expect("unwrap");

    assert_eq!(session.snapshot().component(&deferred), Value::from("done"));
}

#[test]
fn text_rendering_per_shape() {
    let session = Session::new();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.text(&Resolved::Scalar(Scalar::Text("c".into()))), "c");
    assert_eq!(snapshot.text(&Resolved::Scalar(Scalar::Number(2.5))), "2.5");
    assert_eq!(snapshot.text(&Resolved::Scalar(Scalar::Number(3.0))), "3");
    assert_eq!(snapshot.text(&Resolved::Absent), "");

    let ComponentRef::Node(node) = element("b", Props::new(), ["x"]) else {
        panic!("expected node");
    };
    assert_eq!(
        snapshot.text(&Resolved::Node(node)),
        r#"{"tag":"b","props":{},"children":["x"]}"#
    );
}

#[test]
fn dumps_use_session_colors() {
    let plain = Session::new();
    let colored = Session::builder().colors(Colors::ON).build();
    let value = Resolved::Scalar(Scalar::Text("x".into()));

    assert_eq!(plain.snapshot().dump(&value), r#""x""#);
    assert!(colored.snapshot().dump(&value).contains("\x1b["));
}
