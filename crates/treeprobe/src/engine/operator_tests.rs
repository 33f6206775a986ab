use indoc::indoc;

use treeprobe_core::{
    ComponentRef, Event, Kind, Props, Resolved, Value, click, element, fragment, keypress,
    transition, void_element,
};

use super::error::{QueryError, Result};
use super::operator::{Operator, Predicate};
use super::session::Session;
use super::test_utils::run;
use super::trace::NoopTracer;

fn apply(session: &Session, operator: &Operator, root: ComponentRef) -> Result<Resolved> {
    let resolver = session.resolver();
    run(async {
        let input = resolver.unwrap(root, &mut NoopTracer).await?;
        let output = operator.apply(&resolver, input, &mut NoopTracer).await?;
        resolver.unwrap(output, &mut NoopTracer).await
    })
}

fn data(session: &Session, value: &Resolved) -> Value {
    session.snapshot().resolved(value)
}

#[test]
fn operators_display_as_calls() {
    let operators = [
        Operator::FindWhere(Predicate::prop_eq("id", "x")),
        Operator::FindById("greeting".into()),
        Operator::FindByClass("item".into()),
        Operator::FindFirst,
        Operator::FindNth(2),
        Operator::FindChildren,
        Operator::UnfinishedTransition,
        Operator::FinishedTransition,
        Operator::Trigger(keypress(13)),
    ];

    let rendered = operators
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(rendered, @r#"
    find_where(props.id == "x")
    find_by_id("greeting")
    find_by_class("item")
    find_first()
    find_nth(2)
    find_children()
    unfinished_transition()
    finished_transition()
    trigger(onkeypress)
    "#);
}

#[test]
fn prop_eq_only_matches_data_props_of_nodes() {
    let predicate = Predicate::prop_eq("onclick", "x");
    let session = Session::new();
    let resolver = session.resolver();
    let unwrap = |c: ComponentRef| run(resolver.unwrap(c, &mut NoopTracer)).expect("unwrap");

    let handler = unwrap(void_element("a", Props::new().on("onclick", |_| "x")));
    let data_prop = unwrap(void_element("a", Props::new().with("onclick", "x")));
    let scalar = unwrap("x".into());

    assert!(!predicate.matches(&handler));
    assert!(predicate.matches(&data_prop));
    assert!(!predicate.matches(&scalar));
    assert_eq!(predicate.description(), r#"props.onclick == "x""#);
}

#[test]
fn prop_eq_compares_numbers_by_value() {
    let session = Session::new();
    let root = void_element("input", Props::new().with("tabindex", 2));
    let predicate = Predicate::prop_eq("tabindex", 2.0);

    let found = apply(&session, &Operator::FindWhere(predicate), root);

    assert!(found.is_ok());
}

#[test]
fn find_by_class_returns_first_match() {
    let session = Session::new();
    let root = element(
        "ul",
        Props::new(),
        [
            element("li", Props::new().with("class", "item"), ["one"]),
            element("li", Props::new().with("class", "item"), ["two"]),
        ],
    );

    let found = apply(&session, &Operator::FindByClass("item".into()), root).expect("found");

    let node = found.as_node().expect("node");
    assert_eq!(node.tag(), "li");
    assert!(matches!(node.children(), Some([ComponentRef::Scalar(s)]) if s.to_string() == "one"));
}

#[test]
fn find_by_id_reports_the_searched_tree() {
    let session = Session::new();
    let root = element("div", Props::new(), ["a"]);

    let err = apply(&session, &Operator::FindById("missing".into()), root).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r#"
    could not find component with id "missing" in component tree:
    {
      "tag": "div",
      "props": {},
      "children": [
        "a"
      ]
    }
    "#);
}

#[test]
fn find_where_names_the_condition() {
    let session = Session::new();
    let predicate = Predicate::new("tag is table", |v| {
        v.as_node().is_some_and(|n| n.tag() == "table")
    });

    let err = apply(&session, &Operator::FindWhere(predicate), "x".into()).unwrap_err();

    assert_eq!(
        err.to_string(),
        indoc! {r#"
            could not find component based on condition tag is table in component tree:
            "x""#}
    );
}

#[test]
fn find_nth_requires_an_array() {
    let session = Session::new();
    let img = void_element("img", Props::new());

    let err = apply(&session, &Operator::FindFirst, img).unwrap_err();

    assert!(matches!(
        err,
        QueryError::WrongShape {
            expected: Kind::Array,
            found: Kind::Node,
            ..
        }
    ));
    insta::assert_snapshot!(err.to_string(), @r#"
    could not find a component because the component tree is not an array, is a node:
    {
      "tag": "img",
      "props": {}
    }
    "#);
}

#[test]
fn find_nth_indexes_and_bounds_checks() {
    let session = Session::new();
    let items = fragment(["a".into(), ComponentRef::thunk(|| "b")]);

    let first = apply(&session, &Operator::FindFirst, items.clone()).expect("first");
    let second = apply(&session, &Operator::FindNth(1), items.clone()).expect("second");
    assert_eq!(data(&session, &first), Value::from("a"));
    assert_eq!(data(&session, &second), Value::from("b"));

    let err = apply(&session, &Operator::FindNth(5), items).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"
    could not find a component at index 5 because the array has 2 elements:
    [
      "a",
      "<thunk>"
    ]
    "#);
}

#[test]
fn find_first_on_empty_array_is_out_of_range() {
    let session = Session::new();

    let err = apply(&session, &Operator::FindFirst, fragment(Vec::<ComponentRef>::new()));

    assert!(matches!(err, Err(QueryError::OutOfRange { index: 0, len: 0, .. })));
}

#[test]
fn find_children_per_shape() {
    let session = Session::new();

    let items = apply(&session, &Operator::FindChildren, fragment(["a", "b"])).expect("array");
    assert_eq!(items.as_array().map(<[_]>::len), Some(2));

    let node = element("p", Props::new(), [ComponentRef::thunk(|| "x"), "y".into()]);
    let children = apply(&session, &Operator::FindChildren, node).expect("children");
    assert_eq!(
        data(&session, &children),
        Value::Array(vec![Value::from("x"), Value::from("y")])
    );
    assert!(children.as_array().is_some_and(|c| c.iter().all(ComponentRef::is_resolved)));

    let void = apply(&session, &Operator::FindChildren, void_element("br", Props::new()));
    assert_eq!(void.expect("absent").kind(), Kind::Absent);

    let scalar = apply(&session, &Operator::FindChildren, "x".into());
    assert_eq!(scalar.expect("absent").kind(), Kind::Absent);
}

#[test]
fn transitions_select_their_side() {
    let session = Session::new();
    let root = transition(ComponentRef::thunk(|| "Hello"), "Bye");

    let from = apply(&session, &Operator::UnfinishedTransition, root.clone()).expect("from");
    let to = apply(&session, &Operator::FinishedTransition, root).expect("to");

    assert_eq!(data(&session, &from), Value::from("Hello"));
    assert_eq!(data(&session, &to), Value::from("Bye"));
}

#[test]
fn transitions_reject_other_shapes() {
    let session = Session::new();

    let err = apply(&session, &Operator::FinishedTransition, "x".into()).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r#"
    could not handle transition because the component tree is not a transition, is a scalar:
    "x"
    "#);
}

#[test]
fn trigger_invokes_the_handler_with_the_event() {
    let session = Session::new();
    let props = Props::new().on("onkeypress", |event: &Event| {
        let code = event.get("keyCode").and_then(Value::as_f64).unwrap_or_default();
        ComponentRef::number(code)
    });
    let root = void_element("input", props);

    let out = apply(&session, &Operator::Trigger(keypress(13)), root).expect("handled");

    assert_eq!(data(&session, &out), Value::from(13));
}

#[test]
fn trigger_without_handler_fails() {
    let session = Session::new();
    let root = void_element("button", Props::new().with("onclick", "nope"));

    let err = apply(&session, &Operator::Trigger(click()), root).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r#"
    could not trigger the event {"eventName":"onclick"} because there is no event handler set up:
    {
      "tag": "button",
      "props": {
        "onclick": "nope"
      }
    }
    "#);

    let err = apply(&session, &Operator::Trigger(click()), fragment(["a"])).unwrap_err();
    assert!(matches!(err, QueryError::NoHandler { .. }));
}
