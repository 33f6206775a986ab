use treeprobe_core::{
    Colors, ComponentRef, Props, Resolved, Scalar, click, element, fragment, transition,
    void_element,
};

use crate::testing;

use super::error::QueryError;
use super::session::Session;
use super::test_utils::run;
use super::trace::{LogTracer, PrintTracer, Verbosity, label};

fn sample() -> ComponentRef {
    ComponentRef::thunk(|| {
        element(
            "div",
            Props::new(),
            [element("p", Props::new().with("id", "x"), ["hi"])],
        )
    })
}

fn trace(verbosity: Verbosity) -> String {
    let mut tracer = PrintTracer::new(verbosity, Colors::OFF);
    run(testing(sample()).find_by_id("x").text_content_with(&mut tracer)).expect("query");
    tracer.dump()
}

#[test]
fn default_shows_operators_and_results() {
    insta::assert_snapshot!(trace(Verbosity::Default), @r#"
    => <div>
    [0] find_by_id("x")
    => <p id="x">
    "#);
}

#[test]
fn verbose_adds_matches_and_children() {
    insta::assert_snapshot!(trace(Verbosity::Verbose), @r#"
    => <div>
    [0] find_by_id("x")
      match <p id="x">
    => <p id="x">
      children of <p> resolved (1)
    "#);
}

#[test]
fn very_verbose_adds_visits_and_unwrap_steps() {
    insta::assert_snapshot!(trace(Verbosity::VeryVerbose), @r#"
      invoke thunk
    => <div>
    [0] find_by_id("x")
      visit <div>
      visit <p id="x">
      match <p id="x">
    => <p id="x">
      children of <p> resolved (1)
    "#);
}

#[test]
fn handler_calls_and_failures_are_traced() {
    let root = void_element("button", Props::new().with("id", "b").on("onclick", |_| "done"));
    let mut tracer = PrintTracer::new(Verbosity::Default, Colors::OFF);

    let err = run(
        testing(root)
            .trigger(click())
            .find_by_id("x")
            .resolve_with(&mut tracer),
    )
    .unwrap_err();

    assert!(matches!(err, QueryError::NotFound { .. }));
    insta::assert_snapshot!(tracer.dump(), @r#"
    => <button id="b">
    [0] trigger(onclick)
      trigger onclick
    => "done"
    [1] find_by_id("x")
      error: could not find component with id "x" in component tree:
    "#);
}

#[test]
fn unwrap_failures_are_traced() {
    let session = Session::builder().unwrap_fuel(1).build();
    let props =
        Props::new().on("onclick", |_| ComponentRef::thunk(|| ComponentRef::thunk(|| "x")));
    let mut tracer = PrintTracer::new(Verbosity::Default, Colors::OFF);

    let err = run(
        session
            .testing(void_element("button", props))
            .trigger(click())
            .resolve_with(&mut tracer),
    )
    .unwrap_err();

    assert!(matches!(err, QueryError::FuelExhausted { limit: 1 }));
    insta::assert_snapshot!(tracer.dump(), @r"
    => <button>
    [0] trigger(onclick)
      trigger onclick
      error: unwrap limit of 1 steps exceeded
    ");
}

#[test]
fn cache_hits_are_traced() {
    let query = testing(element("ul", Props::new(), ["a"]));
    let mut tracer = PrintTracer::new(Verbosity::Verbose, Colors::OFF);

    run(query.text_content_with(&mut tracer)).expect("query");
    run(query.find_children().resolve_with(&mut tracer)).expect("query");

    insta::assert_snapshot!(tracer.dump(), @r"
    => <ul>
      children of <ul> resolved (1)
    => <ul>
    [0] find_children()
      children of <ul> cached (1)
    => array[1]
    ");
}

#[test]
fn operator_names_use_the_key_color() {
    let mut tracer = PrintTracer::new(Verbosity::Default, Colors::ON);

    run(testing(fragment(["a"])).find_first().resolve_with(&mut tracer)).expect("query");

    assert_eq!(tracer.lines()[1], "[0] \x1b[34mfind_first()\x1b[0m");
}

#[test]
fn labels_per_shape() {
    let labels = [
        Resolved::Scalar(Scalar::Number(1.5)),
        Resolved::Scalar(Scalar::Text("hi".into())),
        Resolved::Absent,
    ]
    .iter()
    .map(label)
    .collect::<Vec<_>>();
    assert_eq!(labels, ["1.5", "\"hi\"", "absent"]);

    let ComponentRef::Transition(t) = transition("a", "b") else {
        panic!("expected transition");
    };
    assert_eq!(label(&Resolved::Transition(t)), "transition");

    let ComponentRef::Array(items) = fragment(["a", "b"]) else {
        panic!("expected array");
    };
    assert_eq!(label(&Resolved::Array(items)), "array[2]");
}

#[test]
fn log_tracer_runs_without_a_subscriber() {
    let mut tracer = LogTracer;

    let result = run(testing(sample()).find_by_id("x").text_content_with(&mut tracer));

    assert_eq!(result.expect("query").as_str(), Some("hi"));
}
