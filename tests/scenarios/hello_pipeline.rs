//! Test: Hello pipeline - linear execution, data threading and short-circuit

use crate::helpers::*;
use nodeflow::execution::Event;
use nodeflow::{pipeline, Step, StepKind};
use serde_json::json;

fn greeter(fail: bool) -> Step {
    Step::from_fn("t", StepKind::Processor, move |input| async move {
        if fail {
            anyhow::bail!("boom");
        }
        let name = input
            .as_ref()
            .and_then(|v| v.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(json!({ "message": format!("Hello {}!", name) }))
    })
}

/// Test the canonical three-step pipeline and its full event trace
#[tokio::test]
async fn test_hello_pipeline_trace() {
    let (sink, inputs) = recording("out", StepKind::Sink);
    let hello = pipeline("hello")
        .from(source("in", json!({ "name": "World" })))
        .and_then(|b| b.through(greeter(false)))
        .and_then(|b| b.to(sink))
        .and_then(|b| b.build())
        .unwrap();

    let (result, events) = run_collecting(&hello).await;

    assert!(result.is_ok());
    assert_eq!(
        trace(&events),
        vec![
            "pipeline_started:hello",
            "step_started:in",
            "step_completed:in",
            "step_started:t",
            "step_completed:t",
            "step_started:out",
            "step_completed:out",
            "pipeline_completed:hello",
        ]
    );
    assert_eq!(
        *inputs.lock().unwrap(),
        vec![Some(json!({ "message": "Hello World!" }))]
    );
}

/// Test that a failing processor stops the run and attributes the failure
#[tokio::test]
async fn test_hello_pipeline_failure() {
    let (sink, inputs) = recording("out", StepKind::Sink);
    let hello = pipeline("hello")
        .from(source("in", json!({ "name": "World" })))
        .and_then(|b| b.through(greeter(true)))
        .and_then(|b| b.to(sink))
        .and_then(|b| b.build())
        .unwrap();

    let (result, events) = run_collecting(&hello).await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Step t failed: boom");
    assert_eq!(err.step(), "t");
    assert_eq!(
        events.last(),
        Some(&Event::StepErrored {
            name: "t".to_string(),
            error: "boom".to_string(),
        })
    );
    assert!(!events.iter().any(|e| matches!(e, Event::PipelineCompleted { .. })));
    assert!(about(&events, "out").is_empty());
    assert!(inputs.lock().unwrap().is_empty());
}

/// Test that a successful run of n steps publishes 2n + 2 events
#[tokio::test]
async fn test_event_count_for_long_pipeline() {
    let mut builder = pipeline("long").from(source("s", json!("x"))).unwrap();
    for i in 0..5 {
        builder = builder.through(append(&format!("p{}", i), "!")).unwrap();
    }
    let (sink, inputs) = recording("k", StepKind::Sink);
    let long = builder.to(sink).and_then(|b| b.build()).unwrap();

    let (result, events) = run_collecting(&long).await;

    assert!(result.is_ok());
    assert_eq!(long.len(), 7);
    assert_eq!(events.len(), 2 * long.len() + 2);
    assert_eq!(*inputs.lock().unwrap(), vec![Some(json!("x!!!!!"))]);
}

/// Test that the source gets no input and each step gets its predecessor's output
#[tokio::test]
async fn test_inputs_threaded_between_steps() {
    let (first, first_inputs) = recording("first", StepKind::Source);
    let (middle, middle_inputs) = recording("middle", StepKind::Bidirectional);
    let (last, last_inputs) = recording("last", StepKind::Sink);
    let p = pipeline("threaded")
        .from(first)
        .and_then(|b| b.through(middle))
        .and_then(|b| b.to(last))
        .and_then(|b| b.build())
        .unwrap();

    let (result, _) = run_collecting(&p).await;

    assert!(result.is_ok());
    assert_eq!(*first_inputs.lock().unwrap(), vec![None]);
    assert_eq!(*middle_inputs.lock().unwrap(), vec![Some(json!(null))]);
    assert_eq!(*last_inputs.lock().unwrap(), vec![Some(json!(null))]);
}

/// Test that a failing source leaves every later step untouched
#[tokio::test]
async fn test_failing_source() {
    let (sink, inputs) = recording("out", StepKind::Sink);
    let p = pipeline("dead")
        .from(failing("in", StepKind::Source, "no data"))
        .and_then(|b| b.to(sink))
        .and_then(|b| b.build())
        .unwrap();

    let (result, events) = run_collecting(&p).await;

    assert_eq!(result.unwrap_err().to_string(), "Step in failed: no data");
    assert_eq!(
        trace(&events),
        vec!["pipeline_started:dead", "step_started:in", "step_errored:in"]
    );
    assert!(inputs.lock().unwrap().is_empty());
}

/// Test that a pipeline can be executed again with the same result
#[tokio::test]
async fn test_pipeline_is_reusable() {
    let (sink, inputs) = recording("k", StepKind::Sink);
    let p = pipeline("again")
        .from(source("s", json!("a")))
        .and_then(|b| b.through(append("p", "b")))
        .and_then(|b| b.to(sink))
        .and_then(|b| b.build())
        .unwrap();

    let (first, first_events) = run_collecting(&p).await;
    let (second, second_events) = run_collecting(&p).await;

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(first_events, second_events);
    assert_eq!(*inputs.lock().unwrap(), vec![Some(json!("ab")), Some(json!("ab"))]);
}
