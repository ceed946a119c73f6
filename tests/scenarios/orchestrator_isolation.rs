//! Test: Orchestrator isolation - concurrent deployments, swallowed failures

use crate::helpers::*;
use nodeflow::execution::{Event, EventChannel, Orchestrator};
use nodeflow::{cluster, pipeline, Pipeline, Step, StepKind};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

fn healthy(name: &str) -> Pipeline {
    pipeline(name)
        .from(source(&format!("{}-in", name), json!(name)))
        .and_then(|b| b.to(recording(&format!("{}-out", name), StepKind::Sink).0))
        .and_then(|b| b.build())
        .unwrap()
}

fn broken(name: &str) -> Pipeline {
    pipeline(name)
        .from(source(&format!("{}-in", name), json!(name)))
        .and_then(|b| b.through(failing(&format!("{}-t", name), StepKind::Processor, "boom")))
        .and_then(|b| b.to(recording(&format!("{}-out", name), StepKind::Sink).0))
        .and_then(|b| b.build())
        .unwrap()
}

/// Test that a failing deployment neither stops its sibling nor fails the run
#[tokio::test]
async fn test_failure_is_isolated() {
    let c = cluster("c")
        .deploy("a", healthy("pa"))
        .deploy("b", broken("pb"))
        .build()
        .unwrap();
    let channel = EventChannel::new();

    let result = Orchestrator::new().run(&c, &channel).await;
    let events = channel.drain();

    assert!(result.is_ok());
    assert_eq!(events.first(), Some(&Event::ClusterStarted { name: "c".to_string() }));
    assert_eq!(events.last(), Some(&Event::ClusterCompleted { name: "c".to_string() }));
    assert_eq!(count_kind(&events, "cluster_started"), 1);
    assert_eq!(count_kind(&events, "cluster_completed"), 1);
    assert!(events.contains(&Event::DeploymentCompleted { name: "a".to_string() }));
    assert!(events.contains(&Event::PipelineCompleted { name: "pa".to_string() }));
    assert!(events.contains(&Event::DeploymentErrored {
        name: "b".to_string(),
        error: "Step pb-t failed: boom".to_string(),
    }));
    assert!(!events.contains(&Event::DeploymentCompleted { name: "b".to_string() }));
}

/// Test that the run succeeds even when every deployment fails
#[tokio::test]
async fn test_all_failures_still_succeed() {
    let c = cluster("doomed")
        .deploy("x", broken("px"))
        .deploy("y", broken("py"))
        .build()
        .unwrap();
    let channel = EventChannel::new();

    let result = Orchestrator::new().run(&c, &channel).await;
    let events = channel.drain();

    assert!(result.is_ok());
    let errored: Vec<&str> = events
        .iter()
        .filter(|e| matches!(e, Event::DeploymentErrored { .. }))
        .map(|e| e.name())
        .collect();
    assert_eq!(errored.len(), 2);
    assert!(errored.contains(&"x") && errored.contains(&"y"));
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::ClusterErrored { .. } | Event::PipelineErrored { .. })));
    assert_eq!(events.first(), Some(&Event::ClusterStarted { name: "doomed".to_string() }));
    assert_eq!(events.last(), Some(&Event::ClusterCompleted { name: "doomed".to_string() }));
    assert_eq!(count_kind(&events, "cluster_started"), 1);
    assert_eq!(count_kind(&events, "cluster_completed"), 1);
}

/// Test that deployments make progress concurrently
#[tokio::test]
async fn test_deployments_run_concurrently() {
    let barrier = Arc::new(Barrier::new(2));
    let gated = |name: &str| {
        let barrier = barrier.clone();
        let gate = Step::from_fn(format!("{}-in", name), StepKind::Source, move |_| {
            let barrier = barrier.clone();
            async move {
                barrier.wait().await;
                Ok(json!(1))
            }
        });
        pipeline(name)
            .from(gate)
            .and_then(|b| b.to(recording(&format!("{}-out", name), StepKind::Sink).0))
            .and_then(|b| b.build())
            .unwrap()
    };
    let c = cluster("together")
        .deploy("left", gated("l"))
        .deploy("right", gated("r"))
        .build()
        .unwrap();
    let channel = EventChannel::new();

    // Both sources block until the other has started.
    tokio::time::timeout(Duration::from_secs(5), Orchestrator::new().run(&c, &channel))
        .await
        .expect("deployments should not run one after another")
        .unwrap();

    let completed = channel
        .drain()
        .into_iter()
        .filter(|e| matches!(e, Event::DeploymentCompleted { .. }))
        .count();
    assert_eq!(completed, 2);
}

/// Test that events of one deployment keep their relative order
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_per_deployment_order() {
    let c = cluster("c")
        .deploy("a", healthy("pa"))
        .deploy("b", healthy("pb"))
        .deploy("d", broken("pd"))
        .build()
        .unwrap();
    let channel = EventChannel::new();

    Orchestrator::new().run(&c, &channel).await.unwrap();
    let events = channel.drain();

    let a: Vec<String> = trace(&events)
        .into_iter()
        .filter(|t| t.ends_with(":a") || t.contains(":pa"))
        .collect();
    assert_eq!(
        a,
        vec![
            "deployment_started:a",
            "pipeline_started:pa",
            "step_started:pa-in",
            "step_completed:pa-in",
            "step_started:pa-out",
            "step_completed:pa-out",
            "pipeline_completed:pa",
            "deployment_completed:a",
        ]
    );

    let d: Vec<String> = trace(&events)
        .into_iter()
        .filter(|t| t.ends_with(":d") || t.contains(":pd"))
        .collect();
    assert_eq!(
        d,
        vec![
            "deployment_started:d",
            "pipeline_started:pd",
            "step_started:pd-in",
            "step_completed:pd-in",
            "step_started:pd-t",
            "step_errored:pd-t",
            "deployment_errored:d",
        ]
    );
}

/// Test that a panicking node is reported as a deployment failure
#[tokio::test]
async fn test_panicking_node_is_reported() {
    let panicky = Step::from_fn("bad-in", StepKind::Source, |_| async {
        if true {
            panic!("node exploded");
        }
        Ok(json!(null))
    });
    let p = pipeline("bad")
        .from(panicky)
        .and_then(|b| b.to(recording("bad-out", StepKind::Sink).0))
        .and_then(|b| b.build())
        .unwrap();
    let c = cluster("c")
        .deploy("bad", p)
        .deploy("good", healthy("pg"))
        .build()
        .unwrap();
    let channel = EventChannel::new();

    assert!(Orchestrator::new().run(&c, &channel).await.is_ok());
    let events = channel.drain();

    let bad = about(&events, "bad");
    let error = bad
        .iter()
        .find_map(|e| match e {
            Event::DeploymentErrored { error, .. } => Some(error.clone()),
            _ => None,
        })
        .expect("panic should surface as DeploymentErrored");
    assert!(error.starts_with("Deployment task panicked"));
    assert!(events.contains(&Event::DeploymentCompleted { name: "good".to_string() }));
}
