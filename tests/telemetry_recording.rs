use std::sync::Arc;
use switchboard::prelude::*;
use switchboard::{MemoryTelemetry, Outcome};

#[test]
fn test_telemetry_recording() {
    let telemetry = Arc::new(MemoryTelemetry::new());
    let invoker = Invoker::new(JsonCodec).with_telemetry(telemetry.clone());

    invoker
        .register("double", |n: i64| -> Result<i64, String> {
            if n < 0 { Err("negative".into()) } else { Ok(n * 2) }
        })
        .unwrap();
    let tmp_id = invoker.register_temperature(|| {}).unwrap();

    let ctx = Context::background();
    let _ = invoker.invoke(&ctx, "double", &[b"2"]);
    let _ = invoker.invoke(&ctx, "double", &[b"-2"]);
    let _ = invoker.invoke(&ctx, "double", &[b"1", b"2"]);
    let _ = invoker.invoke(&ctx, "missing", NO_PAYLOADS);
    let _ = invoker.invoke(&ctx, &tmp_id, NO_PAYLOADS);

    let traces = telemetry.get_traces();
    assert_eq!(traces.len(), 5);

    let outcomes: Vec<Outcome> = traces.iter().map(|t| t.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            Outcome::Ok,
            Outcome::HandlerError,
            Outcome::ArgsNotMatch,
            Outcome::NotExisted,
            Outcome::Ok,
        ]
    );
    assert_eq!(traces[1].error.as_deref(), Some("negative"));
    assert_eq!(traces[2].payload_count, 2);
    assert!(!traces[0].temperature);
    assert!(traces[4].temperature);
    assert_eq!(traces[4].fn_id, tmp_id);
}

#[tokio::test]
async fn test_async_invocations_are_traced() {
    let telemetry = Arc::new(MemoryTelemetry::new());
    let invoker = Invoker::new(JsonCodec).with_telemetry(telemetry.clone());
    invoker
        .register_async("wait", |ms: u64| async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await;
        })
        .unwrap();

    invoker
        .invoke_async(&Context::background(), "wait", &[b"2"])
        .await
        .unwrap();

    let traces = telemetry.get_traces();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].outcome, Outcome::Ok);
    assert!(traces[0].elapsed_micros >= 2_000);
}
