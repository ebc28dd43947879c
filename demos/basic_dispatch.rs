//! A complete example showing how to register and invoke handlers with Switchboard.
//!
//! This example demonstrates:
//! - Registering plain closures under durable ids
//! - Receiving the caller's context as the first parameter
//! - Encoding arguments with `marshal_args` and invoking by id
//! - Single-use temperature handlers
//! - Async handlers sharing the same registry

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use switchboard::prelude::*;

// ============================================================================
// Handler Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Transfer {
    from: String,
    to: String,
    amount: i64,
}

#[derive(Debug, thiserror::Error)]
#[error("insufficient funds: balance {balance}, requested {requested}")]
struct InsufficientFunds {
    balance: i64,
    requested: i64,
}

/// Stored in the context by the caller and read by handlers.
struct RequestId(&'static str);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let invoker = Invoker::new(JsonCodec);
    let balance = Arc::new(AtomicI64::new(100));

    // ========================================================================
    // Step 1: Durable handlers
    // ========================================================================

    let b = balance.clone();
    invoker.register(
        "transfer",
        move |ctx: Context, t: Transfer| -> Result<i64, InsufficientFunds> {
            let request = ctx.value::<RequestId>().map_or("-", |r| r.0);
            let current = b.load(Ordering::SeqCst);
            if t.amount > current {
                return Err(InsufficientFunds {
                    balance: current,
                    requested: t.amount,
                });
            }
            println!("[{request}] {} -> {}: {}", t.from, t.to, t.amount);
            Ok(b.fetch_sub(t.amount, Ordering::SeqCst) - t.amount)
        },
    )?;

    let b = balance.clone();
    invoker.register("deposit", move |amount: i64| {
        b.fetch_add(amount, Ordering::SeqCst);
    })?;

    // ========================================================================
    // Step 2: Invoke by id
    // ========================================================================

    let ctx = Context::background().with_value(RequestId("req-1"));
    let args = invoker.marshal_args(&(
        ctx.clone(),
        Transfer {
            from: "alice".into(),
            to: "bob".into(),
            amount: 40,
        },
    ))?;
    invoker.invoke(&ctx, "transfer", &args)?;
    println!("balance after transfer: {}", balance.load(Ordering::SeqCst));

    // Handler errors come back unchanged.
    let payload = br#"{"from": "alice", "to": "carol", "amount": 500}"#;
    if let Err(err) = invoker.invoke(&ctx, "transfer", &[payload]) {
        if let Some(e) = err.downcast_ref::<InsufficientFunds>() {
            println!("rejected: {e}");
        }
    }

    // Argument problems are reported before the handler runs.
    let err = invoker.invoke(&ctx, "deposit", &[br#""ten""#]).unwrap_err();
    println!("{:?}: {err}", err.kind());

    // ========================================================================
    // Step 3: Temperature handlers
    // ========================================================================

    let b = balance.clone();
    let refund_id = invoker.register_temperature(move |amount: i64| {
        b.fetch_add(amount, Ordering::SeqCst);
        println!("refunded {amount}");
    })?;
    println!("temperature id: {refund_id}");

    invoker.invoke(&ctx, &refund_id, &invoker.marshal_args(&(15i64,))?)?;
    let err = invoker.invoke(&ctx, &refund_id, &[b"15"]).unwrap_err();
    println!("second call: {err}");

    // ========================================================================
    // Step 4: Async handlers
    // ========================================================================

    let b = balance.clone();
    invoker.register_async("audit", move |ctx: Context| {
        let b = b.clone();
        async move {
            let request = ctx.value::<RequestId>().map_or("-", |r| r.0);
            println!("[{request}] audited balance: {}", b.load(Ordering::SeqCst));
        }
    })?;

    futures::executor::block_on(invoker.invoke_async(&ctx, "audit", NO_PAYLOADS))?;

    // Blocking invoke refuses async handlers and leaves them registered.
    let err = invoker.invoke(&ctx, "audit", NO_PAYLOADS).unwrap_err();
    println!("{:?}: {err}", err.kind());

    println!("registered handlers: {}", invoker.len());
    Ok(())
}
