//! Bounded Retry
//!
//! Failure modelled as ordinary states, with a layered reset.
//!
//! Key concepts:
//! - Closure states built with `from_fn`
//! - Stepping manually with `run_once` + `apply`
//! - Domain failure recorded in shared data, then the terminal marker
//! - `reset_with` restoring both the machine and the shared data
//!
//! Run with: RUST_LOG=debug cargo run --example bounded_retry

use stepwise::{from_fn, Context, Next, StateRef};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Upload {
    attempts: u32,
    succeed_on: u32,
    outcome: Option<Result<(), String>>,
}

const MAX_ATTEMPTS: u32 = 3;

fn machine() -> StateRef<Upload> {
    let succeeded = from_fn("Succeeded", |ctx: &mut Context<Upload>| {
        ctx.data_mut().outcome = Some(Ok(()));
        Ok(Next::done())
    });
    let gave_up = from_fn("GaveUp", |ctx: &mut Context<Upload>| {
        let attempts = ctx.data().attempts;
        ctx.data_mut().outcome = Some(Err(format!("gave up after {attempts} attempts")));
        Ok(Next::done())
    });

    fn attempt(succeeded: StateRef<Upload>, gave_up: StateRef<Upload>) -> StateRef<Upload> {
        from_fn("Attempt", move |ctx: &mut Context<Upload>| {
            let data = ctx.data_mut();
            data.attempts += 1;
            let next = if data.attempts == data.succeed_on {
                Next::to(succeeded.clone())
            } else if data.attempts >= MAX_ATTEMPTS {
                Next::to(gave_up.clone())
            } else {
                Next::to(attempt(succeeded.clone(), gave_up.clone()))
            };
            Ok(next)
        })
    }

    attempt(succeeded, gave_up)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Bounded Retry Example ===\n");

    let mut context = Context::new(
        machine(),
        Upload {
            succeed_on: 2,
            ..Upload::default()
        },
    );

    while !context.is_done() {
        println!("Running {:?}", context.current_name());
        match context.run_once() {
            Ok(next) => context.apply(next),
            Err(err) => {
                println!("State failed: {err}");
                return;
            }
        }
    }
    println!("First run: {:?}\n", context.data().outcome);

    context.reset_with(|data| {
        data.attempts = 0;
        data.succeed_on = 10;
        data.outcome = None;
    });

    if let Err(err) = context.run() {
        println!("State failed: {err}");
        return;
    }
    println!("Second run: {:?}", context.data().outcome);
    println!("Path: {:?}", context.history().get_path());

    println!("\n=== Example Complete ===");
}
