//! Traffic Light
//!
//! A cyclic machine bounded by a run policy.
//!
//! Key concepts:
//! - Concrete states implementing the `State` trait
//! - Shared data carried by the context
//! - A transition hook that sees the outgoing light
//! - A step limit that halts a machine which would otherwise cycle forever
//!
//! Run with: RUST_LOG=debug cargo run --example traffic_light

use std::sync::Arc;
use stepwise::{
    Context, MachineError, Next, PolicyBuilder, RunOutcome, State, StateRef, ViolationStrategy,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Intersection {
    cycles: u32,
    log: Vec<String>,
}

struct Red;
struct Green;
struct Yellow;

impl State<Intersection> for Red {
    fn run(&self, context: &mut Context<Intersection>) -> Result<Next<Intersection>, MachineError> {
        context.data_mut().log.push("stop".to_string());
        Ok(Next::to_new(Green))
    }
}

impl State<Intersection> for Green {
    fn run(&self, context: &mut Context<Intersection>) -> Result<Next<Intersection>, MachineError> {
        context.data_mut().log.push("go".to_string());
        Ok(Next::to_new(Yellow))
    }
}

impl State<Intersection> for Yellow {
    fn run(&self, context: &mut Context<Intersection>) -> Result<Next<Intersection>, MachineError> {
        context.data_mut().log.push("slow".to_string());
        Ok(Next::to_new(Red).with_transition(|ctx: &mut Context<Intersection>| {
            ctx.data_mut().cycles += 1;
        }))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light Example ===\n");

    let initial: StateRef<Intersection> = Arc::new(Red);
    let mut context = Context::new(initial, Intersection::default());

    let policy = PolicyBuilder::new()
        .max_steps(9)
        .on_violation(ViolationStrategy::Halt)
        .build();

    match context.run_with_policy(&policy) {
        Ok(RunOutcome::Halted { steps, violations }) => {
            println!("Halted after {steps} steps");
            for violation in violations {
                println!("  - {violation}");
            }
        }
        Ok(RunOutcome::Completed { steps }) => println!("Completed after {steps} steps"),
        Err(err) => println!("Run failed: {err}"),
    }

    println!("Signals shown: {:?}", context.data().log);
    println!("Full cycles: {}", context.data().cycles);
    println!("Path: {:?}", context.history().get_path());

    println!("\n=== Example Complete ===");
}
