//! Interface tests for stream compilation using Cucumber.
//!
//! Scenarios describe a service document, package it through the lifecycle
//! host, and assert on the compiled template.
//!
//! ```bash
//! cargo test --test interfaces
//! ```

mod steps;

use cucumber::World;
use steps::synthesis::SynthesisWorld;

#[tokio::main]
async fn main() {
    println!("\n=== Running Stream Compilation Interface Tests ===\n");
    SynthesisWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/interfaces/features")
        .await;
}
