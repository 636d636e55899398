//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - seeded ansatz builder and noisy sampling harness",
        style("qharness").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qharness-ir   Gates, circuits and noise specs");
    println!("  qharness-sim  Ansatz builder, noise injector, sampler, estimator");
    println!("  qharness-cli  Command-line interface");
    println!();
    println!("License: {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
