//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - commutation-aware reordering and gauge compilation",
        style("Qwarp").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qwarp-ir       Circuit intermediate representation");
    println!("  qwarp-compile  Reordering, gauge and equivalence passes");
    println!("  qwarp-cli      Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/qwarp-dev/qwarp").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
