use std::path::Path;

use weft_http::StackConfig;

pub fn check(stack: &Path) -> anyhow::Result<()> {
    let config = StackConfig::from_file(stack)?;
    println!("✓ {} is a valid stack", stack.display());
    for line in describe(&config) {
        println!("  {line}");
    }
    Ok(())
}

/// One line per stack layer, outermost first, ending with the terminal.
fn describe(config: &StackConfig) -> Vec<String> {
    let mut lines: Vec<String> = config
        .transformers
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t.kind()))
        .collect();
    lines.push(format!("terminal (max body {} bytes)", config.max_body()));
    lines
}
