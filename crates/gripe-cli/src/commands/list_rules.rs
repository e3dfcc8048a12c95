//! List rules command implementation.

use gripe_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<20} {:<10} Description", "Name", "Severity");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<20} {:<10} {}",
            rule.name(),
            rule.severity().to_string(),
            rule.description()
        );
    }

    println!("\nPresets:");
    for preset in Preset::ALL {
        let names: Vec<String> = preset
            .rules()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        println!("  {:<8} - {}", preset.as_str(), names.join(", "));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  gripe check --preset all --rules easy-print,todo-in-docs");
}
