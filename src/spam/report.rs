use super::scanner::{ScanResult, TriggerScanner};
use crate::command::ExitCode;
use crate::terminal::Terminal;
use anyhow::Result;
use tracing::info;

/// Read a multi-line message, stopping at the first blank line or at end of input.
pub fn read_message(terminal: &mut dyn Terminal) -> Result<String> {
    terminal.write_line("=== Spam Scanner ===")?;
    terminal.write_line("Enter the email message below.")?;
    terminal.write_line("When you are finished, press Enter on a blank line.\n")?;

    let mut lines = Vec::new();
    while let Some(line) = terminal.read_line("")? {
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }

    Ok(lines.join("\n").trim().to_string())
}

pub fn render(terminal: &mut dyn Terminal, result: &ScanResult) -> Result<()> {
    terminal.write_line("\n--- Results ---")?;
    terminal.write_line(&format!("Spam score: {}", result.score()))?;
    terminal.write_line(&format!("Likelihood rating: {}", result.rating()))?;

    if result.found().is_empty() {
        terminal.write_line("\nNo spam triggers were found in the message.")?;
        return Ok(());
    }

    terminal.write_line("\nTriggers found (trigger: count):")?;
    for (phrase, count) in result.ranked() {
        terminal.write_line(&format!("  - {}: {}", phrase, count))?;
    }
    Ok(())
}

/// Full session: read, scan, print.
pub fn run(terminal: &mut dyn Terminal, scanner: &TriggerScanner) -> Result<ExitCode> {
    info!(triggers = scanner.triggers().len(), "spam scanner started");

    let message = read_message(terminal)?;
    if message.is_empty() {
        terminal.write_line("\nNo message was entered. The program will now exit.")?;
        return Ok(0);
    }

    let result = scanner.scan(&message);
    info!(score = result.score(), rating = %result.rating(), "message scanned");
    render(terminal, &result)?;
    Ok(0)
}
