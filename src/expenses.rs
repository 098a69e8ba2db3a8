//! Monthly expense analyzer.

use crate::command::ExitCode;
use crate::terminal::{Terminal, read_valid};
use anyhow::Result;
use std::fmt;
use tracing::{debug, info};

/// One expense entry: its type and amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub kind: String,
    pub amount: f64,
}

impl Expense {
    pub fn new(kind: impl Into<String>, amount: f64) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }
}

/// Total plus the highest and lowest entries of a non-empty expense list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary<'a> {
    pub total: f64,
    pub highest: &'a Expense,
    pub lowest: &'a Expense,
}

/// Sum of all amounts; 0 for an empty list.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().fold(0.0, |acc, e| acc + e.amount)
}

/// Largest expense. On a tie the later entry wins.
pub fn highest(expenses: &[Expense]) -> Option<&Expense> {
    expenses
        .iter()
        .reduce(|x, y| if x.amount > y.amount { x } else { y })
}

/// Smallest expense. On a tie the later entry wins.
pub fn lowest(expenses: &[Expense]) -> Option<&Expense> {
    expenses
        .iter()
        .reduce(|x, y| if x.amount < y.amount { x } else { y })
}

/// `None` when no expenses were entered.
pub fn summarize(expenses: &[Expense]) -> Option<ExpenseSummary<'_>> {
    Some(ExpenseSummary {
        total: total(expenses),
        highest: highest(expenses)?,
        lowest: lowest(expenses)?,
    })
}

/// Amount input that is not a finite number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountError;

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Please enter a numeric amount (example: 12.50).")
    }
}

impl std::error::Error for AmountError {}

/// Parse a finite decimal amount.
///
/// Single underscores between digits are accepted as group separators
/// (`1_000.50`).
pub fn parse_amount(raw: &str) -> std::result::Result<f64, AmountError> {
    let digits = strip_digit_separators(raw.trim()).ok_or(AmountError)?;
    match digits.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(AmountError),
    }
}

/// Drop each `_` that sits between two ASCII digits; any other `_` is invalid.
fn strip_digit_separators(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    for (i, ch) in raw.char_indices() {
        if ch == '_' {
            let before = i.checked_sub(1).and_then(|j| bytes.get(j));
            let after = bytes.get(i + 1);
            match (before, after) {
                (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => continue,
                _ => return None,
            }
        }
        out.push(ch);
    }
    Some(out)
}

/// Collect expenses until the user types `sentinel` (any case) as the type,
/// or input runs out.
pub fn read_expenses(terminal: &mut dyn Terminal, sentinel: &str) -> Result<Vec<Expense>> {
    terminal.write_line("=== Monthly Expense Analyzer ===")?;
    terminal.write_line(&format!(
        "Enter '{}' as the expense type when finished.\n",
        sentinel
    ))?;

    let mut expenses = Vec::new();
    while let Some(line) = terminal.read_line("Enter expense type: ")? {
        let kind = line.trim();
        if kind.eq_ignore_ascii_case(sentinel) {
            break;
        }

        let prompt = format!("Enter amount for {}: $", kind);
        let amount = read_valid(terminal, &prompt, parse_amount)?;
        debug!(kind, amount, "expense recorded");
        expenses.push(Expense::new(kind, amount));
    }

    Ok(expenses)
}

pub fn render(terminal: &mut dyn Terminal, summary: &ExpenseSummary<'_>) -> Result<()> {
    terminal.write_line("\n--- Expense Summary ---")?;
    terminal.write_line(&format!("Total Monthly Expense: ${:.2}", summary.total))?;
    terminal.write_line(&format!(
        "Highest Expense: {} - ${:.2}",
        summary.highest.kind, summary.highest.amount
    ))?;
    terminal.write_line(&format!(
        "Lowest Expense: {} - ${:.2}",
        summary.lowest.kind, summary.lowest.amount
    ))?;
    Ok(())
}

pub fn run(terminal: &mut dyn Terminal, sentinel: &str) -> Result<ExitCode> {
    info!("expense analyzer started");
    let expenses = read_expenses(terminal, sentinel)?;

    match summarize(&expenses) {
        Some(summary) => {
            info!(count = expenses.len(), total = summary.total, "expenses summarized");
            render(terminal, &summary)?;
        }
        None => terminal.write_line("No expenses were entered.")?,
    }
    Ok(0)
}
