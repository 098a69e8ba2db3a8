//! Cinema ticket pre-sale.
//!
//! A fixed stock of tickets is sold to buyers one transaction at a time until
//! nothing is left. Two validation variants are supported:
//!
//! - [`Variant::Strict`]: a request must be within `1..=max_per_buyer`, and is
//!   separately rejected when it exceeds the remaining stock.
//! - [`Variant::Clamped`]: the allowed range shrinks to
//!   `1..=min(max_per_buyer, remaining)` and one message covers both cases.

use crate::command::ExitCode;
use crate::terminal::{Terminal, read_valid};
use anyhow::{Result, bail};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Validation rules for a ticket request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Strict,
    Clamped,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Variant::Strict),
            "clamped" => Ok(Variant::Clamped),
            other => Err(format!("unknown variant `{}` (expected strict or clamped)", other)),
        }
    }
}

/// Stock size, per-buyer limit and validation rules for one pre-sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresaleConfig {
    pub total: u32,
    pub max_per_buyer: u32,
    pub variant: Variant,
}

impl Default for PresaleConfig {
    fn default() -> Self {
        Self {
            total: 20,
            max_per_buyer: 4,
            variant: Variant::Strict,
        }
    }
}

impl PresaleConfig {
    /// Reject a configuration that could never sell a ticket.
    pub fn validate(&self) -> Result<()> {
        if self.total == 0 {
            bail!("total tickets must be at least 1");
        }
        if self.max_per_buyer == 0 {
            bail!("tickets per buyer must be at least 1");
        }
        Ok(())
    }
}

/// Why a ticket request was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketRequestError {
    /// Input was not a whole number.
    NotANumber { variant: Variant, max: u32 },
    /// Outside `1..=max`.
    OutOfRange { variant: Variant, max: u32 },
    /// More than what is left (strict variant only).
    ExceedsRemaining { remaining: u32 },
}

impl fmt::Display for TicketRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketRequestError::NotANumber {
                variant: Variant::Strict,
                max,
            } => {
                let examples: Vec<String> = (1..=*max).map(|n| n.to_string()).collect();
                write!(f, "Please enter a whole number (example: {}).", examples.join(", "))
            }
            TicketRequestError::NotANumber {
                variant: Variant::Clamped,
                ..
            } => write!(f, "Please enter a whole number (example: 2)."),
            TicketRequestError::OutOfRange {
                variant: Variant::Strict,
                max,
            } => write!(f, "Each buyer can purchase 1 to {} tickets.", max),
            TicketRequestError::OutOfRange {
                variant: Variant::Clamped,
                max,
            } => write!(f, "Invalid amount. You can buy between 1 and {} tickets.", max),
            TicketRequestError::ExceedsRemaining { remaining } => write!(
                f,
                "Only {} ticket(s) remain. Please enter {} or less.",
                remaining, remaining
            ),
        }
    }
}

impl std::error::Error for TicketRequestError {}

/// Optional sign followed by at least one ASCII digit.
fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Ticket stock and buyer count for one pre-sale.
#[derive(Debug, Clone)]
pub struct Presale {
    config: PresaleConfig,
    remaining: u32,
    buyers: u32,
}

impl Presale {
    /// Start a pre-sale with the full stock and no buyers.
    pub fn new(config: PresaleConfig) -> Self {
        Self {
            config,
            remaining: config.total,
            buyers: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn buyers(&self) -> u32 {
        self.buyers
    }

    pub fn sold(&self) -> u32 {
        self.config.total - self.remaining
    }

    pub fn is_sold_out(&self) -> bool {
        self.remaining == 0
    }

    /// Largest request the next buyer may make.
    pub fn max_allowed(&self) -> u32 {
        match self.config.variant {
            Variant::Strict => self.config.max_per_buyer,
            Variant::Clamped => self.config.max_per_buyer.min(self.remaining),
        }
    }

    pub fn prompt(&self) -> String {
        match self.config.variant {
            Variant::Strict => format!(
                "How many tickets would you like to buy (1-{})? Tickets remaining: {} >>> ",
                self.config.max_per_buyer, self.remaining
            ),
            Variant::Clamped => format!(
                "How many tickets would you like to buy (1-{})? ",
                self.max_allowed()
            ),
        }
    }

    /// Check a requested amount against the current stock.
    pub fn check(&self, requested: i64) -> std::result::Result<u32, TicketRequestError> {
        let variant = self.config.variant;
        let max = self.max_allowed();
        if requested < 1 || requested > i64::from(max) {
            return Err(TicketRequestError::OutOfRange { variant, max });
        }
        let requested = requested as u32;
        if requested > self.remaining {
            return Err(TicketRequestError::ExceedsRemaining {
                remaining: self.remaining,
            });
        }
        Ok(requested)
    }

    /// Parse and check raw buyer input.
    pub fn validate_request(&self, raw: &str) -> std::result::Result<u32, TicketRequestError> {
        let raw = raw.trim();
        let requested: i64 = match raw.parse() {
            Ok(n) => n,
            // A whole number too large for i64 is still a number, just out of range.
            Err(_) if is_integer_literal(raw) => {
                return Err(TicketRequestError::OutOfRange {
                    variant: self.config.variant,
                    max: self.max_allowed(),
                });
            }
            Err(_) => {
                return Err(TicketRequestError::NotANumber {
                    variant: self.config.variant,
                    max: self.max_allowed(),
                });
            }
        };
        self.check(requested)
    }

    /// Sell `requested` tickets to one buyer and return what is left.
    pub fn purchase(&mut self, requested: u32) -> std::result::Result<u32, TicketRequestError> {
        let requested = self.check(i64::from(requested))?;
        self.remaining -= requested;
        self.buyers += 1;
        debug!(requested, remaining = self.remaining, buyers = self.buyers, "purchase accepted");
        Ok(self.remaining)
    }
}

/// Run the pre-sale until every ticket is sold.
pub fn run(terminal: &mut dyn Terminal, config: PresaleConfig) -> Result<ExitCode> {
    config.validate()?;
    info!(total = config.total, max_per_buyer = config.max_per_buyer, variant = ?config.variant, "pre-sale started");

    let mut presale = Presale::new(config);
    terminal.write_line("Cinema Ticket Pre-Sale")?;
    terminal.write_line(&"-".repeat(22))?;

    while !presale.is_sold_out() {
        let prompt = presale.prompt();
        let requested = read_valid(terminal, &prompt, |raw| presale.validate_request(raw))?;
        let remaining = presale.purchase(requested)?;

        match config.variant {
            Variant::Strict => {
                terminal.write_line(&format!("Purchase complete! Tickets remaining: {}\n", remaining))?
            }
            Variant::Clamped => {
                terminal.write_line(&format!("Tickets remaining: {}", remaining))?;
                if remaining == 0 {
                    terminal.write_line("All tickets have been sold.")?;
                }
            }
        }
    }

    match config.variant {
        Variant::Strict => terminal.write_line(&format!(
            "Sold out! Total number of buyers: {}",
            presale.buyers()
        ))?,
        Variant::Clamped => {
            terminal.write_line(&format!("Total number of buyers: {}", presale.buyers()))?
        }
    }

    info!(buyers = presale.buyers(), "pre-sale finished");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::MemTerminal;

    fn config(variant: Variant) -> PresaleConfig {
        PresaleConfig {
            variant,
            ..PresaleConfig::default()
        }
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("strict".parse::<Variant>(), Ok(Variant::Strict));
        assert_eq!("Clamped".parse::<Variant>(), Ok(Variant::Clamped));
        assert!("lenient".parse::<Variant>().is_err());
    }

    #[test]
    fn test_config_rejects_zero_values() {
        let zero_total = PresaleConfig {
            total: 0,
            ..PresaleConfig::default()
        };
        assert!(zero_total.validate().is_err());

        let zero_max = PresaleConfig {
            max_per_buyer: 0,
            ..PresaleConfig::default()
        };
        assert!(zero_max.validate().is_err());
        assert!(PresaleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_strict_validation() {
        let mut presale = Presale::new(config(Variant::Strict));
        assert_eq!(presale.validate_request(" 3 "), Ok(3));
        assert_eq!(
            presale.validate_request("two"),
            Err(TicketRequestError::NotANumber {
                variant: Variant::Strict,
                max: 4
            })
        );
        assert_eq!(
            presale.validate_request("5"),
            Err(TicketRequestError::OutOfRange {
                variant: Variant::Strict,
                max: 4
            })
        );
        assert!(presale.validate_request("0").is_err());
        assert!(presale.validate_request("-1").is_err());

        for _ in 0..4 {
            presale.purchase(4).unwrap();
        }
        presale.purchase(2).unwrap();
        assert_eq!(presale.remaining(), 2);
        assert_eq!(
            presale.validate_request("3"),
            Err(TicketRequestError::ExceedsRemaining { remaining: 2 })
        );
    }

    #[test]
    fn test_clamped_validation_shrinks_range() {
        let mut presale = Presale::new(config(Variant::Clamped));
        assert_eq!(presale.max_allowed(), 4);
        for _ in 0..4 {
            presale.purchase(4).unwrap();
        }
        presale.purchase(3).unwrap();
        assert_eq!(presale.max_allowed(), 1);
        assert_eq!(
            presale.validate_request("2"),
            Err(TicketRequestError::OutOfRange {
                variant: Variant::Clamped,
                max: 1
            })
        );
        assert_eq!(presale.prompt(), "How many tickets would you like to buy (1-1)? ");
    }

    #[test]
    fn test_purchase_keeps_stock_consistent() {
        let mut presale = Presale::new(config(Variant::Strict));
        assert!(presale.purchase(0).is_err());
        assert!(presale.purchase(5).is_err());
        assert_eq!(presale.buyers(), 0);

        assert_eq!(presale.purchase(4), Ok(16));
        assert_eq!(presale.purchase(1), Ok(15));
        assert_eq!(presale.sold() + presale.remaining(), 20);
        assert_eq!(presale.buyers(), 2);
    }

    #[test]
    fn test_huge_whole_number_is_out_of_range() {
        let strict = Presale::new(config(Variant::Strict));
        assert_eq!(
            strict.validate_request("99999999999999999999"),
            Err(TicketRequestError::OutOfRange {
                variant: Variant::Strict,
                max: 4
            })
        );
        assert_eq!(
            strict.validate_request("-99999999999999999999"),
            Err(TicketRequestError::OutOfRange {
                variant: Variant::Strict,
                max: 4
            })
        );

        let clamped = Presale::new(config(Variant::Clamped));
        assert_eq!(
            clamped
                .validate_request(" +99999999999999999999 ")
                .unwrap_err()
                .to_string(),
            "Invalid amount. You can buy between 1 and 4 tickets."
        );

        for raw in ["+", "-", "12a", "1.5", ""] {
            assert!(matches!(
                clamped.validate_request(raw),
                Err(TicketRequestError::NotANumber { .. })
            ));
        }
    }

    #[test]
    fn test_strict_examples_follow_max_per_buyer() {
        let presale = Presale::new(PresaleConfig {
            max_per_buyer: 6,
            ..config(Variant::Strict)
        });
        assert_eq!(
            presale.validate_request("six").unwrap_err().to_string(),
            "Please enter a whole number (example: 1, 2, 3, 4, 5, 6)."
        );
        let small = Presale::new(PresaleConfig {
            max_per_buyer: 2,
            ..config(Variant::Strict)
        });
        assert_eq!(
            small.validate_request("x").unwrap_err().to_string(),
            "Please enter a whole number (example: 1, 2)."
        );
    }

    #[test]
    fn test_error_messages() {
        let msg = |e: TicketRequestError| e.to_string();
        assert_eq!(
            msg(TicketRequestError::NotANumber {
                variant: Variant::Strict,
                max: 4
            }),
            "Please enter a whole number (example: 1, 2, 3, 4)."
        );
        assert_eq!(
            msg(TicketRequestError::NotANumber {
                variant: Variant::Clamped,
                max: 3
            }),
            "Please enter a whole number (example: 2)."
        );
        assert_eq!(
            msg(TicketRequestError::OutOfRange {
                variant: Variant::Strict,
                max: 4
            }),
            "Each buyer can purchase 1 to 4 tickets."
        );
        assert_eq!(
            msg(TicketRequestError::OutOfRange {
                variant: Variant::Clamped,
                max: 2
            }),
            "Invalid amount. You can buy between 1 and 2 tickets."
        );
        assert_eq!(
            msg(TicketRequestError::ExceedsRemaining { remaining: 1 }),
            "Only 1 ticket(s) remain. Please enter 1 or less."
        );
    }

    #[test]
    fn test_strict_session_transcript() {
        let cfg = PresaleConfig {
            total: 5,
            ..config(Variant::Strict)
        };
        let mut term = MemTerminal::from_lines(&["x", "4", "3", "1"]);
        let code = run(&mut term, cfg).unwrap();
        assert_eq!(code, 0);

        let p = |r: u32| format!("How many tickets would you like to buy (1-4)? Tickets remaining: {} >>> ", r);
        let expected = format!(
            "Cinema Ticket Pre-Sale\n\
            ----------------------\n\
            {p5}Please enter a whole number (example: 1, 2, 3, 4).\n\
            {p5}Purchase complete! Tickets remaining: 1\n\n\
            {p1}Only 1 ticket(s) remain. Please enter 1 or less.\n\
            {p1}Purchase complete! Tickets remaining: 0\n\n\
            Sold out! Total number of buyers: 2\n",
            p5 = p(5),
            p1 = p(1)
        );
        assert_eq!(term.transcript(), expected);
    }

    #[test]
    fn test_clamped_session_transcript() {
        let cfg = PresaleConfig {
            total: 6,
            ..config(Variant::Clamped)
        };
        let mut term = MemTerminal::from_lines(&["4", "3", "2"]);
        run(&mut term, cfg).unwrap();

        let expected = "Cinema Ticket Pre-Sale\n\
            ----------------------\n\
            How many tickets would you like to buy (1-4)? Tickets remaining: 2\n\
            How many tickets would you like to buy (1-2)? \
            Invalid amount. You can buy between 1 and 2 tickets.\n\
            How many tickets would you like to buy (1-2)? Tickets remaining: 0\n\
            All tickets have been sold.\n\
            Total number of buyers: 2\n";
        assert_eq!(term.transcript(), expected);
    }

    #[test]
    fn test_default_session_sells_everything() {
        let mut term = MemTerminal::from_lines(&["4"; 5]);
        run(&mut term, PresaleConfig::default()).unwrap();
        assert!(term.transcript().ends_with("Sold out! Total number of buyers: 5\n"));
    }

    #[test]
    fn test_session_fails_when_input_closes_early() {
        let mut term = MemTerminal::from_lines(&["4"]);
        let err = run(&mut term, PresaleConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "input closed");
    }
}
