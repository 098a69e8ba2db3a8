use crate::expenses;
use crate::spam::{self, TriggerList, TriggerScanner};
use crate::terminal::Terminal;
use crate::tickets::{self, PresaleConfig, Variant};
use anyhow::Result;
use argh::FromArgs;
use std::path::PathBuf;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// An interactive program that can be launched from the command line.
///
/// Implementors are parsed with [`argh`] (`FromArgs`) and then run against a
/// [`Terminal`].
pub trait Exercise {
    /// Run the program to completion.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for error.
    fn execute(self, terminal: &mut dyn Terminal) -> Result<ExitCode>;
}

#[derive(FromArgs)]
/// Small interactive console exercises: ticket pre-sale, expense analyzer and
/// spam scanner.
pub struct Cli {
    #[argh(switch, short = 'v')]
    /// log debug output to stderr.
    pub verbose: bool,

    #[argh(subcommand)]
    pub command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Tickets(Tickets),
    Expenses(Expenses),
    Spam(Spam),
}

impl Exercise for Command {
    fn execute(self, terminal: &mut dyn Terminal) -> Result<ExitCode> {
        match self {
            Command::Tickets(cmd) => cmd.execute(terminal),
            Command::Expenses(cmd) => cmd.execute(terminal),
            Command::Spam(cmd) => cmd.execute(terminal),
        }
    }
}

#[derive(FromArgs)]
/// Pre-sell a limited stock of cinema tickets.
#[argh(subcommand, name = "tickets")]
pub struct Tickets {
    #[argh(option, default = "Variant::Strict")]
    /// validation rules: `strict` (fixed range, separate stock check) or
    /// `clamped` (range shrinks to the remaining stock).
    pub variant: Variant,

    #[argh(option, default = "20")]
    /// number of tickets on sale.
    pub total: u32,

    #[argh(option, default = "4")]
    /// maximum tickets per buyer.
    pub max_per_buyer: u32,
}

impl Exercise for Tickets {
    fn execute(self, terminal: &mut dyn Terminal) -> Result<ExitCode> {
        let config = PresaleConfig {
            total: self.total,
            max_per_buyer: self.max_per_buyer,
            variant: self.variant,
        };
        tickets::run(terminal, config)
    }
}

#[derive(FromArgs)]
/// Summarize monthly expenses: total, highest and lowest.
#[argh(subcommand, name = "expenses")]
pub struct Expenses {
    #[argh(option, default = "String::from(\"done\")")]
    /// expense type that ends input.
    pub sentinel: String,
}

impl Exercise for Expenses {
    fn execute(self, terminal: &mut dyn Terminal) -> Result<ExitCode> {
        expenses::run(terminal, &self.sentinel)
    }
}

#[derive(FromArgs)]
/// Rate how likely a message is to be spam.
#[argh(subcommand, name = "spam")]
pub struct Spam {
    #[argh(option)]
    /// file with one trigger phrase per line, replacing the built-in list.
    pub triggers: Option<PathBuf>,
}

impl Exercise for Spam {
    fn execute(self, terminal: &mut dyn Terminal) -> Result<ExitCode> {
        let triggers = match &self.triggers {
            Some(path) => TriggerList::from_file(path)?,
            None => TriggerList::default(),
        };
        spam::report::run(terminal, &TriggerScanner::new(triggers))
    }
}
