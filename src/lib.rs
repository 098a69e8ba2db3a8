//! A handful of small interactive console programs.
//!
//! Each program is a plain function over a [`terminal::Terminal`], so it can be
//! driven by a real line editor or by an in-memory script in tests:
//!
//! - [`tickets`]: cinema ticket pre-sale with two validation variants.
//! - [`expenses`]: monthly expense analyzer (total, highest, lowest).
//! - [`spam`]: keyword-based spam-likelihood scanner.
//!
//! The [`command`] module exposes the `argh` command line used by the
//! `exercises` binary.

pub mod command;
pub mod expenses;
pub mod spam;
pub mod terminal;
pub mod tickets;
