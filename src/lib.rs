//! `declarg` is a declarative command line parser for Rust.
//!
//! A program declares its parameters up front, in a [`Registry`], and receives a [`ParsedResult`] of plain values back.
//! `declarg` prioritizes the following concerns:
//! * *Declarative parameters*:
//! Options (`-n`, `--num`) and positional arguments are described by kind, default, choices and validator.
//! Declarations are checked as they are made, so a malformed parser is rejected before it ever sees a token.
//! * *Typed values*:
//! Every token is converted to its declared [`Kind`] (int, float, str, bool, or a list of one of these).
//! The user should not call any `&str -> T` conversion functions directly.
//! * *Sub-commands*:
//! Each sub-command is its own [`Registry`], and its result is nested under the parent result.
//! * *Layered values*:
//! A value is supplied explicitly on the command line, else by a JSON [`Config`], else by its default.
//! The [`Provenance`] of every value is retained, and the dependency rules (`requires`, `conflicts`) are checked against it.
//! * *Replaceable messages*:
//! Every error has an [`ErrorKind`] with a stable key, and its text comes from a [`Messages`] catalog which may be overridden.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/demo_summer.rs")]
//! ```
//!
//! ```console
//! $ summer -h
//! usage: summer [-h] [-i ITEM ...] [START]
//!
//! Sum some integers.
//!
//! positional arguments:
//!  START                          The initial total. [int, default: 0]
//!
//! options:
//!  -h, --help                     Show this help message and exit.
//!  -i ITEM ..., --item ITEM ...   The items to sum. [list[int]]
//!
//! $ summer -i 1 -i 2 --item 3 10
//! Sum: 16
//!
//! $ summer -i blah
//! Parse error: Value 'blah' at index 0 of '-i' should be of type int
//! ```
//!
//! # Declarations
//! Options are created from a kind constructor ([`OptionSpec::int`], [`OptionSpec::list`], etc), and need at least a short or a long alias.
//! The *canonical name* of an option is its long alias (if present), otherwise its short alias.
//! Results may be queried by any alias; the long alias may also be spelled with `_` in place of `-`.
//!
//! Positionals are either [`PositionalSpec::required`] or [`PositionalSpec::optional`].
//! Required positionals must precede optional ones, and are filled in declaration order.
//!
//! # Token syntax
//! * `--name value`, `--name=value` and `-n value` supply a value.
//! * Short flags cluster: `-abc` is `-a -b -c`; only the last flag in a cluster may take a value, from the next token (`-vn 5`).
//!   A value is never attached to a short flag, so `-n5` and `-n=5` are errors.
//! * A bool option with a default of `true` may be negated: `--no-name`.
//! * List options take one value per occurrence, and repeat: `-f a -f b`.
//! * `--` ends option parsing; all following tokens are positionals.
//!
//! # Sub-commands
//! ```no_run
#![doc = include_str!("../demos/demo_sub_command.rs")]
//! ```
//!
//! # Config files
//! ```no_run
#![doc = include_str!("../demos/demo_config.rs")]
//! ```
//!
//! # Features
//! * `unit_test`: exposes `CommandLineParser::in_memory_interface`, capturing help and error output.
//! * `tracing_debug`: emits `tracing::debug!` events during declaration and parsing.
pub use declarg_engine::*;
