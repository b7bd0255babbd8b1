//! Declarative command-line definitions.
//!
//! A [`CommandDefinition`] lists subcommands, each with typed options, ordered
//! positional parameters and a handler. Running it against an argument vector
//! tokenizes and validates the arguments, binds them onto a fresh options
//! value and calls the handler. Invalid input renders a usage block and runs
//! the configured error action.
//!
//! ```
//! use clidef::{Configuration, BufferOutput, definition, option, parameter, subcommand, switch};
//!
//! #[derive(Default)]
//! struct Build {
//!     project: i64,
//!     verbose: bool,
//!     target: String,
//! }
//!
//! let output = BufferOutput::new();
//! let cli = definition()
//!     .name("tool")
//!     .configuration(Configuration::new().with_output(output.clone()))
//!     .subcommand(
//!         subcommand::<Build>("build")
//!             .description("Build a project")
//!             .option(option('p', |o: &mut Build, v: i64| o.project = v).long("project"))
//!             .option(switch('v', |o: &mut Build, v| o.verbose = v))
//!             .parameter(
//!                 parameter("target", |o: &mut Build, v: String| o.target = v)
//!                     .default_value("debug"),
//!             )
//!             .handler(|build, _| {
//!                 assert!(build.verbose);
//!                 assert_eq!(build.target, "debug");
//!                 Ok(build.project as i32)
//!             }),
//!     )
//!     .build()?;
//!
//! let args: Vec<String> = ["build", "-v", "-p", "7"].map(String::from).to_vec();
//! assert_eq!(cli.run(&args)?, 7);
//! assert_eq!(output.contents(), "");
//! # Ok::<(), clidef::Error>(())
//! ```

mod binder;
pub mod config;
pub mod definition;
pub mod error;
pub mod tokenizer;
pub mod usage;
pub mod value;

pub use config::{BufferOutput, Configuration, FALLBACK_WIDTH, Output, StdoutOutput, USAGE_EXIT_CODE};
pub use definition::{
    CommandDefinition, DEFAULT_SUBCOMMAND, DefinitionBuilder, OptionArg, OptionSpec, ParameterArg,
    ParameterSpec, SubcommandBuilder, SubcommandDefinition, definition, option, parameter,
    subcommand, switch,
};
pub use error::{DefinitionError, Error, Result, UsageError};
pub use tokenizer::{Parsed, Token, tokenize};
pub use value::{ConversionError, DataKind, DirPath, Value, ValueType};
