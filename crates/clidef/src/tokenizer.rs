//! Turning a raw argument vector into validated tokens.
//!
//! The scan is a single left-to-right pass over the arguments:
//! - the first argument selects the subcommand (differentiated mode only)
//! - `-x`, `--long` and switch chains `-abc` become option tokens
//! - everything else fills the declared parameters in order
//!
//! Exclusion groups, option defaults and parameter defaults are resolved
//! after the pass. Every violation is reported as a [`UsageError`].

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::definition::{CommandDefinition, DEFAULT_SUBCOMMAND, OptionSpec, SubcommandDefinition};
use crate::error::UsageError;
use crate::value::Value;

/// One validated unit of the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Subcommand(String),
    Option { letter: char, value: Value },
    Parameter { name: String, value: Value },
}

/// Outcome of a successful scan.
#[derive(Debug)]
pub enum Parsed<'d> {
    /// Run `subcommand` with `tokens`.
    Invocation {
        subcommand: &'d SubcommandDefinition,
        tokens: Vec<Token>,
    },
    /// Show usage for one subcommand, or for the whole definition.
    Help(Option<&'d SubcommandDefinition>),
    /// Show the definition's version.
    Version,
}

fn is_flag_shaped(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

/// Tokenize and validate `args` (without the program name) against
/// `definition`.
pub fn tokenize<'d>(
    definition: &'d CommandDefinition,
    args: &[String],
) -> Result<Parsed<'d>, UsageError> {
    let mut tokens = Vec::new();
    let (subcommand, rest) = if definition.has_differentiated_subcommands() {
        let Some((first, rest)) = args.split_first() else {
            return Err(UsageError::general("Subcommand is missing."));
        };
        if let Some(request) = whole_definition_request(definition, first, rest)? {
            return Ok(request);
        }
        if is_flag_shaped(first) {
            return Err(UsageError::general("Subcommand is missing."));
        }
        let Some(subcommand) = definition.subcommand(first) else {
            return Err(UsageError::general(format!("Unknown subcommand: {first}")));
        };
        tokens.push(Token::Subcommand(subcommand.name().to_string()));
        (subcommand, rest)
    } else {
        // `DefinitionBuilder::build` guarantees the default subcommand.
        let Some(subcommand) = definition.subcommand(DEFAULT_SUBCOMMAND) else {
            return Err(UsageError::general("Subcommand is missing."));
        };
        (subcommand, args)
    };
    debug!(subcommand = subcommand.name(), "subcommand resolved");

    let mut scanner = Scanner {
        definition,
        subcommand,
        tokens,
        groups: IndexMap::new(),
        seen: Vec::new(),
        next_parameter: 0,
    };
    match scanner.scan(rest)? {
        Some(request) => Ok(request),
        None => scanner.finish(),
    }
}

/// Help and version requests in the subcommand position.
fn whole_definition_request<'d>(
    definition: &'d CommandDefinition,
    first: &str,
    rest: &[String],
) -> Result<Option<Parsed<'d>>, UsageError> {
    if first == "--help" || first == "-h" {
        return Ok(Some(Parsed::Help(None)));
    }
    if definition.version().is_some() && (first == "--version" || first == "-V") {
        return Ok(Some(Parsed::Version));
    }
    if first == "help" && definition.subcommand("help").is_none() {
        let Some((name, extra)) = rest.split_first() else {
            return Ok(Some(Parsed::Help(None)));
        };
        let Some(subcommand) = definition.subcommand(name) else {
            return Err(UsageError::general(format!("Unknown subcommand: {name}")));
        };
        // `help <sub>` takes nothing else.
        if let Some(surplus) = extra.first() {
            return Err(UsageError::for_subcommand(
                subcommand.name(),
                format!("Too many parameters: {surplus}"),
            ));
        }
        return Ok(Some(Parsed::Help(Some(subcommand))));
    }
    Ok(None)
}

struct Scanner<'d> {
    definition: &'d CommandDefinition,
    subcommand: &'d SubcommandDefinition,
    tokens: Vec<Token>,
    /// Exclusion group -> letters of the options seen in it.
    groups: IndexMap<&'d str, Vec<char>>,
    seen: Vec<char>,
    next_parameter: usize,
}

impl<'d> Scanner<'d> {
    fn error(&self, message: impl Into<String>) -> UsageError {
        UsageError::for_subcommand(self.subcommand.name(), message)
    }

    fn parameters_started(&self) -> bool {
        self.next_parameter > 0
    }

    fn scan(&mut self, args: &[String]) -> Result<Option<Parsed<'d>>, UsageError> {
        let subcommand = self.subcommand;
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            i += 1;

            if !is_flag_shaped(arg) {
                self.accept_parameter(arg)?;
                continue;
            }
            if let Some(request) = self.builtin_request(arg) {
                return Ok(Some(request));
            }
            if self.parameters_started() {
                return Err(self.error("Order of options and parameters is wrong."));
            }

            if let Some(long) = arg.strip_prefix("--") {
                let Some(spec) = subcommand.option_by_long(long) else {
                    return Err(self.error(format!("Unknown option: {arg}")));
                };
                i += self.accept_option(spec, args.get(i))?;
                continue;
            }

            let letters = &arg[1..];
            let mut chars = letters.chars();
            if let (Some(letter), None) = (chars.next(), chars.next()) {
                let Some(spec) = subcommand.option(letter) else {
                    return Err(self.error(format!("Unknown option: {arg}")));
                };
                i += self.accept_option(spec, args.get(i))?;
                continue;
            }

            // `-dz` is `-d -z`, switches only.
            for letter in letters.chars() {
                let Some(spec) = subcommand
                    .option(letter)
                    .filter(|spec| spec.is_switch())
                else {
                    return Err(self.error(format!("Unknown switch: -{letter}")));
                };
                self.accept_option(spec, None)?;
            }
        }
        Ok(None)
    }

    /// `--help`/`-h` and `--version`/`-V`, unless the subcommand claims them.
    fn builtin_request(&self, arg: &str) -> Option<Parsed<'d>> {
        let claimed = |letter: char, long: &str| {
            self.subcommand.option(letter).is_some() || self.subcommand.option_by_long(long).is_some()
        };
        if (arg == "--help" && self.subcommand.option_by_long("help").is_none())
            || (arg == "-h" && !claimed('h', "help"))
        {
            return Some(Parsed::Help(Some(self.subcommand)));
        }
        if self.definition.version().is_some()
            && ((arg == "--version" && self.subcommand.option_by_long("version").is_none())
                || (arg == "-V" && !claimed('V', "version")))
        {
            return Some(Parsed::Version);
        }
        None
    }

    /// Record an option token; returns how many extra arguments were consumed.
    fn accept_option(
        &mut self,
        spec: &'d OptionSpec,
        next: Option<&String>,
    ) -> Result<usize, UsageError> {
        if self.seen.contains(&spec.letter()) {
            return Err(self.error(format!(
                "Option specified more than once: {}",
                spec.synopsis()
            )));
        }

        let (value, consumed) = if spec.is_switch() {
            (Value::Bool(true), 0)
        } else {
            let Some(raw) = next else {
                return Err(self.error(format!("Missing value for option {}", spec.synopsis())));
            };
            let value = spec.kind().parse(raw).map_err(|_| {
                self.error(format!(
                    "Value \"{raw}\" for option {} is invalid.",
                    spec.synopsis()
                ))
            })?;
            (value, 1)
        };

        for group in spec.exclusion_groups() {
            self.groups
                .entry(group.as_str())
                .or_default()
                .push(spec.letter());
        }
        trace!(option = %spec.letter(), value = %value, "option token");
        self.seen.push(spec.letter());
        self.tokens.push(Token::Option {
            letter: spec.letter(),
            value,
        });
        Ok(consumed)
    }

    fn accept_parameter(&mut self, raw: &str) -> Result<(), UsageError> {
        let subcommand = self.subcommand;
        let Some(spec) = subcommand.parameters().get(self.next_parameter) else {
            return Err(self.error(format!("Too many parameters: {raw}")));
        };
        let value = spec.kind().parse(raw).map_err(|_| {
            self.error(format!(
                "Value \"{raw}\" for parameter {} is invalid.",
                spec.synopsis()
            ))
        })?;
        trace!(parameter = spec.name(), value = %value, "parameter token");
        self.next_parameter += 1;
        self.tokens.push(Token::Parameter {
            name: spec.name().to_string(),
            value,
        });
        Ok(())
    }

    fn finish(mut self) -> Result<Parsed<'d>, UsageError> {
        let subcommand = self.subcommand;
        for (group, letters) in &self.groups {
            if letters.len() < 2 {
                continue;
            }
            let conflicting: Vec<String> = subcommand
                .options()
                .iter()
                .filter(|spec| spec.in_group(group) && letters.contains(&spec.letter()))
                .map(OptionSpec::synopsis)
                .collect();
            return Err(self.error(format!(
                "Mutually exclusive options: {}",
                conflicting.join(", ")
            )));
        }

        for spec in subcommand.options() {
            if self.seen.contains(&spec.letter()) {
                continue;
            }
            if let Some(default) = spec.default_value() {
                trace!(option = %spec.letter(), value = %default, "option default");
                self.tokens.push(Token::Option {
                    letter: spec.letter(),
                    value: default.clone(),
                });
                continue;
            }
            if spec.is_switch() {
                continue;
            }
            let satisfied = spec
                .exclusion_groups()
                .iter()
                .any(|group| self.groups.contains_key(group.as_str()));
            if !satisfied {
                return Err(self.error(format!("Missing option: {}", spec.synopsis())));
            }
        }

        for spec in &subcommand.parameters()[self.next_parameter..] {
            let Some(default) = spec.default_value() else {
                return Err(self.error(format!("Missing parameter: {}", spec.name())));
            };
            trace!(parameter = spec.name(), value = %default, "parameter default");
            self.tokens.push(Token::Parameter {
                name: spec.name().to_string(),
                value: default.clone(),
            });
        }

        Ok(Parsed::Invocation {
            subcommand,
            tokens: self.tokens,
        })
    }
}
