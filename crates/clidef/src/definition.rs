//! The definition model and its builders.
//!
//! A [`CommandDefinition`] owns its subcommands; each subcommand owns its
//! option and parameter specs plus the binders and handler that turn tokens
//! into a typed options value. Everything here is immutable once built.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::path::Path;

use clidef_metadata::{DefinitionMeta, OptionMeta, ParameterMeta, SubcommandMeta};
use tracing::debug;

use crate::binder::{Binder, Dispatch, Handler, HandlerFuture, Invoke, Setter, setter};
use crate::config::Configuration;
use crate::error::{DefinitionError, Error, Result};
use crate::tokenizer::{self, Parsed};
use crate::usage;
use crate::value::{DataKind, Value, ValueType};

/// Name of the implicit subcommand used without differentiated subcommands.
pub const DEFAULT_SUBCOMMAND: &str = "default";

/// Name used when neither a name nor an executable path is available.
const FALLBACK_NAME: &str = "command";

#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    letter: char,
    long_name: Option<String>,
    description: String,
    kind: DataKind,
    default_value: Option<Value>,
    exclusion_groups: Vec<String>,
}

impl OptionSpec {
    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn exclusion_groups(&self) -> &[String] {
        &self.exclusion_groups
    }

    pub fn is_switch(&self) -> bool {
        self.kind.is_switch()
    }

    pub fn is_required(&self) -> bool {
        !self.is_switch() && self.default_value.is_none()
    }

    /// `-p, --project-number`
    pub fn names(&self) -> String {
        match &self.long_name {
            Some(long) => format!("-{}, --{long}", self.letter),
            None => format!("-{}", self.letter),
        }
    }

    /// Long form used in usage lines and error messages:
    /// `[-p, --project-number <int>]`, `[-m, --memory <string="1 GB">]`, `[-d]`.
    pub fn synopsis(&self) -> String {
        let mut out = format!("[{}", self.names());
        if !self.is_switch() {
            out.push_str(" <");
            out.push_str(self.kind.name());
            if let Some(default) = &self.default_value {
                out.push('=');
                out.push_str(&default.literal());
            }
            out.push('>');
        }
        out.push(']');
        out
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.exclusion_groups.iter().any(|g| g == group)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    description: String,
    kind: DataKind,
    default_value: Option<Value>,
}

impl ParameterSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.default_value.is_none()
    }

    /// `<dummy:string>`, used in conversion errors.
    pub fn synopsis(&self) -> String {
        format!("<{}:{}>", self.name, self.kind.name())
    }

    /// `<dummy>` or `[<dummy>]`, used in the usage line.
    pub fn usage_item(&self) -> String {
        if self.is_required() {
            format!("<{}>", self.name)
        } else {
            format!("[<{}>]", self.name)
        }
    }
}

/// Create an option bound through `bind`. The argument type of `bind` decides
/// the option's data kind; `bool` makes it a switch.
pub fn option<O, T, F>(letter: char, bind: F) -> OptionArg<O, T>
where
    O: 'static,
    T: ValueType,
    F: Fn(&mut O, T) + Send + Sync + 'static,
{
    OptionArg {
        spec: OptionSpec {
            letter,
            long_name: None,
            description: String::new(),
            kind: T::KIND,
            default_value: None,
            exclusion_groups: Vec::new(),
        },
        setter: setter(bind),
        _value: PhantomData,
    }
}

/// Create a switch (boolean option without a value token).
pub fn switch<O, F>(letter: char, bind: F) -> OptionArg<O, bool>
where
    O: 'static,
    F: Fn(&mut O, bool) + Send + Sync + 'static,
{
    option(letter, bind)
}

/// Create a positional parameter bound through `bind`.
pub fn parameter<O, T, F>(name: impl Into<String>, bind: F) -> ParameterArg<O, T>
where
    O: 'static,
    T: ValueType,
    F: Fn(&mut O, T) + Send + Sync + 'static,
{
    ParameterArg {
        spec: ParameterSpec {
            name: name.into(),
            description: String::new(),
            kind: T::KIND,
            default_value: None,
        },
        setter: setter(bind),
        _value: PhantomData,
    }
}

/// Builder for an [`OptionSpec`] together with its binder.
pub struct OptionArg<O, T> {
    spec: OptionSpec,
    setter: Setter<O>,
    _value: PhantomData<fn() -> T>,
}

impl<O, T: ValueType> OptionArg<O, T> {
    pub fn long(mut self, long_name: impl Into<String>) -> Self {
        self.spec.long_name = Some(long_name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = description.into();
        self
    }

    /// Make the option optional with this value when omitted.
    pub fn default_value(mut self, value: impl Into<T>) -> Self {
        self.spec.default_value = Some(value.into().into_value());
        self
    }

    pub fn exclusion_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        if !self.spec.exclusion_groups.contains(&group) {
            self.spec.exclusion_groups.push(group);
        }
        self
    }
}

/// Builder for a [`ParameterSpec`] together with its binder.
pub struct ParameterArg<O, T> {
    spec: ParameterSpec,
    setter: Setter<O>,
    _value: PhantomData<fn() -> T>,
}

impl<O, T: ValueType> ParameterArg<O, T> {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = description.into();
        self
    }

    /// Make the parameter optional with this value when omitted.
    pub fn default_value(mut self, value: impl Into<T>) -> Self {
        self.spec.default_value = Some(value.into().into_value());
        self
    }
}

/// Start a subcommand whose handler receives an `O`.
pub fn subcommand<O>(name: impl Into<String>) -> SubcommandBuilder<O>
where
    O: Default + Send + 'static,
{
    SubcommandBuilder {
        name: name.into(),
        description: String::new(),
        options: Vec::new(),
        parameters: Vec::new(),
        option_setters: Vec::new(),
        parameter_setters: Vec::new(),
    }
}

pub struct SubcommandBuilder<O> {
    name: String,
    description: String,
    options: Vec<OptionSpec>,
    parameters: Vec<ParameterSpec>,
    option_setters: Vec<(char, Setter<O>)>,
    parameter_setters: Vec<(String, Setter<O>)>,
}

impl<O> SubcommandBuilder<O>
where
    O: Default + Send + 'static,
{
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn option<T: ValueType>(mut self, arg: OptionArg<O, T>) -> Self {
        self.option_setters.push((arg.spec.letter, arg.setter));
        self.options.push(arg.spec);
        self
    }

    pub fn parameter<T: ValueType>(mut self, arg: ParameterArg<O, T>) -> Self {
        self.parameter_setters
            .push((arg.spec.name.clone(), arg.setter));
        self.parameters.push(arg.spec);
        self
    }

    /// Finish with a synchronous handler returning the exit code.
    pub fn handler<F>(self, handler: F) -> SubcommandDefinition
    where
        F: Fn(O, &CommandDefinition) -> anyhow::Result<i32> + Send + Sync + 'static,
    {
        self.finish(Handler::Sync(Box::new(handler)))
    }

    /// Finish with an asynchronous handler. The engine awaits the returned
    /// future; it must not borrow the definition.
    pub fn async_handler<F, Fut>(self, handler: F) -> SubcommandDefinition
    where
        F: Fn(O, &CommandDefinition) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<i32>> + Send + 'static,
    {
        self.finish(Handler::Async(Box::new(
            move |options: O, definition: &CommandDefinition| -> HandlerFuture {
                Box::pin(handler(options, definition))
            },
        )))
    }

    fn finish(self, handler: Handler<O>) -> SubcommandDefinition {
        SubcommandDefinition {
            name: self.name,
            description: self.description,
            options: self.options,
            parameters: self.parameters,
            invoker: Box::new(Binder::new(
                self.option_setters,
                self.parameter_setters,
                handler,
            )),
        }
    }
}

pub struct SubcommandDefinition {
    name: String,
    description: String,
    options: Vec<OptionSpec>,
    parameters: Vec<ParameterSpec>,
    invoker: Box<dyn Invoke>,
}

impl fmt::Debug for SubcommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubcommandDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("parameters", &self.parameters)
            .field("asynchronous", &self.is_async())
            .finish()
    }
}

impl SubcommandDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn option(&self, letter: char) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.letter == letter)
    }

    pub fn option_by_long(&self, long_name: &str) -> Option<&OptionSpec> {
        self.options
            .iter()
            .find(|o| o.long_name.as_deref() == Some(long_name))
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_async(&self) -> bool {
        self.invoker.is_async()
    }

    fn validate(&self) -> std::result::Result<(), DefinitionError> {
        let subcommand = || self.name.clone();

        let mut letters = HashSet::new();
        let mut long_names = HashSet::new();
        for spec in &self.options {
            if !spec.letter.is_ascii_alphanumeric() {
                return Err(DefinitionError::InvalidLetter {
                    subcommand: subcommand(),
                    letter: spec.letter,
                });
            }
            if !letters.insert(spec.letter) {
                return Err(DefinitionError::DuplicateLetter {
                    subcommand: subcommand(),
                    letter: spec.letter,
                });
            }
            if let Some(long) = &spec.long_name {
                if long.is_empty() || long.starts_with('-') || long.contains(char::is_whitespace)
                {
                    return Err(DefinitionError::InvalidLongName {
                        subcommand: subcommand(),
                        name: long.clone(),
                    });
                }
                if !long_names.insert(long.as_str()) {
                    return Err(DefinitionError::DuplicateLongName {
                        subcommand: subcommand(),
                        name: long.clone(),
                    });
                }
            }
        }

        let mut names = HashSet::new();
        let mut optional: Option<&str> = None;
        for spec in &self.parameters {
            if spec.name.is_empty() || spec.name.contains(char::is_whitespace) {
                return Err(DefinitionError::InvalidParameterName {
                    subcommand: subcommand(),
                    name: spec.name.clone(),
                });
            }
            if !names.insert(spec.name.as_str()) {
                return Err(DefinitionError::DuplicateParameter {
                    subcommand: subcommand(),
                    name: spec.name.clone(),
                });
            }
            if spec.is_required() {
                if let Some(previous) = optional {
                    return Err(DefinitionError::OptionalBeforeRequired {
                        subcommand: subcommand(),
                        optional: previous.to_string(),
                        required: spec.name.clone(),
                    });
                }
            } else if optional.is_none() {
                optional = Some(spec.name.as_str());
            }
        }
        Ok(())
    }

    fn metadata(&self) -> SubcommandMeta {
        SubcommandMeta {
            name: self.name.clone(),
            description: self.description.clone(),
            options: self
                .options
                .iter()
                .map(|o| OptionMeta {
                    letter: o.letter,
                    long_name: o.long_name.clone(),
                    description: o.description.clone(),
                    kind: o.kind.name().to_string(),
                    default_value: o.default_value.as_ref().map(Value::to_string),
                    exclusion_groups: o.exclusion_groups.clone(),
                    switch: o.is_switch(),
                    required: o.is_required(),
                })
                .collect(),
            parameters: self
                .parameters
                .iter()
                .map(|p| ParameterMeta {
                    name: p.name.clone(),
                    description: p.description.clone(),
                    kind: p.kind.name().to_string(),
                    default_value: p.default_value.as_ref().map(Value::to_string),
                    required: p.is_required(),
                })
                .collect(),
            asynchronous: self.is_async(),
        }
    }
}

/// Start a definition.
pub fn definition() -> DefinitionBuilder {
    DefinitionBuilder::default()
}

pub struct DefinitionBuilder {
    name: Option<String>,
    version: Option<String>,
    differentiated: bool,
    configuration: Configuration,
    subcommands: Vec<SubcommandDefinition>,
}

impl Default for DefinitionBuilder {
    fn default() -> Self {
        Self {
            name: None,
            version: None,
            differentiated: true,
            configuration: Configuration::default(),
            subcommands: Vec::new(),
        }
    }
}

impl DefinitionBuilder {
    /// Display name; defaults to the executable's file name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// With `false`, the single subcommand named `"default"` runs without the
    /// caller typing its name.
    pub fn differentiated_subcommands(mut self, differentiated: bool) -> Self {
        self.differentiated = differentiated;
        self
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn subcommand(mut self, subcommand: SubcommandDefinition) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    pub fn build(self) -> Result<CommandDefinition> {
        if self.differentiated {
            if self.subcommands.is_empty() {
                return Err(DefinitionError::NoSubcommands.into());
            }
        } else {
            if !self.subcommands.iter().any(|s| s.name == DEFAULT_SUBCOMMAND) {
                return Err(DefinitionError::MissingDefault.into());
            }
            if let Some(extra) = self
                .subcommands
                .iter()
                .find(|s| s.name != DEFAULT_SUBCOMMAND)
            {
                return Err(DefinitionError::UnreachableSubcommand(extra.name.clone()).into());
            }
        }

        let mut names = HashSet::new();
        for sub in &self.subcommands {
            if sub.name.is_empty()
                || sub.name.starts_with('-')
                || sub.name.contains(char::is_whitespace)
            {
                return Err(DefinitionError::InvalidSubcommandName(sub.name.clone()).into());
            }
            if !names.insert(sub.name.as_str()) {
                return Err(DefinitionError::DuplicateSubcommand(sub.name.clone()).into());
            }
            sub.validate()?;
        }

        let name = self.name.unwrap_or_else(executable_name);
        debug!(
            name = %name,
            subcommands = self.subcommands.len(),
            "command definition built"
        );
        Ok(CommandDefinition {
            name,
            version: self.version,
            differentiated: self.differentiated,
            configuration: self.configuration,
            subcommands: self.subcommands,
        })
    }
}

fn executable_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// A validated set of subcommands plus their shared configuration.
#[derive(Debug)]
pub struct CommandDefinition {
    name: String,
    version: Option<String>,
    differentiated: bool,
    configuration: Configuration,
    subcommands: Vec<SubcommandDefinition>,
}

impl CommandDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn has_differentiated_subcommands(&self) -> bool {
        self.differentiated
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn subcommands(&self) -> &[SubcommandDefinition] {
        &self.subcommands
    }

    pub fn subcommand(&self, name: &str) -> Option<&SubcommandDefinition> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Parse `args` (without the program name), bind, and run the handler.
    ///
    /// Asynchronous handlers are driven to completion on the current thread.
    /// Inside an async runtime, prefer [`CommandDefinition::run_async`].
    pub fn run(&self, args: &[String]) -> Result<i32> {
        let dispatch = self.dispatch(args)?;
        dispatch.wait().map_err(Error::Handler)
    }

    /// Like [`CommandDefinition::run`], awaiting asynchronous handlers.
    pub async fn run_async(&self, args: &[String]) -> Result<i32> {
        let dispatch = self.dispatch(args)?;
        dispatch.finish().await.map_err(Error::Handler)
    }

    /// Render the usage block for `subcommand` (or the whole definition)
    /// without writing it anywhere.
    pub fn usage(&self, subcommand: Option<&str>, error: Option<&str>) -> String {
        let subcommand = subcommand.and_then(|name| self.subcommand(name));
        usage::render(self, subcommand, error, self.configuration.width())
    }

    pub fn metadata(&self) -> DefinitionMeta {
        let mut meta = DefinitionMeta::new(self.name.clone(), self.differentiated);
        meta.version = self.version.clone();
        meta.subcommands = self
            .subcommands
            .iter()
            .map(SubcommandDefinition::metadata)
            .collect();
        meta
    }

    fn dispatch(&self, args: &[String]) -> Result<Dispatch> {
        match tokenizer::tokenize(self, args) {
            Ok(Parsed::Invocation { subcommand, tokens }) => {
                debug!(
                    subcommand = subcommand.name(),
                    tokens = tokens.len(),
                    "arguments accepted"
                );
                subcommand.invoker.invoke(tokens, self)
            }
            Ok(Parsed::Help(subcommand)) => {
                let text = usage::render(self, subcommand, None, self.configuration.width());
                self.configuration.output().write_text(&text);
                Ok(Dispatch::Ready(Ok(0)))
            }
            Ok(Parsed::Version) => {
                let text = match &self.version {
                    Some(version) => format!("{} {version}\n", self.name),
                    None => format!("{}\n", self.name),
                };
                self.configuration.output().write_text(&text);
                Ok(Dispatch::Ready(Ok(0)))
            }
            Err(err) => {
                usage::report(self, &err);
                Err(Error::Usage(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BufferOutput;

    #[derive(Debug, Default)]
    struct Opts {
        name: String,
        extra: String,
        count: i64,
    }

    fn quiet() -> Configuration {
        Configuration::new()
            .with_output(BufferOutput::new())
            .with_error_action(|| {})
    }

    fn noop(name: &str) -> SubcommandBuilder<Opts> {
        subcommand::<Opts>(name)
    }

    #[test]
    fn differentiated_definition_needs_a_subcommand() {
        let err = definition().name("tool").build().unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::NoSubcommands)
        ));
    }

    #[test]
    fn single_mode_needs_default() {
        let err = definition()
            .differentiated_subcommands(false)
            .subcommand(noop("run").handler(|_, _| Ok(0)))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::MissingDefault)
        ));

        let err = definition()
            .differentiated_subcommands(false)
            .subcommand(noop(DEFAULT_SUBCOMMAND).handler(|_, _| Ok(0)))
            .subcommand(noop("other").handler(|_, _| Ok(0)))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::UnreachableSubcommand(name)) if name == "other"
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = definition()
            .subcommand(noop("a").handler(|_, _| Ok(0)))
            .subcommand(noop("a").handler(|_, _| Ok(0)))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::DuplicateSubcommand(name)) if name == "a"
        ));

        let err = definition()
            .subcommand(
                noop("a")
                    .option(option('c', |o: &mut Opts, v: i64| o.count = v))
                    .option(option('c', |o: &mut Opts, v: String| o.name = v))
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::DuplicateLetter { letter: 'c', .. })
        ));

        let err = definition()
            .subcommand(
                noop("a")
                    .option(option('c', |o: &mut Opts, v: i64| o.count = v).long("same"))
                    .option(option('n', |o: &mut Opts, v: String| o.name = v).long("same"))
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::DuplicateLongName { .. })
        ));
    }

    #[test]
    fn invalid_letters_and_names_are_rejected() {
        let err = definition()
            .subcommand(
                noop("a")
                    .option(option('-', |o: &mut Opts, v: i64| o.count = v))
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::InvalidLetter { letter: '-', .. })
        ));

        let err = definition()
            .subcommand(noop("--a").handler(|_, _| Ok(0)))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Definition(DefinitionError::InvalidSubcommandName(_))
        ));
    }

    #[test]
    fn optional_parameters_must_trail() {
        let err = definition()
            .subcommand(
                noop("a")
                    .parameter(
                        parameter("name", |o: &mut Opts, v: String| o.name = v)
                            .default_value("x"),
                    )
                    .parameter(parameter("extra", |o: &mut Opts, v: String| o.extra = v))
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap_err();
        match err {
            Error::Definition(DefinitionError::OptionalBeforeRequired {
                optional,
                required,
                ..
            }) => {
                assert_eq!(optional, "name");
                assert_eq!(required, "extra");
            }
            other => panic!("expected OptionalBeforeRequired, got: {other:?}"),
        }
    }

    #[test]
    fn option_synopsis_shows_kind_and_default() {
        let sub = noop("a")
            .option(
                option('p', |o: &mut Opts, v: i64| o.count = v).long("project-number"),
            )
            .option(
                option('m', |o: &mut Opts, v: String| o.name = v)
                    .long("memory")
                    .default_value("1 GB"),
            )
            .option(switch('d', |_: &mut Opts, _| {}))
            .handler(|_, _| Ok(0));
        let synopses: Vec<String> = sub.options().iter().map(OptionSpec::synopsis).collect();
        assert_eq!(
            synopses,
            vec![
                "[-p, --project-number <int>]",
                "[-m, --memory <string=\"1 GB\">]",
                "[-d]",
            ]
        );
        assert!(sub.options()[0].is_required());
        assert!(!sub.options()[1].is_required());
        assert!(!sub.options()[2].is_required());
    }

    #[test]
    fn metadata_describes_options_and_parameters() {
        let def = definition()
            .name("tool")
            .version("2.0.0")
            .configuration(quiet())
            .subcommand(
                noop("build")
                    .description("Build it")
                    .option(
                        option('c', |o: &mut Opts, v: i64| o.count = v)
                            .long("count")
                            .default_value(3)
                            .exclusion_group("size"),
                    )
                    .parameter(parameter("name", |o: &mut Opts, v: String| o.name = v))
                    .async_handler(|_, _| async { Ok(0) }),
            )
            .build()
            .unwrap();

        let meta = def.metadata();
        assert_eq!(meta.name, "tool");
        assert_eq!(meta.version.as_deref(), Some("2.0.0"));
        let build = meta.subcommand("build").unwrap();
        assert!(build.asynchronous);
        assert_eq!(build.options[0].kind, "int");
        assert_eq!(build.options[0].default_value.as_deref(), Some("3"));
        assert_eq!(build.options[0].exclusion_groups, vec!["size".to_string()]);
        assert!(build.parameters[0].required);
    }
}
