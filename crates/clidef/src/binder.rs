//! Binding validated tokens onto a fresh options value and running the handler.

use std::collections::HashMap;

use futures::future::BoxFuture;
use tracing::{debug, trace};

use crate::definition::CommandDefinition;
use crate::error::{Error, Result};
use crate::tokenizer::Token;
use crate::value::{Value, ValueType};

/// Writes one converted value into the options value. Returns `false` when
/// the value is of the wrong kind for the target field.
pub(crate) type Setter<O> = Box<dyn Fn(&mut O, Value) -> bool + Send + Sync>;

pub(crate) type HandlerFuture = BoxFuture<'static, anyhow::Result<i32>>;

type SyncHandler<O> = dyn Fn(O, &CommandDefinition) -> anyhow::Result<i32> + Send + Sync;
type AsyncHandler<O> = dyn Fn(O, &CommandDefinition) -> HandlerFuture + Send + Sync;

pub(crate) fn setter<O, T, F>(bind: F) -> Setter<O>
where
    O: 'static,
    T: ValueType,
    F: Fn(&mut O, T) + Send + Sync + 'static,
{
    Box::new(move |target: &mut O, value: Value| match T::from_value(value) {
        Some(value) => {
            bind(target, value);
            true
        }
        None => false,
    })
}

pub(crate) enum Handler<O> {
    Sync(Box<SyncHandler<O>>),
    Async(Box<AsyncHandler<O>>),
}

/// Result of invoking a handler: finished, or a future still to be driven.
pub(crate) enum Dispatch {
    Ready(anyhow::Result<i32>),
    Pending(HandlerFuture),
}

impl Dispatch {
    pub(crate) fn wait(self) -> anyhow::Result<i32> {
        match self {
            Self::Ready(result) => result,
            Self::Pending(future) => futures::executor::block_on(future),
        }
    }

    pub(crate) async fn finish(self) -> anyhow::Result<i32> {
        match self {
            Self::Ready(result) => result,
            Self::Pending(future) => future.await,
        }
    }
}

/// Type-erased entry point stored on each subcommand.
pub(crate) trait Invoke: Send + Sync {
    fn invoke(&self, tokens: Vec<Token>, definition: &CommandDefinition) -> Result<Dispatch>;

    fn is_async(&self) -> bool;
}

pub(crate) struct Binder<O> {
    options: HashMap<char, Setter<O>>,
    parameters: HashMap<String, Setter<O>>,
    handler: Handler<O>,
}

impl<O> Binder<O>
where
    O: Default + Send + 'static,
{
    pub(crate) fn new(
        options: Vec<(char, Setter<O>)>,
        parameters: Vec<(String, Setter<O>)>,
        handler: Handler<O>,
    ) -> Self {
        Self {
            options: options.into_iter().collect(),
            parameters: parameters.into_iter().collect(),
            handler,
        }
    }

    /// Build a fresh options value from `tokens`.
    pub(crate) fn bind(&self, tokens: Vec<Token>) -> Result<O> {
        let mut target = O::default();
        for token in tokens {
            let (setter, label, value) = match token {
                Token::Subcommand(_) => continue,
                Token::Option { letter, value } => {
                    (self.options.get(&letter), format!("option -{letter}"), value)
                }
                Token::Parameter { name, value } => {
                    let setter = self.parameters.get(&name);
                    (setter, format!("parameter {name}"), value)
                }
            };
            let Some(setter) = setter else {
                return Err(Error::Binding(format!("no binding registered for {label}")));
            };
            let kind = value.kind();
            trace!(binding = %label, value = %value, "binding value");
            if !setter(&mut target, value) {
                return Err(Error::Binding(format!(
                    "{kind} value cannot be bound to {label}"
                )));
            }
        }
        Ok(target)
    }
}

impl<O> Invoke for Binder<O>
where
    O: Default + Send + 'static,
{
    fn invoke(&self, tokens: Vec<Token>, definition: &CommandDefinition) -> Result<Dispatch> {
        let options = self.bind(tokens)?;
        debug!(asynchronous = self.is_async(), "invoking handler");
        Ok(match &self.handler {
            Handler::Sync(handler) => Dispatch::Ready(handler(options, definition)),
            Handler::Async(handler) => Dispatch::Pending(handler(options, definition)),
        })
    }

    fn is_async(&self) -> bool {
        matches!(self.handler, Handler::Async(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{definition, subcommand};

    #[derive(Debug, Default, PartialEq)]
    struct Opts {
        level: i64,
        name: String,
    }

    fn binder() -> Binder<Opts> {
        Binder::new(
            vec![('l', setter(|o: &mut Opts, v: i64| o.level = v))],
            vec![(
                "name".to_string(),
                setter(|o: &mut Opts, v: String| o.name = v),
            )],
            Handler::Sync(Box::new(|o: Opts, _: &CommandDefinition| Ok(o.level as i32))),
        )
    }

    #[test]
    fn bind_applies_tokens_and_skips_subcommand() {
        let opts = binder()
            .bind(vec![
                Token::Subcommand("run".to_string()),
                Token::Option {
                    letter: 'l',
                    value: Value::Int(4),
                },
                Token::Parameter {
                    name: "name".to_string(),
                    value: Value::Text("x".to_string()),
                },
            ])
            .unwrap();
        assert_eq!(
            opts,
            Opts {
                level: 4,
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn bind_starts_from_a_fresh_value() {
        let binder = binder();
        let first = binder
            .bind(vec![Token::Option {
                letter: 'l',
                value: Value::Int(9),
            }])
            .unwrap();
        assert_eq!(first.level, 9);
        let second = binder.bind(Vec::new()).unwrap();
        assert_eq!(second, Opts::default());
    }

    #[test]
    fn unknown_token_is_a_binding_error() {
        let err = binder()
            .bind(vec![Token::Option {
                letter: 'q',
                value: Value::Int(1),
            }])
            .unwrap_err();
        match err {
            Error::Binding(msg) => assert_eq!(msg, "no binding registered for option -q"),
            other => panic!("expected Binding, got: {other:?}"),
        }
    }

    #[test]
    fn mismatched_kind_is_a_binding_error() {
        let err = binder()
            .bind(vec![Token::Parameter {
                name: "name".to_string(),
                value: Value::Int(1),
            }])
            .unwrap_err();
        match err {
            Error::Binding(msg) => assert_eq!(msg, "int value cannot be bound to parameter name"),
            other => panic!("expected Binding, got: {other:?}"),
        }
    }

    #[test]
    fn invoke_returns_handler_exit_code() {
        let def = definition()
            .name("t")
            .subcommand(subcommand::<Opts>("run").handler(|_, _| Ok(0)))
            .build()
            .unwrap();
        let dispatch = binder()
            .invoke(
                vec![Token::Option {
                    letter: 'l',
                    value: Value::Int(3),
                }],
                &def,
            )
            .unwrap();
        assert_eq!(dispatch.wait().unwrap(), 3);
    }
}
