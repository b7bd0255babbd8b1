//! Usage blocks: synopsis line, optional error line and description tables.

use tracing::debug;

use crate::definition::{CommandDefinition, DEFAULT_SUBCOMMAND, SubcommandDefinition};
use crate::error::UsageError;

const USAGE_PREFIX: &str = "Usage: ";
const TABLE_INDENT: usize = 2;
const COLUMN_GAP: usize = 3;
/// Descriptions never get squeezed below this, even on very narrow sinks.
const MIN_TEXT_WIDTH: usize = 16;

/// Render the usage block for `subcommand`, or for the whole definition when
/// `None`. `error` adds an `Error:` line below the synopsis.
pub fn render(
    definition: &CommandDefinition,
    subcommand: Option<&SubcommandDefinition>,
    error: Option<&str>,
    width: usize,
) -> String {
    // Without differentiated subcommands there is nothing to choose from.
    let subcommand = subcommand.or_else(|| {
        if definition.has_differentiated_subcommands() {
            None
        } else {
            definition.subcommand(DEFAULT_SUBCOMMAND)
        }
    });

    let mut out = String::new();
    let synopsis = match subcommand {
        Some(subcommand) => subcommand_synopsis(definition, subcommand),
        None => definition_synopsis(definition),
    };
    for line in wrap(&synopsis, width, USAGE_PREFIX.len()) {
        out.push_str(&line);
        out.push('\n');
    }
    if let Some(error) = error {
        out.push_str(&format!("Error: {error}\n"));
    }

    match subcommand {
        Some(subcommand) => subcommand_tables(&mut out, subcommand, width),
        None => {
            let rows: Vec<(String, String)> = definition
                .subcommands()
                .iter()
                .map(|s| (s.name().to_string(), s.description().trim().to_string()))
                .collect();
            out.push_str("\nSubcommands:\n");
            write_table(&mut out, &rows, column_width(&rows), width);
        }
    }
    out
}

/// Write the usage block for `error` to the configured sink and run the
/// configured error action.
pub(crate) fn report(definition: &CommandDefinition, error: &UsageError) {
    debug!(
        subcommand = ?error.subcommand(),
        message = error.message(),
        "usage error"
    );
    let configuration = definition.configuration();
    let subcommand = error
        .subcommand()
        .and_then(|name| definition.subcommand(name));
    let text = render(
        definition,
        subcommand,
        Some(error.message()),
        configuration.width(),
    );
    configuration.output().write_text(&text);
    configuration.invoke_error_action();
}

/// `Usage: tool <build | export>`
fn definition_synopsis(definition: &CommandDefinition) -> String {
    let names: Vec<&str> = definition
        .subcommands()
        .iter()
        .map(SubcommandDefinition::name)
        .collect();
    format!("{USAGE_PREFIX}{} <{}>", definition.name(), names.join(" | "))
}

/// `Usage: tool build [-p, --project-number <int>] [-d] <dummy> [<extra>]`
fn subcommand_synopsis(definition: &CommandDefinition, subcommand: &SubcommandDefinition) -> String {
    let mut parts = vec![definition.name().to_string()];
    if definition.has_differentiated_subcommands() {
        parts.push(subcommand.name().to_string());
    }
    parts.extend(subcommand.options().iter().map(|o| o.synopsis()));
    parts.extend(subcommand.parameters().iter().map(|p| p.usage_item()));
    format!("{USAGE_PREFIX}{}", parts.join(" "))
}

fn subcommand_tables(out: &mut String, subcommand: &SubcommandDefinition, width: usize) {
    let options: Vec<(String, String)> = subcommand
        .options()
        .iter()
        .map(|o| (o.names(), describe(o.description(), o.default_value().map(|v| v.literal()))))
        .collect();
    let parameters: Vec<(String, String)> = subcommand
        .parameters()
        .iter()
        .map(|p| {
            (
                p.name().to_string(),
                describe(p.description(), p.default_value().map(|v| v.literal())),
            )
        })
        .collect();
    if options.is_empty() && parameters.is_empty() {
        return;
    }

    // One column for both tables.
    let column = column_width(&options).max(column_width(&parameters));
    out.push('\n');
    if !options.is_empty() {
        out.push_str("Options:\n");
        write_table(out, &options, column, width);
    }
    if !parameters.is_empty() {
        out.push_str("Parameters:\n");
        write_table(out, &parameters, column, width);
    }
}

fn describe(description: &str, default: Option<String>) -> String {
    let description = description.trim();
    match default {
        Some(default) if description.is_empty() => format!("(defaults to {default})"),
        Some(default) => format!("{description} (defaults to {default})"),
        None => description.to_string(),
    }
}

fn column_width(rows: &[(String, String)]) -> usize {
    rows.iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .map_or(0, |longest| longest + COLUMN_GAP)
}

fn write_table(out: &mut String, rows: &[(String, String)], column: usize, width: usize) {
    let text_width = width
        .saturating_sub(TABLE_INDENT + column)
        .max(MIN_TEXT_WIDTH);
    let hanging = " ".repeat(TABLE_INDENT + column);
    for (left, text) in rows {
        let mut lines = wrap(text, text_width, 0).into_iter();
        let first = lines.next().unwrap_or_default();
        let row = format!("{:indent$}{left:column$}{first}", "", indent = TABLE_INDENT);
        out.push_str(row.trim_end());
        out.push('\n');
        for line in lines {
            out.push_str(&format!("{hanging}{line}\n"));
        }
    }
}

/// Greedy word wrap to `width` columns. Lines after the first are indented by
/// `indent` spaces, which count toward the width. A word longer than a line
/// is kept whole. Runs of blanks inside the text are kept, except where a line
/// breaks.
pub fn wrap(text: &str, width: usize, indent: usize) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for piece in text.trim().split(char::is_whitespace) {
        match words.last_mut() {
            // Extra blanks stay attached to the word before them.
            Some(word) if piece.is_empty() => word.push(' '),
            _ => words.push(piece.to_string()),
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in &words {
        let used = if lines.is_empty() { 0 } else { indent };
        let needed = used + line.chars().count() + 1 + word.trim_end().chars().count();
        if !line.is_empty() && needed > width {
            lines.push(line.trim_end().to_string());
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    let line = line.trim_end().to_string();
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }

    let pad = " ".repeat(indent);
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { format!("{pad}{line}") })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BufferOutput, Configuration};
    use crate::definition::{definition, option, parameter, subcommand, switch};

    #[derive(Debug, Default)]
    struct Opts;

    fn sample() -> CommandDefinition {
        definition()
            .name("tool")
            .configuration(
                Configuration::new()
                    .with_output(BufferOutput::new())
                    .with_error_action(|| {})
                    .with_width(80),
            )
            .subcommand(
                subcommand::<Opts>("build")
                    .description("Build the project")
                    .option(
                        option('p', |_: &mut Opts, _: i64| {})
                            .long("project-number")
                            .description("Project number"),
                    )
                    .option(
                        option('m', |_: &mut Opts, _: String| {})
                            .long("memory")
                            .description("Memory limit")
                            .default_value("1 GB"),
                    )
                    .option(
                        switch('d', |_: &mut Opts, _| {})
                            .long("disabled")
                            .description("Disable the build"),
                    )
                    .option(switch('z', |_: &mut Opts, _| {}).description("Zzzz"))
                    .parameter(
                        parameter("dummy", |_: &mut Opts, _: String| {})
                            .description("Dummy value"),
                    )
                    .handler(|_, _| Ok(0)),
            )
            .subcommand(
                subcommand::<Opts>("export")
                    .description("Export results")
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn whole_definition_block() {
        let def = sample();
        let text = render(&def, None, Some("Unknown subcommand: deploy"), 80);
        assert_eq!(
            text,
            "Usage: tool <build | export>\n\
             Error: Unknown subcommand: deploy\n\
             \n\
             Subcommands:\n\
             \x20 build    Build the project\n\
             \x20 export   Export results\n"
        );
    }

    #[test]
    fn subcommand_block_with_error() {
        let def = sample();
        let build = def.subcommand("build");
        let text = render(&def, build, Some("Missing parameter: dummy"), 80);
        let expected = [
            "Usage: tool build [-p, --project-number <int>] [-m, --memory <string=\"1 GB\">]",
            "       [-d, --disabled] [-z] <dummy>",
            "Error: Missing parameter: dummy",
            "",
            "Options:",
            "  -p, --project-number   Project number",
            "  -m, --memory           Memory limit (defaults to \"1 GB\")",
            "  -d, --disabled         Disable the build",
            "  -z                     Zzzz",
            "Parameters:",
            "  dummy                  Dummy value",
        ];
        assert_eq!(text, format!("{}\n", expected.join("\n")));
    }

    #[test]
    fn help_block_has_no_error_line() {
        let def = sample();
        let text = render(&def, def.subcommand("build"), None, 80);
        assert!(!text.contains("Error:"));
        assert!(text.starts_with("Usage: tool build "));
    }

    #[test]
    fn subcommand_without_arguments_has_no_tables() {
        let def = sample();
        let text = render(&def, def.subcommand("export"), None, 80);
        assert_eq!(text, "Usage: tool export\n");
    }

    #[test]
    fn descriptions_wrap_under_their_column() {
        let def = definition()
            .name("tool")
            .subcommand(
                subcommand::<Opts>("build")
                    .description("Build the project from its sources")
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap();
        let text = render(&def, None, None, 30);
        assert_eq!(
            text,
            "Usage: tool <build>\n\
             \n\
             Subcommands:\n\
             \x20 build   Build the project\n\
             \x20         from its sources\n"
        );
    }

    #[test]
    fn synopsis_wraps_at_last_space() {
        let lines = wrap(
            "Usage: tool build [-p, --project-number <int>] [-m, --memory <string=\"1 GB\">] [-d, --disabled] [-z] <dummy>",
            60,
            USAGE_PREFIX.len(),
        );
        assert_eq!(
            lines,
            vec![
                "Usage: tool build [-p, --project-number <int>] [-m, --memory",
                "       <string=\"1 GB\">] [-d, --disabled] [-z] <dummy>",
            ]
        );
        assert!(lines.iter().all(|line| line.len() <= 60));
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(wrap("abcdefghij x", 4, 0), vec!["abcdefghij", "x"]);
        assert_eq!(wrap("", 10, 2), vec![""]);
    }

    #[test]
    fn wrap_keeps_inner_spacing() {
        assert_eq!(wrap("1  GB", 80, 0), vec!["1  GB"]);
        assert_eq!(wrap("ab   cd ef", 5, 0), vec!["ab", "cd ef"]);
    }

    #[test]
    fn quoted_default_keeps_its_spacing() {
        let def = definition()
            .name("tool")
            .configuration(Configuration::new().with_output(BufferOutput::new()))
            .subcommand(
                subcommand::<Opts>("build")
                    .option(
                        option('m', |_: &mut Opts, _: String| {})
                            .long("memory")
                            .default_value("1  GB"),
                    )
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap();
        let build = def.subcommand("build").unwrap();
        let text = render(&def, Some(build), None, 80);
        let synopsis = text.lines().next().unwrap();
        assert_eq!(
            synopsis,
            format!("Usage: tool build {}", build.options()[0].synopsis())
        );
        assert!(synopsis.ends_with("<string=\"1  GB\">]"), "{synopsis}");
        assert!(text.contains("(defaults to \"1  GB\")"), "{text}");
    }

    #[test]
    fn single_mode_block() {
        let def = definition()
            .name("one")
            .differentiated_subcommands(false)
            .configuration(
                Configuration::new()
                    .with_output(BufferOutput::new())
                    .with_error_action(|| {}),
            )
            .subcommand(
                subcommand::<Opts>(DEFAULT_SUBCOMMAND)
                    .option(switch('v', |_: &mut Opts, _| {}).description("Verbose output"))
                    .parameter(
                        parameter("a", |_: &mut Opts, _: String| {}).description("Input name"),
                    )
                    .parameter(
                        parameter("b", |_: &mut Opts, _: i64| {})
                            .description("Repeat count")
                            .default_value(4),
                    )
                    .handler(|_, _| Ok(0)),
            )
            .build()
            .unwrap();
        assert_eq!(
            render(&def, None, None, 80),
            "Usage: one [-v] <a> [<b>]\n\
             \n\
             Options:\n\
             \x20 -v   Verbose output\n\
             Parameters:\n\
             \x20 a    Input name\n\
             \x20 b    Repeat count (defaults to 4)\n"
        );
    }

    #[test]
    fn report_writes_block_and_runs_action() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let buffer = BufferOutput::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let def = definition()
            .name("tool")
            .configuration(
                Configuration::new()
                    .with_output(buffer.clone())
                    .with_error_action(move || flag.store(true, Ordering::SeqCst)),
            )
            .subcommand(subcommand::<Opts>("run").handler(|_, _| Ok(0)))
            .build()
            .unwrap();

        report(&def, &UsageError::general("Subcommand is missing."));
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(
            buffer.contents(),
            "Usage: tool <run>\nError: Subcommand is missing.\n\nSubcommands:\n  run\n"
        );
    }
}
