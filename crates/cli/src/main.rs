use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clidef::{
    CommandDefinition, Configuration, DirPath, definition, option, parameter, subcommand, switch,
};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

/// Pins the usage wrap width, e.g. `CLIDEF_WIDTH=60`.
const WIDTH_VAR: &str = "CLIDEF_WIDTH";

const STDOUT_PATH: &str = "-";

#[derive(Debug, Default)]
struct BuildArgs {
    project_number: i64,
    memory: String,
    disabled: bool,
    zzzz: bool,
    dummy: String,
    out_dir: DirPath,
}

#[derive(Debug, Default)]
struct FetchArgs {
    url: Option<Url>,
    delay_ms: i64,
    json: bool,
    yaml: bool,
    save: PathBuf,
}

#[derive(Debug, Serialize)]
struct FetchReport<'a> {
    scheme: &'a str,
    host: &'a str,
    path: &'a str,
}

#[derive(Debug, Default)]
struct DescribeArgs {
    compact: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = command_definition(configuration()?)?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let code = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(cli.run_async(&args))?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn configuration() -> Result<Configuration> {
    let configuration = Configuration::new();
    match std::env::var(WIDTH_VAR) {
        Ok(raw) => {
            let width: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{WIDTH_VAR} must be a column count, got {raw:?}"))?;
            if width == 0 {
                bail!("{WIDTH_VAR} must be greater than zero");
            }
            Ok(configuration.with_width(width))
        }
        Err(_) => Ok(configuration),
    }
}

fn command_definition(configuration: Configuration) -> clidef::Result<CommandDefinition> {
    definition()
        .name("clidef-demo")
        .version(env!("CARGO_PKG_VERSION"))
        .configuration(configuration)
        .subcommand(
            subcommand::<BuildArgs>("build")
                .description("Pretend to build a project and print the bound options")
                .option(
                    option('p', |a: &mut BuildArgs, v: i64| a.project_number = v)
                        .long("project-number")
                        .description("Number of the project to build"),
                )
                .option(
                    option('m', |a: &mut BuildArgs, v: String| a.memory = v)
                        .long("memory")
                        .description("Memory limit for the build")
                        .default_value("1 GB"),
                )
                .option(
                    switch('d', |a: &mut BuildArgs, v| a.disabled = v)
                        .long("disabled")
                        .description("Skip the actual build step"),
                )
                .option(switch('z', |a: &mut BuildArgs, v| a.zzzz = v).description("Sleepy mode"))
                .parameter(
                    parameter("dummy", |a: &mut BuildArgs, v: String| a.dummy = v)
                        .description("Free-form label echoed back"),
                )
                .parameter(
                    parameter("out-dir", |a: &mut BuildArgs, v: DirPath| a.out_dir = v)
                        .description("Directory the build would write to")
                        .default_value("target"),
                )
                .handler(|args, _| build(args)),
        )
        .subcommand(
            subcommand::<FetchArgs>("fetch")
                .description("Resolve a URL after an optional delay and print its parts")
                .option(
                    option('w', |a: &mut FetchArgs, v: i64| a.delay_ms = v)
                        .long("wait")
                        .description("Milliseconds to wait before resolving")
                        .default_value(0),
                )
                .option(
                    switch('j', |a: &mut FetchArgs, v| a.json = v)
                        .long("json")
                        .description("Print as JSON")
                        .exclusion_group("format"),
                )
                .option(
                    switch('y', |a: &mut FetchArgs, v| a.yaml = v)
                        .long("yaml")
                        .description("Print as YAML")
                        .exclusion_group("format"),
                )
                .option(
                    option('s', |a: &mut FetchArgs, v: PathBuf| a.save = v)
                        .long("save")
                        .description("Write the report to this file, or `-` for stdout")
                        .default_value(STDOUT_PATH),
                )
                .parameter(
                    parameter("url", |a: &mut FetchArgs, v: Url| a.url = Some(v))
                        .description("Absolute URL to resolve"),
                )
                .async_handler(|args, _| fetch(args)),
        )
        .subcommand(
            subcommand::<DescribeArgs>("describe")
                .description("Print this command definition as JSON")
                .option(
                    switch('c', |a: &mut DescribeArgs, v| a.compact = v)
                        .long("compact")
                        .description("Single-line output"),
                )
                .handler(describe),
        )
        .build()
}

fn build(args: BuildArgs) -> Result<i32> {
    tracing::debug!("executing build command");
    println!(
        "project={} memory={} disabled={} zzzz={} dummy={} out-dir={}",
        args.project_number,
        args.memory,
        args.disabled,
        args.zzzz,
        args.dummy,
        args.out_dir.display(),
    );
    Ok(0)
}

async fn fetch(args: FetchArgs) -> Result<i32> {
    tracing::debug!("executing fetch command");
    let url = args.url.context("url was not bound")?;
    if args.delay_ms < 0 {
        bail!("--wait must not be negative");
    }
    if args.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(args.delay_ms.unsigned_abs())).await;
    }

    let report = FetchReport {
        scheme: url.scheme(),
        host: url.host_str().unwrap_or_default(),
        path: url.path(),
    };
    let report = if args.json {
        serde_json::to_string(&report)?
    } else if args.yaml {
        serde_yaml::to_string(&report)?.trim_end().to_string()
    } else {
        format!("{} {} {}", report.scheme, report.host, report.path)
    };

    if args.save.as_os_str() == STDOUT_PATH {
        println!("{report}");
    } else {
        std::fs::write(&args.save, format!("{report}\n"))
            .with_context(|| format!("failed to write {}", args.save.display()))?;
        eprintln!("Wrote: {}", args.save.display());
    }
    Ok(0)
}

fn describe(args: DescribeArgs, cli: &CommandDefinition) -> Result<i32> {
    tracing::debug!("executing describe command");
    let meta = cli.metadata();
    if args.compact {
        println!("{}", String::from_utf8_lossy(&meta.to_json_bytes()));
    } else {
        println!("{}", meta.to_json_pretty()?);
    }
    Ok(0)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
