//! Command-line interface for bb
//! This binary compiles bb templates into Java source, one file or a whole tree at a time.
//!
//! Usage:
//!   bbc build `<input-dir>` `<output-dir>`       - Compile every template under a directory
//!   bbc compile `<file>` [--package `<pkg>`]      - Print the Java generated for one template
//!   bbc tokens `<file>`                          - Print a template's token stream as JSON
//!
//! Global options:
//!   --config `<file>`          Layer a TOML file over the built-in defaults
//!   --base-class `<class>`     Superclass for scopes without `extends` ("" for none)
//!   --package-prefix `<pkg>`   Package prefix used by `build`

mod builder;

use bb_codegen::bb::emitter::UnitName;
use bb_codegen::bb::naming;
use bb_codegen::TemplateLoader;
use bb_config::{BbConfig, Loader};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("bbc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compiles bb templates into Java render classes")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults")
                .global(true),
        )
        .arg(
            Arg::new("base-class")
                .long("base-class")
                .help("Superclass for classes without an extends directive (empty for none)")
                .global(true),
        )
        .arg(
            Arg::new("package-prefix")
                .long("package-prefix")
                .help("Package prefix for classes generated by build")
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Compile every template under a directory")
                .arg(
                    Arg::new("input")
                        .help("Directory to search for templates")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .help("Directory to write generated sources to")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("compile")
                .about("Print the Java generated for one template")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("package")
                        .long("package")
                        .short('p')
                        .help("Package of the generated class"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print a template's token stream as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Print the JSON on a single line")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    init_tracing();
    let config = load_config(&matches);

    match matches.subcommand() {
        Some(("build", sub)) => handle_build_command(sub, &config),
        Some(("compile", sub)) => handle_compile_command(sub, &config),
        Some(("tokens", sub)) => handle_tokens_command(sub),
        _ => unreachable!("a subcommand is required"),
    }
}

/// Log to stderr, filtered by RUST_LOG (warnings and errors by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(matches: &ArgMatches) -> BbConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    let overrides = [
        ("base-class", "codegen.base_class"),
        ("package-prefix", "output.package_prefix"),
    ];
    for (arg, key) in overrides {
        if let Some(value) = matches.get_one::<String>(arg) {
            loader = loader.set_override(key, value.as_str()).unwrap_or_else(|e| {
                eprintln!("Invalid --{}: {}", arg, e);
                std::process::exit(1);
            });
        }
    }

    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the build command
fn handle_build_command(matches: &ArgMatches, config: &BbConfig) {
    let input = required_path(matches, "input");
    let output = required_path(matches, "output");

    let report = builder::build(input, output, config).unwrap_or_else(|e| {
        eprintln!("Build error: {}", e);
        std::process::exit(1);
    });

    for failure in &report.failures {
        eprintln!("error: {}", failure);
    }
    println!(
        "Compiled {} template(s), {} failed",
        report.written.len(),
        report.failures.len()
    );

    if !report.is_success() {
        std::process::exit(1);
    }
}

/// Handle the compile command
fn handle_compile_command(matches: &ArgMatches, config: &BbConfig) {
    let path = required_path(matches, "path");
    let package = matches.get_one::<String>("package").map(String::as_str);
    let class_name = naming::class_name(path, &config.input.marker)
        .or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            eprintln!("Cannot derive a class name from {}", path.display());
            std::process::exit(1);
        });
    let name = UnitName::new(package, class_name);

    let java = TemplateLoader::from_path(path)
        .and_then(|loader| loader.compile(&name, &config.emit_options()))
        .unwrap_or_else(|e| {
            eprintln!("{}: {}", path.display(), e);
            std::process::exit(1);
        });

    print!("{}", java);
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) {
    let path = required_path(matches, "path");
    let tokens = TemplateLoader::from_path(path)
        .and_then(|loader| loader.tokenize())
        .unwrap_or_else(|e| {
            eprintln!("{}: {}", path.display(), e);
            std::process::exit(1);
        });

    let json = if matches.get_flag("compact") {
        serde_json::to_string(&tokens)
    } else {
        serde_json::to_string_pretty(&tokens)
    };
    let json = json.unwrap_or_else(|e| {
        eprintln!("Error formatting tokens: {}", e);
        std::process::exit(1);
    });

    println!("{}", json);
}

fn required_path<'a>(matches: &'a ArgMatches, id: &str) -> &'a Path {
    matches
        .get_one::<String>(id)
        .map(Path::new)
        .unwrap_or_else(|| unreachable!("{} is a required argument", id))
}
