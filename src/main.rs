//! TOSCA submitter CLI
//!
//! Usage:
//!   tosca-submitter [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -p, --param <KEY=VALUE>  Input override (repeatable)
//!   -c, --config <FILE>      Adaptor configuration (TOML format)
//!   --validate-only          Stop after validation
//!   --json                   Print the resolved topology as JSON
//!   --info                   Query the orchestration adaptors
//!   -d, --debug              Verbose logging
//!   -h, --help               Print help

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use serde_yaml::Value;
use tracing_subscriber::EnvFilter;

use tosca_submitter::adaptors::{KubernetesAdaptor, VmAdaptor};
use tosca_submitter::{set_template, ParsedParams, SubmitterConfig, Template};

#[derive(Parser)]
#[command(name = "tosca-submitter")]
#[command(about = "Parse, validate and resolve TOSCA topology templates")]
struct Cli {
    /// Template to parse: local path or URL
    template: Option<String>,

    /// Input override in KEY=VALUE form (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Adaptor configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after validation, do not print the resolved topology
    #[arg(long)]
    validate_only: bool,

    /// Print the resolved topology as JSON instead of YAML
    #[arg(long)]
    json: bool,

    /// Query the orchestration adaptors and print deployment info
    #[arg(long)]
    info: bool,

    /// Verbose logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match SubmitterConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                exit(1);
            }
        },
        None => SubmitterConfig::default(),
    };

    if cli.info {
        print_deployment_info(&config);
        return;
    }

    let source = match &cli.template {
        Some(source) => source,
        None => {
            eprintln!("Error: no template given (pass a path or URL, or use --info)");
            exit(1);
        }
    };

    let params = match parse_params(&cli.params) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let template = match set_template(source, Some(params)) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    if cli.validate_only {
        println!(
            "OK: {} node template(s), {} input(s)",
            template.node_templates.len(),
            template.inputs.len()
        );
        return;
    }

    print_resolved(&template, cli.json);
}

/// Parse repeated KEY=VALUE overrides; values are read as YAML scalars so
/// `-p disk_size=50` arrives as a number, not a string.
fn parse_params(args: &[String]) -> Result<ParsedParams, String> {
    let mut params = ParsedParams::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("invalid --param '{}': expected KEY=VALUE", arg))?;
        if key.is_empty() {
            return Err(format!("invalid --param '{}': empty key", arg));
        }
        let value: Value = serde_yaml::from_str(value)
            .map_err(|e| format!("invalid --param value '{}': {}", value, e))?;
        params.insert(key.to_string(), value);
    }
    Ok(params)
}

fn print_resolved(template: &Template, json: bool) {
    let rendered = if json {
        serde_json::to_string_pretty(template.raw()).map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(template.raw()).map_err(|e| e.to_string())
    };

    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error rendering resolved topology: {}", e);
            exit(1);
        }
    }
}

fn print_deployment_info(config: &SubmitterConfig) {
    let kubernetes = KubernetesAdaptor::new(config.kubernetes.clone());
    match kubernetes.info() {
        Ok(endpoint) => println!(
            "cluster endpoint: {}:{}",
            endpoint.ip_address, endpoint.port_number
        ),
        Err(e) => eprintln!("Error fetching cluster info: {}", e),
    }

    let vm = match VmAdaptor::new(config.vm_orchestrator.clone()) {
        Ok(vm) => vm,
        Err(e) => {
            eprintln!("Error creating VM adaptor: {}", e);
            exit(1);
        }
    };
    match vm.info() {
        Ok(nodes) => {
            for node in nodes {
                println!(
                    "{}: internal {} external {}",
                    node.node_id,
                    node.internal_ip,
                    node.external_ip.as_deref().unwrap_or("-")
                );
            }
        }
        Err(e) => {
            eprintln!("Error fetching node info: {}", e);
            exit(1);
        }
    }
}
