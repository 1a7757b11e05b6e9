//! valops - filter employee records with operator-wrapped values.
//!
//! Each `-w NAME=VALUE` is one request parameter. Repeat a name to give a
//! field several values.
//!
//! ```bash
//! valops -w 'last_name=ci(contains(smith))'
//! valops -w 'age=gt(30)' -w 'age=and(lt(45))' -w 'status=not(eq(INACTIVE))'
//! valops --loose -w 'status=endsWith(ive)' --explain
//! valops -w hired=2018-01-01 -w hired=2020-12-31
//! ```
//!
//! Matching records are printed as JSON. Set `RUST_LOG=valops=debug` to see
//! how each value was parsed.

mod model;
mod query;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use valops::{EngineConfig, Registry, Searchable};

use crate::model::Employee;

#[derive(Parser, Debug)]
#[command(name = "valops", version)]
#[command(about = "Filter employee records with operator-wrapped query values")]
struct Args {
    /// JSON file with employee records (defaults to the built-in sample)
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Engine configuration, YAML or JSON by extension
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Accept string operators (contains, startsWith, ...) on enum fields
    #[arg(long)]
    loose: bool,

    /// Print the combined expression to stderr before the results
    #[arg(long)]
    explain: bool,

    /// Filter parameter; repeat a name for several values
    #[arg(short = 'w', long = "where", value_name = "NAME=VALUE", value_parser = query::parse_param)]
    params: Vec<(String, String)>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };

    let registry = Registry::new(config);
    if args.loose {
        registry.set_loose_value_mode(true);
    }

    let staff = match &args.data {
        Some(path) => load_data(path)?,
        None => model::sample().context("parsing built-in sample data")?,
    };

    let expr = query::build(&registry, &model::fields(), &args.params)?;
    if args.explain {
        match &expr {
            Some(expr) => eprintln!("{}", expr),
            None => eprintln!("(no filter)"),
        }
    }

    let hits: Vec<&Employee> = match &expr {
        Some(expr) => expr.filter(&staff, Employee::accessor),
        None => staff.iter().collect(),
    };
    info!(total = staff.len(), matched = hits.len(), "filtered");

    println!("{}", serde_json::to_string_pretty(&hits)?);
    Ok(())
}

/// Aliases used when no configuration file is given.
fn default_config() -> EngineConfig {
    EngineConfig::default()
        .with_alias("user_name", "username")
        .with_alias("hired_on", "hired")
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("parsing YAML config {}", path.display()))?,
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("parsing JSON config {}", path.display()))?,
        _ => bail!(
            "unsupported config file {}, expected .yaml, .yml or .json",
            path.display()
        ),
    };
    Ok(config)
}

fn load_data(path: &Path) -> Result<Vec<Employee>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading data {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing data {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn args_collect_repeated_params() {
        let args = Args::try_parse_from([
            "valops",
            "--loose",
            "-w",
            "age=gt(30)",
            "--where",
            "age=and(lt(40))",
        ])
        .unwrap();
        assert!(args.loose);
        assert!(!args.explain);
        assert_eq!(
            args.params,
            vec![
                ("age".to_string(), "gt(30)".to_string()),
                ("age".to_string(), "and(lt(40))".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_param_is_rejected_by_clap() {
        assert!(Args::try_parse_from(["valops", "-w", "age"]).is_err());
    }

    #[test]
    fn config_by_extension() {
        let dir = TempDir::new().unwrap();

        let yaml = dir.path().join("valops.yaml");
        fs::write(&yaml, "loose_values: true\naliases:\n  last_name: surname\n").unwrap();
        let config = load_config(&yaml).unwrap();
        assert!(config.loose_values);
        assert_eq!(config.aliases["last_name"], "surname");

        let json = dir.path().join("valops.json");
        fs::write(&json, r#"{"regex_cache_capacity": 8}"#).unwrap();
        assert_eq!(load_config(&json).unwrap().regex_cache_capacity, 8);

        let toml = dir.path().join("valops.toml");
        fs::write(&toml, "").unwrap();
        assert!(load_config(&toml).is_err());
    }

    #[test]
    fn data_file_overrides_sample() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staff.json");
        let one = &model::sample().unwrap()[..1];
        fs::write(&path, serde_json::to_string(one).unwrap()).unwrap();

        let staff = load_data(&path).unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].user_name, "jdoe");
    }
}
