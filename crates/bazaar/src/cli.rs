//! Admin CLI definitions.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use bazaar_core::query::{Filter, PageRequest};

/// Inspect and seed bazaar collections.
#[derive(Debug, Parser)]
#[command(name = "bazaar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Indented JSON.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Insert a small demo data set into every collection.
    Seed,
    /// Fetch one live record.
    Get {
        /// Collection name (e.g. rides, orders).
        collection: String,
        id: String,
    },
    /// List live records one page at a time.
    List {
        collection: String,
        #[arg(long)]
        first: Option<i64>,
        #[arg(long)]
        last: Option<i64>,
        /// Cursor to start after.
        #[arg(long)]
        after: Option<String>,
        /// Cursor to end before.
        #[arg(long)]
        before: Option<String>,
        /// Equality predicate `field=value`; repeatable. JSON values are
        /// parsed, anything else is a string.
        #[arg(long = "where", value_parser = parse_predicate)]
        predicates: Vec<(String, Value)>,
    },
    /// Soft-delete a record.
    Delete { collection: String, id: String },
}

impl Commands {
    /// Builds the filter and paging arguments of a `list` command.
    pub fn list_query(&self) -> Option<(Filter, PageRequest)> {
        let Commands::List {
            first,
            last,
            after,
            before,
            predicates,
            ..
        } = self
        else {
            return None;
        };

        let filter = predicates
            .iter()
            .fold(Filter::new(), |filter, (field, value)| {
                filter.eq(field.clone(), value.clone())
            });
        let page = PageRequest {
            after: after.clone(),
            before: before.clone(),
            first: *first,
            last: *last,
        };
        Some((filter, page))
    }
}

/// Parses `field=value`. The value is read as JSON when possible so that
/// `rating=5` and `open=true` compare as number and bool.
pub fn parse_predicate(input: &str) -> Result<(String, Value), String> {
    let (field, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got {input:?}"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in {input:?}"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}

/// Format a value for output.
pub fn format_output<T: serde::Serialize>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Pretty => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_predicate() {
        assert_eq!(
            parse_predicate("status=open").unwrap(),
            ("status".to_string(), json!("open"))
        );
        assert_eq!(
            parse_predicate("rating=5").unwrap(),
            ("rating".to_string(), json!(5))
        );
        assert_eq!(
            parse_predicate("pickup.city=\"Lisbon\"").unwrap(),
            ("pickup.city".to_string(), json!("Lisbon"))
        );
        assert_eq!(
            parse_predicate("note=a=b").unwrap(),
            ("note".to_string(), json!("a=b"))
        );
        assert!(parse_predicate("status").is_err());
        assert!(parse_predicate("=open").is_err());
    }

    #[test]
    fn test_list_command_parses() {
        let cli = Cli::try_parse_from([
            "bazaar",
            "list",
            "orders",
            "--first",
            "5",
            "--where",
            "status=paid",
            "--where",
            "currency=EUR",
        ])
        .unwrap();

        let (filter, page) = cli.command.list_query().unwrap();
        assert_eq!(filter, Filter::new().eq("status", "paid").eq("currency", "EUR"));
        assert_eq!(page, PageRequest::new().first(5));
    }

    #[test]
    fn test_non_list_has_no_query() {
        let cli = Cli::try_parse_from(["bazaar", "get", "rides", "some-id"]).unwrap();
        assert!(cli.command.list_query().is_none());
    }
}
