//! sqlscout CLI - schema-aware SQL query checker

mod args;
mod config;
mod output;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sqlscout_core::{
    load_schema, Diagnostic, JoinResolver, RelevanceIndex, SchemaModel, Severity,
    ValidationResult, Validator,
};

use crate::args::{Args, Command, OutputFormat};
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether anything failed (invalid query, missing join path)
fn run(args: Args) -> Result<bool> {
    let quiet = args.quiet;

    match args.command {
        Command::Check {
            files,
            query,
            schema,
            config: config_path,
            disable,
            format,
        } => {
            let config = if let Some(path) = config_path {
                Config::from_file(&path)?
            } else {
                Config::find_and_load()?.unwrap_or_default()
            };

            // CLI takes precedence over sqlscout.toml
            let config = config.merge_with_args(&schema, &files, &format, &disable);
            let output_format = config.output_format();

            // A schema that fails to load only disables the reference checks
            let schema = config.schema.as_deref().and_then(|path| {
                match load_schema(path) {
                    Ok((schema, diags)) => {
                        if !diags.is_empty() && !quiet {
                            eprintln!("Warning: Schema loading produced {} warnings", diags.len());
                        }
                        Some(schema)
                    }
                    Err(e) => {
                        eprintln!("{:?}", miette::Report::new(e));
                        None
                    }
                }
            });

            let mut sources: Vec<(String, String)> = Vec::new();
            if let Some(sql) = query {
                sources.push(("<query>".to_string(), sql));
            }
            for path in expand_patterns(&config.files)? {
                let content = fs::read_to_string(&path).into_diagnostic()?;
                sources.push((path.display().to_string(), content));
            }

            if sources.is_empty() {
                miette::bail!(
                    "No queries specified. Use positional file arguments, --query, or configure files in sqlscout.toml"
                );
            }

            let disabled_rules: HashSet<String> = config.disable.iter().cloned().collect();
            let validator = Validator::new(schema.as_ref());

            let mut total_errors = 0;
            let mut total_warnings = 0;
            let mut invalid = 0;

            for (name, content) in &sources {
                let diagnostics: Vec<Diagnostic> = validator
                    .check(content)
                    .into_iter()
                    .filter(|d| !disabled_rules.contains(d.code()))
                    .collect();

                let result = ValidationResult::from_diagnostics(&diagnostics);
                tracing::info!(source = %name, valid = result.is_valid, "checked query");
                if !result.is_valid {
                    invalid += 1;
                }

                for diag in &diagnostics {
                    match diag.severity {
                        Severity::Error => total_errors += 1,
                        Severity::Warning => total_warnings += 1,
                    }
                }

                let formatter = OutputFormatter::new(output_format, name.clone());
                if !diagnostics.is_empty() || output_format != OutputFormat::Human {
                    formatter.print_diagnostics(&diagnostics, content);
                }
            }

            if !quiet {
                if total_errors > 0 || total_warnings > 0 {
                    eprintln!(
                        "Found {} error(s), {} warning(s) in {} quer(ies)",
                        total_errors,
                        total_warnings,
                        sources.len()
                    );
                } else {
                    eprintln!("All {} quer(ies) passed validation", sources.len());
                }
            }

            Ok(invalid > 0)
        }

        Command::Join {
            table_a,
            table_b,
            schema,
            format,
        } => {
            let schema = load_required(&schema)?;
            let join = JoinResolver::new(&schema).find_join_path(&table_a, &table_b);
            output::print_join(format, &table_a, &table_b, join.as_ref());
            Ok(join.is_none())
        }

        Command::Tables {
            keywords,
            schema,
            format,
        } => {
            let schema = load_required(&schema)?;
            let tables = if keywords.is_empty() {
                schema.tables().into_iter().map(String::from).collect()
            } else {
                RelevanceIndex::new(&schema).find_relevant_tables(&keywords)
            };
            output::print_names(format, &tables);
            Ok(false)
        }

        Command::Columns {
            table,
            keywords,
            schema,
            format,
        } => {
            let schema = load_required(&schema)?;
            let Some(table_def) = schema.table(&table) else {
                miette::bail!("Table '{}' not found in schema", table);
            };
            let columns = if keywords.is_empty() {
                table_def.columns.keys().cloned().collect()
            } else {
                RelevanceIndex::new(&schema).suggest_columns(&table, &keywords)
            };
            output::print_names(format, &columns);
            Ok(false)
        }

        Command::Info {
            table,
            schema,
            format,
        } => {
            let schema = load_required(&schema)?;
            let Some(table_def) = schema.table(&table) else {
                miette::bail!("Table '{}' not found in schema", table);
            };
            output::print_table_info(format, table_def);
            Ok(false)
        }

        Command::Summary { schema, format } => {
            let schema = load_required(&schema)?;
            output::print_summary(format, &schema.summary());
            Ok(false)
        }

        Command::Schema { file } => {
            let (schema, diagnostics) = load_schema(&file)?;

            println!("Schema Information:");
            println!("==================");
            for table in schema.tables.values() {
                println!("\nTable: {}", table.name);
                if let Some(description) = &table.description {
                    println!("  {}", description);
                }
                for (col_name, col) in &table.columns {
                    let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
                    let pk = if table.primary_key.as_deref() == Some(col_name.as_str()) {
                        " PRIMARY KEY"
                    } else {
                        ""
                    };
                    println!("    - {} {} {}{}", col_name, col.data_type, nullable, pk);
                }
                for (column, fk) in &table.foreign_keys {
                    println!("    * {} -> {}", column, fk);
                }
            }

            if !diagnostics.is_empty() {
                let formatter =
                    OutputFormatter::new(OutputFormat::Human, file.display().to_string());
                formatter.print_diagnostics(&diagnostics, "");
            }

            Ok(false)
        }
    }
}

/// Load a schema for commands that cannot work without one
fn load_required(path: &Path) -> Result<SchemaModel> {
    let (schema, diagnostics) = load_schema(path)?;
    for diag in &diagnostics {
        tracing::warn!(code = diag.code(), "{}", diag.message);
    }
    Ok(schema)
}

/// Expand glob patterns; plain paths are passed through unchanged
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') {
            for path in glob::glob(pattern).into_diagnostic()?.flatten() {
                paths.push(path);
            }
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    Ok(paths)
}
