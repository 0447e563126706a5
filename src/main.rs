//! tabq - query, transform, and summarize CSV tables

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;

use tabq::config::{Config, OutputFormat};
use tabq::model::{parse_mapping, Row, Table};
use tabq::output;
use tabq::io;
use tabq::predicate::Predicate;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Query, transform, and summarize CSV tables
#[derive(Parser, Debug)]
#[command(name = "tabq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file to operate on
    file: PathBuf,

    /// Output format for query results
    #[arg(short, long, value_enum, default_value = "table")]
    format: CliOutputFormat,

    /// Where mutating commands write the resulting table (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the table, optionally only the first N rows
    Show {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Append a row; columns not given become empty
    Add {
        /// Cell assignments, e.g. --set Name=Ann --set Age=30
        #[arg(long = "set", value_parser = parse_assignment)]
        sets: Vec<(String, String)>,
    },
    /// Update cells of the row at INDEX
    Update {
        index: usize,
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        sets: Vec<(String, String)>,
    },
    /// Delete the row at INDEX
    Delete { index: usize },
    /// Case-insensitive keyword search
    Search {
        keyword: String,
        /// Columns to search (comma-separated); all columns if omitted
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Filter rows with an expression, e.g. 'Age > 20 and Status == "Yes"'
    Filter { expression: String },
    /// Sort rows by a column, numerically where both cells are numbers
    Sort {
        column: String,
        #[arg(long)]
        desc: bool,
    },
    /// Row count
    Rows,
    /// Column names
    Columns,
    /// Null cells per column
    Nulls,
    /// Mean of the numeric cells of a column
    Mean { column: String },
    /// Sum of the numeric cells of a column
    Sum { column: String },
    /// Minimum and maximum of the numeric cells of a column
    MinMax { column: String },
    /// Occurrences of each value in a column
    Counts { column: String },
    /// Most frequent values of a column
    Top {
        column: String,
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,
    },
    /// Rows whose column is numeric and above a threshold
    Above { column: String, threshold: f64 },
    /// Sum of the numeric values above a threshold
    SumAbove { column: String, threshold: f64 },
    /// Pearson correlation between two numeric columns
    Corr { x: String, y: String },
    /// First row for each distinct value of a column
    Unique { column: String },
    /// Replace exact values in a column using a JSON mapping
    Remap {
        column: String,
        /// JSON object, e.g. '{"Yes": "Si"}'
        mapping: String,
    },
    /// Per-column null and non-null tallies
    Summary,
    /// Descriptive statistics for every column
    Describe,
    /// Equal-width histogram buckets over a numeric column
    Hist {
        column: String,
        #[arg(short, long, default_value_t = 10)]
        bins: usize,
    },
    /// Numeric (x, y) pairs from two columns
    Scatter { x: String, y: String },
    /// Re-serialize the table as CSV
    Export,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((column, value)) => Ok((column.to_string(), value.to_string())),
        None => Err(format!("expected COLUMN=VALUE, got '{s}'")),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli.file)
        .with_output_format(cli.format.into())
        .with_write_to(cli.output);
    let format = config.output_format;

    let mut table = io::read_csv(&config.input)?;

    match cli.command {
        Command::Show { limit } => {
            let rows: Vec<&Row> = table.head(limit.unwrap_or(usize::MAX)).iter().collect();
            print_rows(&table, &rows, format)?;
        }
        Command::Add { sets } => {
            let values: IndexMap<String, String> = sets.into_iter().collect();
            table.add_row(&values);
            write_back(&table, &config)?;
        }
        Command::Update { index, sets } => {
            for (column, value) in sets {
                table.update_cell(index, &column, value)?;
            }
            write_back(&table, &config)?;
        }
        Command::Delete { index } => {
            table.delete_row(index)?;
            write_back(&table, &config)?;
        }
        Command::Search { keyword, columns } => {
            let columns = if columns.is_empty() {
                table.column_list()
            } else {
                columns
            };
            let rows = table.search_keyword(&columns, &keyword)?;
            print_rows(&table, &rows, format)?;
        }
        Command::Filter { expression } => {
            let predicate = Predicate::parse(&expression)?;
            let rows = table.filter(&predicate)?;
            print_rows(&table, &rows, format)?;
        }
        Command::Sort { column, desc } => {
            table.sort_by(&column, !desc)?;
            write_back(&table, &config)?;
        }
        Command::Rows => match format {
            OutputFormat::Table => println!("{}", table.row_count()),
            OutputFormat::Json => output::print_pretty(&table.row_count())?,
        },
        Command::Columns => match format {
            OutputFormat::Table => {
                for name in table.columns() {
                    println!("{name}");
                }
            }
            OutputFormat::Json => output::print_pretty(&table.column_list())?,
        },
        Command::Nulls => {
            let counts = table.null_counts();
            match format {
                OutputFormat::Table => {
                    let entries = counts.into_iter().map(|(k, v)| (k, v.to_string()));
                    println!("{}", output::pairs_table(["column", "nulls"], entries));
                }
                OutputFormat::Json => output::print_pretty(&counts)?,
            }
        }
        Command::Mean { column } => print_optional(table.mean(&column)?, format)?,
        Command::Sum { column } => match format {
            OutputFormat::Table => println!("{}", table.sum(&column)?),
            OutputFormat::Json => output::print_pretty(&table.sum(&column)?)?,
        },
        Command::MinMax { column } => {
            let extremes = table.min_max(&column)?;
            match format {
                OutputFormat::Table => match extremes {
                    Some((min, max)) => println!("min: {min}\nmax: {max}"),
                    None => println!("null"),
                },
                OutputFormat::Json => output::print_pretty(&extremes)?,
            }
        }
        Command::Counts { column } => {
            let counts = table.value_counts(&column)?;
            match format {
                OutputFormat::Table => {
                    let entries = counts.into_iter().map(|(k, v)| (k, v.to_string()));
                    println!("{}", output::pairs_table(["value", "count"], entries));
                }
                OutputFormat::Json => output::print_pretty(&counts)?,
            }
        }
        Command::Top { column, limit } => {
            let top = table.top_n(&column, limit)?;
            match format {
                OutputFormat::Table => {
                    let entries = top.into_iter().map(|(k, v)| (k, v.to_string()));
                    println!("{}", output::pairs_table(["value", "count"], entries));
                }
                OutputFormat::Json => output::print_pretty(&top)?,
            }
        }
        Command::Above { column, threshold } => {
            let rows = table.filter_threshold(&column, threshold)?;
            print_rows(&table, &rows, format)?;
        }
        Command::SumAbove { column, threshold } => {
            let total = table.sum_above_threshold(&column, threshold)?;
            match format {
                OutputFormat::Table => println!("{total}"),
                OutputFormat::Json => output::print_pretty(&total)?,
            }
        }
        Command::Corr { x, y } => print_optional(table.correlation(&x, &y)?, format)?,
        Command::Unique { column } => {
            let rows = table.unique_rows(&column)?;
            print_rows(&table, &rows, format)?;
        }
        Command::Remap { column, mapping } => {
            let mapping = parse_mapping(&mapping)?;
            let replaced = table.replace_by_mapping(&column, &mapping)?;
            eprintln!("Replaced {replaced} cell(s)");
            write_back(&table, &config)?;
        }
        Command::Summary => {
            let summary = table.reduced_summary();
            match format {
                OutputFormat::Table => println!("{}", output::summary_table(&summary)),
                OutputFormat::Json => output::print_pretty(&summary)?,
            }
        }
        Command::Describe => {
            let summaries = table.describe();
            match format {
                OutputFormat::Table => println!("{}", output::describe_table(&summaries)),
                OutputFormat::Json => output::print_pretty(&summaries)?,
            }
        }
        Command::Hist { column, bins } => {
            let buckets = table.histogram(&column, bins)?;
            match format {
                OutputFormat::Table => println!("{}", output::histogram_table(&buckets)),
                OutputFormat::Json => output::print_pretty(&buckets)?,
            }
        }
        Command::Scatter { x, y } => {
            let pairs = table.scatter_pairs(&x, &y)?;
            match format {
                OutputFormat::Table => println!("{}", output::points_table(&x, &y, &pairs)),
                OutputFormat::Json => output::print_pretty(&pairs)?,
            }
        }
        Command::Export => write_back(&table, &config)?,
    }

    Ok(())
}

fn print_rows(table: &Table, rows: &[&Row], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            output::print_heading(&format!("{} rows", rows.len()))?;
            println!("{}", output::rows_table(table, rows));
        }
        OutputFormat::Json => output::print_pretty(&output::rows_to_json(table, rows))?,
    }
    Ok(())
}

fn print_optional(value: Option<f64>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => match value {
            Some(v) => println!("{v}"),
            None => println!("null"),
        },
        OutputFormat::Json => output::print_pretty(&value)?,
    }
    Ok(())
}

fn write_back(table: &Table, config: &Config) -> Result<()> {
    match &config.write_to {
        Some(path) => io::write_csv_file(table, path),
        None => io::write_csv(table, std::io::stdout().lock()),
    }
}
