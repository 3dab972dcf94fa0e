use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;
use surveytab::{
    alias_labels, move_to_bottom,
    output::{render, render_list, write_table},
    plan::{Plan, DEFAULT_FIRST_QUESTION},
    read_survey,
    relabel::matching,
    AliasMap, ColumnRange, Dataset, LoadOptions, QuestionKind, Splitter,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "surveytab", version)]
#[command(about = "Choice-frequency tables for Qualtrics survey exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the questions in the selected column range
    Questions {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Tabulate one question
    Count {
        #[command(flatten)]
        source: SourceArgs,

        /// Question text (column header)
        question: String,

        /// "single", or "multi" for "select all that apply"
        #[arg(long, default_value_t = QuestionKind::Single)]
        kind: QuestionKind,

        /// Keep first-seen label order instead of sorting
        #[arg(long)]
        no_sort: bool,

        /// Trim whitespace around multi-choice selections
        #[arg(long)]
        trim: bool,

        /// YAML or JSON file mapping labels to display aliases
        #[arg(long)]
        aliases: Option<PathBuf>,

        /// Move rows whose label matches this regex to the bottom
        #[arg(long)]
        bottom: Option<String>,

        /// Also write the table (.csv, .json or .parquet)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Report and drop free-text columns, one after another
    Pop {
        #[command(flatten)]
        source: SourceArgs,

        /// Question text of each column to pop
        #[arg(required = true)]
        questions: Vec<String>,
    },
    /// Run a YAML analysis plan
    Run {
        /// Plan file
        plan: PathBuf,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Qualtrics CSV export
    file: PathBuf,

    /// 0-based line holding the question text
    #[arg(long, default_value_t = 1)]
    header: usize,

    /// Columns to keep, e.g. "R:", "17:", "R:AB"
    #[arg(long, default_value_t = ColumnRange::starting_at(DEFAULT_FIRST_QUESTION))]
    range: ColumnRange,
}

impl SourceArgs {
    fn dataset(&self) -> Result<Dataset> {
        let options = LoadOptions::default().with_header_row(self.header);
        let table = read_survey(&self.file, &options)?;
        Dataset::new(table, self.range).context("selecting question columns")
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // ─── 2) dispatch ─────────────────────────────────────────────────
    match Cli::parse().command {
        Command::Questions { source } => {
            let dataset = source.dataset()?;
            println!("{}", render_list("Questions", &dataset.question_list()));
        }

        Command::Count {
            source,
            question,
            kind,
            no_sort,
            trim,
            aliases,
            bottom,
            out,
        } => {
            let dataset = source.dataset()?;
            let splitter = if trim {
                Splitter::trimmed()
            } else {
                Splitter::default()
            };
            let mut table = dataset.count(&question, kind, !no_sort, &splitter)?;

            if let Some(path) = aliases {
                table = alias_labels(&table, &AliasMap::from_path(&path)?);
            }
            if let Some(pattern) = bottom {
                let pattern = Regex::new(&pattern)
                    .with_context(|| format!("bad bottom pattern {:?}", pattern))?;
                table = move_to_bottom(&table, matching(&pattern));
            }

            println!("{}", render(&table, Some(&question)));
            if let Some(out) = out {
                write_table(&table, &out)?;
            }
        }

        Command::Pop { source, questions } => {
            let mut dataset = source.dataset()?;
            for question in &questions {
                let popped = dataset.pop_other(question)?;
                println!(
                    "Q{} (column {}): {}\n\t{}",
                    popped.question_number,
                    popped.column_label(),
                    popped.question,
                    popped.response_line()
                );
            }
            println!("{}", render_list("Remaining questions", &dataset.question_list()));
        }

        Command::Run { plan } => {
            let plan = Plan::from_path(&plan)?;
            let report = plan.run()?;
            for question in &report.questions {
                println!("{}", render(&question.table, Some(&question.title)));
            }
            info!(
                popped = report.popped.len(),
                tables = report.questions.len(),
                "done"
            );
        }
    }

    Ok(())
}
