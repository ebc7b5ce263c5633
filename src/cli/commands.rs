//! Command implementations for the textmine CLI.

use ahash::AHashMap;
use log::info;
use serde_json::{Map, Value};

use crate::aggregate::{
    Column, Fill, Key, WideTable, count, join, pairwise_cor, pivot, sum_values,
};
use crate::analysis::pipeline::Pipeline;
use crate::analysis::token::TokenTable;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{PipelineConfig, StopWordSource};
use crate::corpus::loader::load_corpus;
use crate::error::{Result, TextmineError};
use crate::lexicon::Lexicon;
use crate::scoring::{sort_by_tf_idf, tf_idf};

/// Execute a CLI command.
pub fn execute_command(args: TextmineArgs) -> Result<()> {
    match &args.command {
        Command::Tokens(tokens_args) => show_tokens(tokens_args, &args),
        Command::Count(count_args) => count_tokens(count_args, &args),
        Command::Sentiment(sentiment_args) => sentiment(sentiment_args, &args),
        Command::TfIdf(tf_idf_args) => score_tf_idf(tf_idf_args, &args),
        Command::Correlate(correlate_args) => correlate(correlate_args, &args),
    }
}

/// Resolve the pipeline configuration: the config file (or defaults) with
/// command line overrides applied.
pub fn resolve_config(pipeline_args: &PipelineArgs, cli_args: &TextmineArgs) -> Result<PipelineConfig> {
    let mut config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(mode) = &pipeline_args.mode {
        config.tokenizer = mode.clone();
    }
    if pipeline_args.keep_stop_words {
        config.stop_words.source = StopWordSource::None;
    }
    Ok(config)
}

/// Load the corpus and run it through the configured pipeline.
fn load_tokens(pipeline_args: &PipelineArgs, cli_args: &TextmineArgs) -> Result<TokenTable> {
    let config = resolve_config(pipeline_args, cli_args)?;
    let pipeline = Pipeline::from_config(&config)?;

    let corpus = config.prepare(load_corpus(&pipeline_args.corpus)?)?;
    let tokens = pipeline.run_corpus(&corpus)?;
    info!(
        "{} tokens from {} documents ({})",
        tokens.len(),
        corpus.len(),
        config.tokenizer
    );
    Ok(tokens)
}

/// Parse comma-separated column names.
fn parse_columns(names: &[String]) -> Result<Vec<Column>> {
    names.iter().map(|name| name.parse()).collect()
}

/// Parse sentiment grouping columns. A bare `index` takes the `--bucket`
/// size; `index:N` keeps its own.
fn parse_sentiment_columns(names: &[String], bucket: usize) -> Result<Vec<Column>> {
    names
        .iter()
        .map(|name| match name.as_str() {
            "index" => Ok(Column::Bucket(bucket)),
            other => other.parse(),
        })
        .collect()
}

/// Print the token table.
fn show_tokens(args: &TokensArgs, cli_args: &TextmineArgs) -> Result<()> {
    let tokens = load_tokens(&args.pipeline, cli_args)?;
    let limit = args.limit.unwrap_or(tokens.len());

    output_result("Tokens", &tokens.records()[..limit.min(tokens.len())], cli_args)
}

/// Count tokens by columns, most frequent first.
fn count_tokens(args: &CountArgs, cli_args: &TextmineArgs) -> Result<()> {
    let columns = parse_columns(&args.by)?;
    let tokens = load_tokens(&args.pipeline, cli_args)?;

    let counts = count(&tokens, &columns)?;
    let counts = match args.top {
        Some(n) => counts.top(n),
        None => counts.sorted_desc(),
    };

    output_result("Token counts", &counts, cli_args)
}

/// Join with a lexicon and summarize each group.
fn sentiment(args: &SentimentArgs, cli_args: &TextmineArgs) -> Result<()> {
    if args.bucket == 0 {
        return Err(TextmineError::invalid_config("bucket size must be at least 1"));
    }
    let columns = parse_sentiment_columns(&args.by, args.bucket)?;

    let lexicon = Lexicon::from_tsv_file(&args.lexicon)?;
    info!(
        "Loaded lexicon {} with {} words from: {}",
        lexicon.name(),
        lexicon.len(),
        args.lexicon.display()
    );

    let tokens = load_tokens(&args.pipeline, cli_args)?;
    let joined = join(&tokens, &lexicon);

    match args.summary {
        SentimentSummary::Sum => {
            let sums = sum_values(&joined, &columns)?;
            output_result("Sentiment value per group", &sums, cli_args)
        }
        SentimentSummary::Counts => {
            let mut group_by = columns;
            group_by.push(Column::Sentiment);
            let counts = count(&joined, &group_by)?;
            output_result("Sentiment counts per group", &counts, cli_args)
        }
        SentimentSummary::Net => {
            let mut group_by = columns;
            group_by.push(Column::Sentiment);
            let counts = count(&joined, &group_by)?;
            let wide = pivot(&counts, &Column::Sentiment, Fill::Zero)?;
            let rows = net_sentiment_rows(&wide)?;
            output_result("Net sentiment per group", &rows, cli_args)
        }
    }
}

/// Wide rows with a trailing `sentiment` column holding positive minus negative.
fn net_sentiment_rows(wide: &WideTable<u64>) -> Result<Vec<Map<String, Value>>> {
    let net = wide.difference(&Key::text("positive"), &Key::text("negative"))?;

    wide.rows()
        .zip(net)
        .map(|((key, cells), (_, net))| {
            let mut row = Map::new();
            for (column, part) in wide.row_columns().iter().zip(key) {
                row.insert(column.to_string(), serde_json::to_value(part)?);
            }
            for (column, cell) in wide.column_keys().iter().zip(cells) {
                row.insert(column.to_string(), serde_json::to_value(cell)?);
            }
            row.insert("sentiment".to_string(), Value::from(net));
            Ok(row)
        })
        .collect()
}

/// Score terms and print the best of each document.
fn score_tf_idf(args: &TfIdfArgs, cli_args: &TextmineArgs) -> Result<()> {
    let document: Column = args.document.parse()?;
    let tokens = load_tokens(&args.pipeline, cli_args)?;

    let mut records = tf_idf(&tokens, &document)?;
    sort_by_tf_idf(&mut records);

    if let Some(top) = args.top {
        let mut seen: AHashMap<String, usize> = AHashMap::new();
        records.retain(|record| {
            let n = seen.entry(record.document.clone()).or_default();
            *n += 1;
            *n <= top
        });
    }

    output_result("tf-idf", &records, cli_args)
}

/// Correlate words within line sections.
fn correlate(args: &CorrelateArgs, cli_args: &TextmineArgs) -> Result<()> {
    if args.section == 0 {
        return Err(TextmineError::invalid_config("section size must be at least 1"));
    }
    let tokens = load_tokens(&args.pipeline, cli_args)?;

    let mut pairs = pairwise_cor(
        &tokens,
        &Column::Word,
        &Column::Bucket(args.section),
        args.min_count,
    )?;
    if let Some(word) = &args.word {
        pairs.retain(|pair| &pair.item1 == word);
    }
    if let Some(top) = args.top {
        pairs.truncate(top);
    }

    output_result("Pairwise correlations", &pairs, cli_args)
}
