//! Output formatting for CLI commands.
//!
//! Every command result is a list of flat rows (token records, table rows,
//! scored terms). Rows are serialized once to JSON values and then printed as
//! JSON, CSV, or an aligned text table.

use csv::{Writer, WriterBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{OutputFormat, TextmineArgs};
use crate::error::{Result, TextmineError};

/// Output a result in the specified format.
pub fn output_result<T: Serialize + ?Sized>(
    message: &str,
    result: &T,
    args: &TextmineArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Csv => output_csv(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize + ?Sized>(
    message: &str,
    result: &T,
    args: &TextmineArgs,
) -> Result<()> {
    let value = serde_json::to_value(result)?;

    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    match &value {
        Value::Array(rows) if rows.iter().all(Value::is_object) => {
            for line in render_table(rows) {
                println!("{line}");
            }
            if args.verbosity() > 0 {
                println!();
                println!("{} rows", rows.len());
            }
        }
        Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(&value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Lay rows out as a space-aligned table with a header line.
fn render_table(rows: &[Value]) -> Vec<String> {
    let headers: Vec<String> = match rows.first().and_then(Value::as_object) {
        Some(obj) => obj.keys().cloned().collect(),
        None => return Vec::new(),
    };

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h).map(format_value).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(line(&headers));
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(cells.iter().map(|row| line(row)));
    lines
}

/// Output in JSON format.
fn output_json<T: Serialize + ?Sized>(result: &T, args: &TextmineArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Output in CSV format.
fn output_csv<T: Serialize + ?Sized>(result: &T, _args: &TextmineArgs) -> Result<()> {
    let value = serde_json::to_value(result)?;
    print!("{}", render_csv(&value)?);
    Ok(())
}

/// Render rows as CSV, taking the header from the first row's keys.
fn render_csv(value: &Value) -> Result<String> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    match value {
        Value::Array(arr) => {
            let headers: Vec<String> = arr
                .first()
                .and_then(Value::as_object)
                .map(|obj| obj.keys().cloned().collect())
                .unwrap_or_default();
            if headers.is_empty() {
                for item in arr {
                    writer.write_record([format_csv_value(item)])?;
                }
                return finish_csv(writer);
            }
            writer.write_record(&headers)?;
            for item in arr {
                writer.write_record(
                    headers
                        .iter()
                        .map(|h| item.get(h).map(format_csv_value).unwrap_or_default()),
                )?;
            }
        }
        Value::Object(obj) => {
            writer.write_record(["key", "value"])?;
            for (key, value) in obj {
                writer.write_record([key.clone(), format_csv_value(value)])?;
            }
        }
        _ => {
            writer.write_record(["value"])?;
            writer.write_record([format_csv_value(value)])?;
        }
    }
    finish_csv(writer)
}

fn finish_csv(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| TextmineError::invalid_input(e.to_string()))
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.6}"),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(" ");
            format!("[{formatted_values}]")
        }
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "NA".to_string(),
    }
}

/// Format a JSON value as a single CSV field. Quoting is left to the writer.
fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(" "),
        Value::Object(_) => "[object]".to_string(),
        Value::Null => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_csv_value() {
        assert_eq!(format_csv_value(&Value::String("test".to_string())), "test");
        assert_eq!(format_csv_value(&json!(42)), "42");
        assert_eq!(format_csv_value(&json!(["not", "good"])), "not good");
        assert_eq!(format_csv_value(&Value::Bool(true)), "true");
        assert_eq!(format_csv_value(&Value::Null), "");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::String("test".to_string())), "test");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(0.25)), "0.250000");
        assert_eq!(format_value(&Value::Null), "NA");
    }

    #[test]
    fn test_render_csv_keeps_column_order() {
        let rows = json!([
            {"word": "miss", "n": 3},
            {"word": "emma", "n": 2}
        ]);
        assert_eq!(render_csv(&rows).unwrap(), "word,n\nmiss,3\nemma,2\n");
    }

    #[test]
    fn test_render_csv_quotes_fields() {
        let rows = json!([
            {"word": "well, then", "parts": ["\"no\"", "more"]}
        ]);
        assert_eq!(
            render_csv(&rows).unwrap(),
            "word,parts\n\"well, then\",\"\"\"no\"\" more\"\n"
        );
    }

    #[test]
    fn test_output_result_accepts_slices() {
        use clap::Parser;

        let args = TextmineArgs::try_parse_from(["textmine", "--format", "csv", "tokens", "x.txt"])
            .unwrap();
        let rows = vec![json!({"word": "emma"}), json!({"word": "knightley"})];
        assert!(output_result("Tokens", &rows[..1], &args).is_ok());
    }

    #[test]
    fn test_render_table() {
        let rows = vec![json!({"word": "darcy", "n": 12}), json!({"word": "i", "n": 3})];
        let lines = render_table(&rows);

        assert_eq!(lines[0], "word   n");
        assert_eq!(lines[2], "darcy  12");
        assert_eq!(lines[3], "i      3");
        assert!(render_table(&[]).is_empty());
    }
}
