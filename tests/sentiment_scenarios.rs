//! Integration tests for lexicon joins, sums and pivots.

use std::io::Cursor;

use textmine::aggregate::{Column, Fill, Key, count, join, join_on, pivot, sum_values};
use textmine::analysis::char_filter::Normalizer;
use textmine::analysis::pipeline::Pipeline;
use textmine::analysis::token::{TokenRecord, TokenTable};
use textmine::analysis::tokenizer::TokenizerMode;
use textmine::corpus::Corpus;
use textmine::error::{Result, TextmineError};
use textmine::lexicon::Lexicon;

fn words(words: &[&str]) -> TokenTable {
    words.iter().map(|w| TokenRecord::word(*w, 1)).collect()
}

fn afinn() -> Lexicon {
    Lexicon::from_values("afinn", vec![("good", 3), ("bad", -3)])
}

fn nrc() -> Result<Lexicon> {
    let tsv = "abandon\tfear\nabandon\tnegative\nabandon\tsadness\nfriend\tjoy\nfriend\tpositive\nfriend\ttrust\n";
    Lexicon::from_tsv_reader("nrc", Cursor::new(tsv))
}

#[test]
fn test_afinn_sum() -> Result<()> {
    let tokens = words(&["good", "bad", "good"]);
    let joined = join(&tokens, &afinn());

    assert_eq!(joined.len(), 3);
    let sums = sum_values(&joined, &[])?;
    assert_eq!(sums.get(&[]), Some(3));

    Ok(())
}

#[test]
fn test_one_to_many_join() -> Result<()> {
    let tokens = words(&["abandon", "the", "friend", "abandon"]);
    let lexicon = nrc()?;
    let joined = join(&tokens, &lexicon);

    assert_eq!(joined.len(), 9);
    assert!(joined.len() <= tokens.len() * lexicon.max_fan_out());

    let first: Vec<Option<&str>> = joined[..3]
        .iter()
        .map(|r| r.entry.sentiment.as_deref())
        .collect();
    assert_eq!(first, vec![Some("fear"), Some("negative"), Some("sadness")]);

    let by_label = count(&joined, &[Column::Sentiment])?;
    assert_eq!(by_label.get(&[Key::text("fear")]), Some(2));
    assert_eq!(by_label.get(&[Key::text("joy")]), Some(1));

    Ok(())
}

#[test]
fn test_join_mismatch_is_empty() -> Result<()> {
    let tokens = words(&["whale", "sea"]);
    let joined = join(&tokens, &afinn());
    assert!(joined.is_empty());

    let sums = sum_values(&joined, &[Column::Feature])?;
    assert!(sums.is_empty());

    Ok(())
}

#[test]
fn test_sum_requires_values() -> Result<()> {
    let tokens = words(&["friend"]);
    let joined = join(&tokens, &nrc()?);

    assert!(matches!(
        sum_values(&joined, &[]),
        Err(TextmineError::InvalidInput(_))
    ));
    Ok(())
}

#[test]
fn test_negated_bigrams() -> Result<()> {
    let tokens = Pipeline::with_mode(&TokenizerMode::Ngram { n: 2 })?
        .with_normalizer(Normalizer::default())
        .run_corpus(&Corpus::from_rows(vec![("emma", "not good at all, not bad")]))?;

    let negated: TokenTable = tokens
        .iter()
        .filter(|r| r.part(1) == Some("not"))
        .cloned()
        .collect();
    let joined = join_on(&negated, &afinn(), &Column::Part(2))?;

    let second: Vec<&str> = joined.iter().map(|r| r.token.parts[1].as_str()).collect();
    assert_eq!(second, vec!["good", "bad"]);
    assert_eq!(sum_values(&joined, &[])?.get(&[]), Some(0));

    Ok(())
}

#[test]
fn test_net_sentiment_per_bucket() -> Result<()> {
    let lexicon = Lexicon::from_labels(
        "bing",
        vec![("happy", "positive"), ("kind", "positive"), ("dull", "negative")],
    );
    let tokens: TokenTable = [(1, "happy"), (2, "kind"), (3, "dull"), (5, "dull"), (6, "kind")]
        .iter()
        .map(|(line, w)| TokenRecord::word(*w, *line).with_feature("emma"))
        .collect();

    let joined = join(&tokens, &lexicon);
    let counts = count(&joined, &[Column::Feature, Column::Bucket(4), Column::Sentiment])?;
    let wide = pivot(&counts, &Column::Sentiment, Fill::Zero)?;

    assert_eq!(
        wide.row_keys(),
        &[
            vec![Key::text("emma"), Key::Int(0)],
            vec![Key::text("emma"), Key::Int(1)]
        ]
    );
    let net = wide.difference(&Key::text("positive"), &Key::text("negative"))?;
    assert_eq!(net.iter().map(|(_, n)| *n).collect::<Vec<_>>(), vec![1, 0]);

    Ok(())
}

#[test]
fn test_pivot_round_trip() -> Result<()> {
    let tokens: TokenTable = [("emma", "miss"), ("emma", "emma"), ("persuasion", "anne"), ("emma", "miss")]
        .iter()
        .map(|(book, w)| TokenRecord::word(*w, 1).with_feature(book))
        .collect();
    let long = count(&tokens, &[Column::Feature, Column::Word])?;

    for fill in [Fill::Zero, Fill::Absent] {
        let wide = pivot(&long, &Column::Word, fill)?;
        assert_eq!(wide.column_keys().len(), 3);

        let back = wide.to_long()?;
        assert_eq!(back.len(), long.len());
        for (key, n) in long.iter() {
            assert_eq!(back.get(key), Some(n));
        }
    }

    let absent = pivot(&long, &Column::Word, Fill::Absent)?;
    assert_eq!(absent.get(&[Key::text("persuasion")], &Key::text("miss")), None);
    let zero = pivot(&long, &Column::Word, Fill::Zero)?;
    assert_eq!(zero.get(&[Key::text("persuasion")], &Key::text("miss")), Some(0));

    Ok(())
}
