//! 一括採点
//!
//! 1行目は見出し行、2行目以降は `id,回答1,回答2,...` の CSV を読み、
//! 行ごとに回答数と同じ数の先頭設問で採点する。
//!
//! 行末の空欄は列数合わせとして無視する。途中の空欄は位置がずれるため
//! `IllegalAnswer("")` として行ごと採点しない。

use std::io::Read;

use serde::Serialize;
use tracing::debug;

use crate::question::QuestionStore;
use crate::scoring::{assess, Answer, Assessment};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRow {
    pub id: String,
    pub answered_count: usize,
    #[serde(flatten)]
    pub assessment: Assessment,
}

pub fn read_bulk<'a, R: Read + 'a>(
    reader: R,
    store: &'a QuestionStore,
) -> impl Iterator<Item = Result<BulkRow>> + 'a {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
        .map(move |record| score_record(&record?, store))
}

fn score_record(record: &csv::StringRecord, store: &QuestionStore) -> Result<BulkRow> {
    let mut fields = record.iter();
    let id = fields.next().unwrap_or_default().to_string();
    let mut values: Vec<&str> = fields.collect();
    while values.last().is_some_and(|value| value.is_empty()) {
        values.pop();
    }
    if values.is_empty() {
        return Err(Error::NoAnswers(id));
    }
    let answers = values
        .into_iter()
        .map(str::parse::<Answer>)
        .collect::<Result<Vec<Answer>>>()?;
    let questions = store.prefix(answers.len()).map_err(|error| match error {
        Error::AnsweredCountOutOfRange { .. } => Error::AnswerCountMismatch {
            questions: store.len(),
            answers: answers.len(),
        },
        other => other,
    })?;
    let assessment = assess(questions, &answers)?;
    debug!(%id, answered = answers.len(), "bulk row scored");
    Ok(BulkRow {
        id,
        answered_count: answers.len(),
        assessment,
    })
}
