use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::question::{Category, Question};
use crate::severity::{classify, SeverityLevel};
use crate::{Error, Result};

/// 回答（0〜3 の4件法）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Answer(u8);

impl Answer {
    pub const MAX: u8 = 3;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Answer {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if value <= Self::MAX {
            Ok(Answer(value))
        } else {
            Err(Error::IllegalAnswer(value.to_string()))
        }
    }
}

impl FromStr for Answer {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        value
            .parse::<u8>()
            .map_err(|_| Error::IllegalAnswer(value.to_string()))
            .and_then(Answer::try_from)
    }
}

impl From<Answer> for u32 {
    fn from(answer: Answer) -> Self {
        answer.0.into()
    }
}

/// 尺度ごとの合計点
///
/// 採点対象に現れなかった尺度は含まない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<Category, u32>);

impl CategoryTotals {
    pub fn get(&self, category: Category) -> Option<u32> {
        self.0.get(&category).copied()
    }

    /// 表示順（Stress, Anxiety, Depression）で返す
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        self.0.iter().map(|(&category, &total)| (category, total))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn classify(&self) -> Vec<CategoryLevel> {
        self.iter()
            .map(|(category, total)| CategoryLevel {
                category,
                total,
                level: classify(category, total),
            })
            .collect()
    }
}

impl FromIterator<(Category, u32)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (Category, u32)>>(iter: I) -> Self {
        let mut totals = BTreeMap::new();
        for (category, value) in iter {
            *totals.entry(category).or_insert(0) += value;
        }
        CategoryTotals(totals)
    }
}

impl fmt::Display for CategoryTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (category, total) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", category, total)?;
            first = false;
        }
        Ok(())
    }
}

/// 合計点数方式
///
/// 設問と回答を先頭から順に対応付け、尺度ごとに合計する。
/// 設問数と回答数が異なる場合は対応がずれるため採点しない。
pub fn calculate_scores(questions: &[Question], answers: &[Answer]) -> Result<CategoryTotals> {
    if questions.len() != answers.len() {
        warn!(
            questions = questions.len(),
            answers = answers.len(),
            "answer count does not match question count"
        );
        return Err(Error::AnswerCountMismatch {
            questions: questions.len(),
            answers: answers.len(),
        });
    }
    let totals = sum_by_category(questions, answers);
    debug!(%totals, "scores calculated");
    Ok(totals)
}

fn sum_by_category(questions: &[Question], answers: &[Answer]) -> CategoryTotals {
    questions
        .iter()
        .zip(answers)
        .map(|(question, &answer)| (question.category, u32::from(answer)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryLevel {
    pub category: Category,
    pub total: u32,
    pub level: SeverityLevel,
}

/// 採点結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub totals: CategoryTotals,
    pub levels: Vec<CategoryLevel>,
}

impl Assessment {
    pub fn from_totals(totals: CategoryTotals) -> Self {
        let levels = totals.classify();
        Self { totals, levels }
    }

    pub fn level(&self, category: Category) -> Option<SeverityLevel> {
        self.levels
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.level)
    }
}

pub fn assess(questions: &[Question], answers: &[Answer]) -> Result<Assessment> {
    calculate_scores(questions, answers).map(Assessment::from_totals)
}

/// 提示した設問に紐づく回答用紙
///
/// 設問スライスと同じ長さの回答を持ち、未回答は 0 として扱う。
/// 設問と回答の対応は構築時に固定されるので、採点で長さの検査は不要。
#[derive(Debug, Clone)]
pub struct AnswerSheet<'a> {
    questions: &'a [Question],
    values: Vec<Answer>,
    offset: usize,
}

impl<'a> AnswerSheet<'a> {
    pub fn new(questions: &'a [Question]) -> Self {
        Self {
            questions,
            values: vec![Answer::default(); questions.len()],
            offset: 0,
        }
    }

    pub fn questions(&self) -> &'a [Question] {
        self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.values
    }

    /// 次の設問へ回答を格納する
    pub fn push(&mut self, value: u8) -> Result<()> {
        let answer = Answer::try_from(value)?;
        let slot = self
            .values
            .get_mut(self.offset)
            .ok_or(Error::IllegalQuestion(self.offset + 1))?;
        *slot = answer;
        self.offset += 1;
        Ok(())
    }

    /// 何問目か（1始まり）を指定して回答を格納する
    pub fn insert(&mut self, position: usize, value: u8) -> Result<()> {
        let answer = Answer::try_from(value)?;
        let slot = position
            .checked_sub(1)
            .and_then(|index| self.values.get_mut(index))
            .ok_or(Error::IllegalQuestion(position))?;
        *slot = answer;
        Ok(())
    }

    /// 次に回答すべき設問
    pub fn current(&self) -> Option<&'a Question> {
        self.questions.get(self.offset)
    }

    pub fn is_complete(&self) -> bool {
        self.offset >= self.values.len()
    }

    pub fn scores(&self) -> CategoryTotals {
        sum_by_category(self.questions, &self.values)
    }

    pub fn assess(&self) -> Assessment {
        Assessment::from_totals(self.scores())
    }
}
