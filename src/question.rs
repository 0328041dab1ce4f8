use std::fmt;
use std::io::Read;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

static BUNDLED_CSV: &str = include_str!("../resources/DASS21_v1.csv");
static BUNDLED: OnceCell<QuestionStore> = OnceCell::new();

/// DASS-21 の尺度
///
/// 宣言順がそのまま表示順（Stress, Anxiety, Depression）になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stress,
    Anxiety,
    Depression,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Stress, Category::Anxiety, Category::Depression];

    /// 設問ファイル上のコード
    pub const fn code(self) -> char {
        match self {
            Category::Stress => 's',
            Category::Anxiety => 'a',
            Category::Depression => 'd',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::Stress => "Stress",
            Category::Anxiety => "Anxiety",
            Category::Depression => "Depression",
        }
    }

    /// グラフの軸ラベル
    pub fn label(self) -> String {
        format!("{} ({})", self.name(), self.code().to_ascii_uppercase())
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "s" => Some(Category::Stress),
            "a" => Some(Category::Anxiety),
            "d" => Some(Category::Depression),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub number: u32,
    pub text: String,
    pub category: Category,
}

impl Question {
    /// 回答欄に表示する設問文
    pub fn prompt(&self) -> String {
        format!("{}. {}", self.number, self.text)
    }
}

/// 設問ファイルの1行
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    qno: u32,
    qtext: String,
    cat: String,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = Error;

    fn try_from(record: QuestionRecord) -> Result<Self> {
        let category = Category::from_code(&record.cat).ok_or_else(|| Error::UnknownCategory {
            number: record.qno,
            code: record.cat.clone(),
        })?;
        Ok(Question {
            number: record.qno,
            text: record.qtext,
            category,
        })
    }
}

/// 設問マスタ
///
/// ファイルの行順を保持する。回答は常にこの順で設問と対応付けられる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStore {
    questions: Vec<Question>,
}

impl QuestionStore {
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::EmptyStore);
        }
        Ok(Self { questions })
    }

    /// `qno`, `qtext`, `cat` 列を持つ CSV を読み込む
    ///
    /// 他の列は無視する。
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let questions = reader
            .deserialize::<QuestionRecord>()
            .map(|record| Question::try_from(record?))
            .collect::<Result<Vec<Question>>>()?;
        Self::new(questions)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(std::io::BufReader::new(file))?;
        debug!(path = %path.display(), questions = store.len(), "question file loaded");
        Ok(store)
    }

    /// 同梱の DASS-21 設問（初回呼び出し時に一度だけ解析する）
    pub fn bundled() -> Result<&'static QuestionStore> {
        BUNDLED.get_or_try_init(|| {
            let store = Self::from_reader(BUNDLED_CSV.as_bytes())?;
            debug!(questions = store.len(), "bundled questions parsed");
            Ok(store)
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// 設問番号を指定して設問を取得する
    pub fn question(&self, number: u32) -> Option<&Question> {
        self.questions.iter().find(|question| question.number == number)
    }

    /// 全設問を取得する
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// 先頭 `count` 問
    ///
    /// `count` は 1〜設問総数 でなければならない。
    pub fn prefix(&self, count: usize) -> Result<&[Question]> {
        if count == 0 || count > self.len() {
            return Err(Error::AnsweredCountOutOfRange {
                count,
                total: self.len(),
            });
        }
        Ok(&self.questions[..count])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get() {
        let store = QuestionStore::bundled().unwrap();
        assert_eq!(Some(1), store.get(0).map(|q| q.number));
        assert_eq!(Some(21), store.get(20).map(|q| q.number));
        assert_eq!(None, store.get(21).map(|q| q.number));
    }

    #[test]
    fn test_question() {
        let store = QuestionStore::bundled().unwrap();
        assert_eq!(Some(1), store.question(1).map(|q| q.number));
        assert_eq!(Some(21), store.question(21).map(|q| q.number));
        assert_eq!(None, store.question(22).map(|q| q.number));
    }

    #[test]
    fn test_bundled_categories() {
        let store = QuestionStore::bundled().unwrap();
        assert_eq!(store.len(), 21);
        for category in Category::ALL {
            let count = store
                .questions()
                .iter()
                .filter(|q| q.category == category)
                .count();
            assert_eq!(count, 7, "{category}");
        }
        assert_eq!(store.question(4).map(|q| q.category), Some(Category::Anxiety));
        assert!(store.question(4).unwrap().text.contains("breathlessness"));
    }

    #[test]
    fn test_from_reader_ignores_extra_columns() {
        let csv = "qno,extra,qtext,cat\n1,x,First, S \n2,y,Second,d\n";
        let store = QuestionStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).map(|q| q.category), Some(Category::Stress));
        assert_eq!(store.get(1).map(|q| q.text.as_str()), Some("Second"));
    }

    #[test]
    fn test_unknown_category() {
        let csv = "qno,qtext,cat\n1,First,s\n2,Second,x\n";
        match QuestionStore::from_reader(csv.as_bytes()) {
            Err(Error::UnknownCategory { number, code }) => {
                assert_eq!(number, 2);
                assert_eq!(code, "x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_store() {
        let csv = "qno,qtext,cat\n";
        assert!(matches!(
            QuestionStore::from_reader(csv.as_bytes()),
            Err(Error::EmptyStore)
        ));
    }

    #[test]
    fn test_missing_column() {
        let csv = "qno,qtext\n1,First\n";
        assert!(matches!(
            QuestionStore::from_reader(csv.as_bytes()),
            Err(Error::Csv(_))
        ));
    }

    #[test]
    fn test_prefix() {
        let store = QuestionStore::bundled().unwrap();
        assert_eq!(store.prefix(1).unwrap().len(), 1);
        assert_eq!(store.prefix(21).unwrap(), store.questions());
        assert!(store.prefix(0).is_err());
        assert!(store.prefix(22).is_err());
    }

    #[test]
    fn test_prompt_and_label() {
        let store = QuestionStore::bundled().unwrap();
        assert_eq!(
            store.get(0).unwrap().prompt(),
            "1. I found it hard to wind down"
        );
        assert_eq!(Category::Depression.label(), "Depression (D)");
    }
}
