//! 画面の組み立て
//!
//! 利用者の操作ごとに [`Request`] を作り、[`handle`] で [`Page`] を得る。
//! `handle` は入力だけから結果を決める純粋な関数で、表示方法は呼び出し側に任せる。

use std::fmt;

use tracing::debug;

use crate::chart::{plot_distribution, Distribution};
use crate::question::{Question, QuestionStore};
use crate::scoring::{assess, Answer, Assessment};
use crate::Result;

const CHART_WIDTH: usize = 40;

/// ナビゲーションの選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Menu {
    Home,
    Dataset,
    Prediction,
}

impl Menu {
    pub const ALL: [Menu; 3] = [Menu::Home, Menu::Dataset, Menu::Prediction];

    pub const fn title(self) -> &'static str {
        match self {
            Menu::Home => "Home",
            Menu::Dataset => "Dataset",
            Menu::Prediction => "Prediction",
        }
    }
}

/// 予測画面の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionInput {
    /// 回答する設問数（1〜設問総数）
    pub answered_count: usize,
    /// 先頭 `answered_count` 問への回答
    pub answers: Vec<Answer>,
    /// 「結果を見る」が押されたか
    pub show_results: bool,
}

impl PredictionInput {
    /// 初期表示: 全問回答、回答はすべて 0、結果は未表示
    pub fn new(total_questions: usize) -> Self {
        Self {
            answered_count: total_questions,
            answers: vec![Answer::default(); total_questions],
            show_results: false,
        }
    }

    /// 回答設問数を変える
    ///
    /// 既に入力済みの回答は残し、増えた分は 0 で埋める。
    pub fn with_answered_count(mut self, answered_count: usize) -> Self {
        self.answered_count = answered_count;
        self.answers.resize(answered_count, Answer::default());
        self
    }

    pub fn with_answers(mut self, answers: Vec<Answer>) -> Self {
        self.answers = answers;
        self
    }

    pub fn confirmed(mut self) -> Self {
        self.show_results = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Home,
    Dataset,
    Prediction(PredictionInput),
}

impl Request {
    pub fn menu(&self) -> Menu {
        match self {
            Request::Home => Menu::Home,
            Request::Dataset => Menu::Dataset,
            Request::Prediction(_) => Menu::Prediction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    pub title: &'static str,
    pub welcome: &'static str,
    pub about: &'static str,
    pub image_caption: &'static str,
}

impl Default for HomePage {
    fn default() -> Self {
        Self {
            title: "DASS-21 Anxiety Level Assessment",
            welcome: "Welcome! This application helps you assess your levels of \
                      Stress, Anxiety, and Depression based on the DASS-21 questionnaire.",
            about: "This application is based on the DASS-21, \
                    which helps measure levels of Stress, Anxiety, and Depression.",
            image_caption: "DASS-21 Assessment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPage<'a> {
    pub questions: &'a [Question],
}

/// 予測ページ
///
/// 表示（`Display`）はグラフと結果だけ。設問文は回答を集める側が
/// `Question::prompt` で1問ずつ出す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionPage<'a> {
    /// 回答欄を出す設問。表示には含めない
    pub questions: &'a [Question],
    pub distribution: Distribution,
    /// 「結果を見る」が押されたときだけ存在する
    pub results: Option<Assessment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<'a> {
    Home(HomePage),
    Dataset(DatasetPage<'a>),
    Prediction(PredictionPage<'a>),
}

pub fn handle<'a>(store: &'a QuestionStore, request: &Request) -> Result<Page<'a>> {
    debug!(menu = request.menu().title(), "handling request");
    match request {
        Request::Home => Ok(Page::Home(HomePage::default())),
        Request::Dataset => Ok(Page::Dataset(DatasetPage {
            questions: store.questions(),
        })),
        Request::Prediction(input) => prediction(store, input).map(Page::Prediction),
    }
}

fn prediction<'a>(store: &'a QuestionStore, input: &PredictionInput) -> Result<PredictionPage<'a>> {
    let questions = store.prefix(input.answered_count)?;
    let distribution = plot_distribution(store, input.answered_count)?;
    let results = if input.show_results {
        Some(assess(questions, &input.answers)?)
    } else {
        None
    };
    Ok(PredictionPage {
        questions,
        distribution,
        results,
    })
}

impl fmt::Display for HomePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        writeln!(f, "{}", self.welcome)?;
        writeln!(f)?;
        writeln!(f, "About: {}", self.about)
    }
}

impl fmt::Display for DatasetPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DASS-21 Dataset")?;
        writeln!(f)?;
        writeln!(f, "{:>3}  {:<3}  qtext", "qno", "cat")?;
        for question in self.questions {
            writeln!(
                f,
                "{:>3}  {:<3}  {}",
                question.number,
                question.category.code(),
                question.text
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for PredictionPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.distribution.text(CHART_WIDTH))?;
        if let Some(results) = &self.results {
            writeln!(f)?;
            write!(f, "{}", ResultsView(results))?;
        }
        Ok(())
    }
}

/// 合計点と判定結果の表示
pub struct ResultsView<'a>(pub &'a Assessment);

impl fmt::Display for ResultsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Here are your results:")?;
        for (category, total) in self.0.totals.iter() {
            writeln!(f, "{}: {}", category, total)?;
        }
        writeln!(f)?;
        writeln!(f, "Result categories:")?;
        for entry in &self.0.levels {
            writeln!(f, "{}: {}", entry.category, entry.level)?;
        }
        Ok(())
    }
}

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Home(page) => fmt::Display::fmt(page, f),
            Page::Dataset(page) => fmt::Display::fmt(page, f),
            Page::Prediction(page) => fmt::Display::fmt(page, f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::question::Category;
    use crate::severity::SeverityLevel;
    use crate::Error;

    fn answers(values: &[u8]) -> Vec<Answer> {
        values
            .iter()
            .map(|&value| Answer::try_from(value).unwrap())
            .collect()
    }

    #[test]
    fn test_defaults() {
        let input = PredictionInput::new(21);
        assert_eq!(input.answered_count, 21);
        assert_eq!(input.answers.len(), 21);
        assert!(input.answers.iter().all(|answer| answer.value() == 0));
        assert!(!input.show_results);
    }

    #[test]
    fn test_prediction_without_confirmation() {
        let store = QuestionStore::bundled().unwrap();
        let request = Request::Prediction(PredictionInput::new(store.len()).with_answered_count(5));
        match handle(store, &request).unwrap() {
            Page::Prediction(page) => {
                assert_eq!(page.questions.len(), 5);
                assert_eq!(page.distribution.total(), 5);
                assert!(page.results.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_prediction_with_results() {
        let store = QuestionStore::bundled().unwrap();
        let input = PredictionInput::new(store.len())
            .with_answers(answers(&[1; 21]))
            .confirmed();
        let page = handle(store, &Request::Prediction(input)).unwrap();
        let Page::Prediction(prediction) = &page else {
            panic!("unexpected {page:?}");
        };
        let results = prediction.results.as_ref().unwrap();
        assert_eq!(results.totals.get(Category::Anxiety), Some(7));
        assert_eq!(results.level(Category::Anxiety), Some(SeverityLevel::Mild));

        let text = page.to_string();
        assert!(text.contains("Stress: 7\nAnxiety: 7\nDepression: 7\n"));
        assert!(text.contains("Stress: Mild\nAnxiety: Mild\nDepression: Mild\n"));
    }

    #[test]
    fn test_shrinking_keeps_answers_aligned() {
        let store = QuestionStore::bundled().unwrap();
        let input = PredictionInput::new(store.len())
            .with_answers(answers(&[3; 21]))
            .with_answered_count(3)
            .confirmed();
        assert_eq!(input.answers.len(), 3);
        let Page::Prediction(page) = handle(store, &Request::Prediction(input)).unwrap() else {
            panic!("expected prediction page");
        };
        let results = page.results.unwrap();
        // 1: s, 2: a, 3: d
        assert_eq!(results.totals.get(Category::Stress), Some(3));
        assert_eq!(results.totals.get(Category::Anxiety), Some(3));
        assert_eq!(results.totals.get(Category::Depression), Some(3));
    }

    #[test]
    fn test_mismatched_answers_rejected() {
        let store = QuestionStore::bundled().unwrap();
        let input = PredictionInput::new(store.len())
            .with_answered_count(4)
            .with_answers(answers(&[1, 1]))
            .confirmed();
        assert!(matches!(
            handle(store, &Request::Prediction(input)),
            Err(Error::AnswerCountMismatch {
                questions: 4,
                answers: 2
            })
        ));
    }

    #[test]
    fn test_answered_count_out_of_range() {
        let store = QuestionStore::bundled().unwrap();
        let input = PredictionInput::new(store.len()).with_answered_count(0);
        assert!(matches!(
            handle(store, &Request::Prediction(input)),
            Err(Error::AnsweredCountOutOfRange { count: 0, total: 21 })
        ));
    }

    #[test]
    fn test_prediction_text_leaves_prompts_to_caller() {
        let store = QuestionStore::bundled().unwrap();
        let input = PredictionInput::new(store.len())
            .with_answered_count(2)
            .with_answers(answers(&[1, 2]))
            .confirmed();
        let Page::Prediction(page) = handle(store, &Request::Prediction(input)).unwrap() else {
            panic!("expected prediction page");
        };
        assert_eq!(page.questions.len(), 2);

        let text = page.to_string();
        assert!(text.starts_with("Category distribution (2 questions answered)\n"));
        for question in page.questions {
            assert!(!text.contains(&question.prompt()));
        }
        assert!(text.contains("Here are your results:"));
    }

    #[test]
    fn test_dataset_lists_every_question() {
        let store = QuestionStore::bundled().unwrap();
        let page = handle(store, &Request::Dataset).unwrap();
        let text = page.to_string();
        assert_eq!(text.lines().count(), 3 + store.len());
        assert!(text.contains(" 21  d    I felt that life was meaningless"));
    }

    #[test]
    fn test_home() {
        let store = QuestionStore::bundled().unwrap();
        let page = handle(store, &Request::Home).unwrap();
        assert!(page.to_string().starts_with("DASS-21 Anxiety Level Assessment\n"));
    }
}
