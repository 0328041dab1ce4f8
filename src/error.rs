use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// 提示された設問の範囲外
    #[error("no question at position {0}")]
    IllegalQuestion(usize),

    /// 回答選択肢が違反
    #[error("answer '{0}' is not one of 0, 1, 2, 3")]
    IllegalAnswer(String),

    /// 設問数と回答数が一致しない
    #[error("{answers} answers given for {questions} questions")]
    AnswerCountMismatch { questions: usize, answers: usize },

    /// 回答が1つもない行
    #[error("row '{0}' has no answers")]
    NoAnswers(String),

    /// 回答設問数が 1〜設問総数 の範囲外
    #[error("answered count {count} is outside 1..={total}")]
    AnsweredCountOutOfRange { count: usize, total: usize },

    /// 尺度コードが s / a / d のいずれでもない
    #[error("unknown category code '{code}' for question {number}")]
    UnknownCategory { number: u32, code: String },

    /// 設問ファイルが空
    #[error("question file has no rows")]
    EmptyStore,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
