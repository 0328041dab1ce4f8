//! DASS-21（抑うつ・不安・ストレス尺度）の採点
//!
//! 各設問への 0〜3 の回答を尺度ごとに合計し、基準点で
//! Mild / Moderate / Severe に判定する。

pub mod bulk;
pub mod chart;
pub mod config;
pub mod error;
pub mod logging;
pub mod page;
pub mod question;
pub mod scoring;
pub mod severity;

pub use bulk::{read_bulk, BulkRow};
pub use chart::{plot_distribution, Distribution};
pub use config::Config;
pub use error::{Error, Result};
pub use page::{handle, Menu, Page, PredictionInput, Request};
pub use question::{Category, Question, QuestionStore};
pub use scoring::{assess, calculate_scores, Answer, AnswerSheet, Assessment, CategoryTotals};
pub use severity::{classify, SeverityLevel};
