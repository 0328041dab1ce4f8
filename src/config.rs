use std::path::{Path, PathBuf};

use tracing::debug;

use crate::question::QuestionStore;
use crate::Result;

pub const QUESTIONS_ENV: &str = "DASS21_QUESTIONS";
pub const HOME_IMAGE_ENV: &str = "DASS21_HOME_IMAGE";
pub const DEFAULT_HOME_IMAGE: &str = "resources/anxiety.jpg";

/// 実行時設定
///
/// 既定値 → 環境変数 → コマンドライン引数 の順に上書きする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 設問ファイル。`None` なら同梱の設問を使う。
    pub questions: Option<PathBuf>,
    /// ホーム画面の画像
    pub home_image: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions: None,
            home_image: PathBuf::from(DEFAULT_HOME_IMAGE),
        }
    }
}

impl Config {
    /// - `DASS21_QUESTIONS`: 設問 CSV のパス
    /// - `DASS21_HOME_IMAGE`: ホーム画面の画像のパス
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).map(PathBuf::from))
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let defaults = Self::default();
        Self {
            questions: lookup(QUESTIONS_ENV),
            home_image: lookup(HOME_IMAGE_ENV).unwrap_or(defaults.home_image),
        }
    }

    pub fn with_questions(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.questions = path;
        }
        self
    }

    pub fn with_home_image(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.home_image = path;
        }
        self
    }

    pub fn load_store(&self) -> Result<QuestionStore> {
        match &self.questions {
            Some(path) => QuestionStore::from_path(path),
            None => {
                debug!("using bundled questions");
                QuestionStore::bundled().cloned()
            }
        }
    }

    /// 画像ファイルが存在するときだけパスを返す
    pub fn home_image(&self) -> Option<&Path> {
        self.home_image
            .is_file()
            .then_some(self.home_image.as_path())
    }
}
