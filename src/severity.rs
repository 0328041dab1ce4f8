use std::fmt;

use serde::Serialize;

use crate::question::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Mild,
    Moderate,
    Severe,
}

impl SeverityLevel {
    pub const fn name(self) -> &'static str {
        match self {
            SeverityLevel::Mild => "Mild",
            SeverityLevel::Moderate => "Moderate",
            SeverityLevel::Severe => "Severe",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Category {
    /// 判定基準点
    ///
    /// 基準点以下は Mild、基準点の2倍以下は Moderate、それを超えると Severe。
    pub const fn base_threshold(self) -> u32 {
        match self {
            Category::Stress => 14,
            Category::Anxiety => 7,
            Category::Depression => 10,
        }
    }
}

pub fn classify(category: Category, total: u32) -> SeverityLevel {
    let base = category.base_threshold();
    match total {
        total if total <= base => SeverityLevel::Mild,
        total if total <= base * 2 => SeverityLevel::Moderate,
        _ => SeverityLevel::Severe,
    }
}
