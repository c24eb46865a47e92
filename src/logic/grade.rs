//! Rock-Burst Grades
//!
//! Ordinal risk categories, label 0..=3. Texts are fixed; the mapping from
//! label to text never depends on the model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RockBurstGrade {
    None = 0,
    Weak = 1,
    Moderate = 2,
    Strong = 3,
}

impl RockBurstGrade {
    pub const ALL: [RockBurstGrade; 4] = [
        RockBurstGrade::None,
        RockBurstGrade::Weak,
        RockBurstGrade::Moderate,
        RockBurstGrade::Strong,
    ];

    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(RockBurstGrade::None),
            1 => Some(RockBurstGrade::Weak),
            2 => Some(RockBurstGrade::Moderate),
            3 => Some(RockBurstGrade::Strong),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        self as u8
    }

    pub fn text(self) -> &'static str {
        match self {
            RockBurstGrade::None => "No rock-burst tendency",
            RockBurstGrade::Weak => "Weak rock-burst tendency",
            RockBurstGrade::Moderate => "Moderate rock-burst tendency",
            RockBurstGrade::Strong => "Strong rock-burst tendency",
        }
    }

    pub fn text_zh(self) -> &'static str {
        match self {
            RockBurstGrade::None => "无岩爆倾向",
            RockBurstGrade::Weak => "弱岩爆倾向",
            RockBurstGrade::Moderate => "中等岩爆倾向",
            RockBurstGrade::Strong => "强岩爆倾向",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RockBurstGrade::None => {
                "The rock mass stays stable during excavation; rock-burst is unlikely."
            }
            RockBurstGrade::Weak => {
                "Minor spalling may occur, small in scale with limited damage."
            }
            RockBurstGrade::Moderate => {
                "Clear rock-burst tendency; moderate events are possible and preventive measures are required."
            }
            RockBurstGrade::Strong => {
                "Strong rock-burst tendency; large events are likely and strict monitoring and protection are required."
            }
        }
    }
}

impl std::fmt::Display for RockBurstGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (grade {})", self.text(), self.label())
    }
}

/// Catalog entry for front ends
#[derive(Debug, Clone, Serialize)]
pub struct GradeInfo {
    pub label: u8,
    pub grade: RockBurstGrade,
    pub text: &'static str,
    pub text_zh: &'static str,
    pub description: &'static str,
}

pub fn catalog() -> Vec<GradeInfo> {
    RockBurstGrade::ALL
        .iter()
        .map(|&grade| GradeInfo {
            label: grade.label(),
            grade,
            text: grade.text(),
            text_zh: grade.text_zh(),
            description: grade.description(),
        })
        .collect()
}
