//! Engineering Advice
//!
//! Static prevention guidance shown next to a prediction.

use serde::Serialize;

use super::grade::RockBurstGrade;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub content: &'static str,
}

/// General recommendations, independent of the predicted grade
pub const RECOMMENDATIONS: [Recommendation; 5] = [
    Recommendation {
        title: "Assessment and monitoring",
        content: "Before tunnelling or underground excavation, carry out a detailed rock-mass stability assessment and deploy real-time monitoring.",
    },
    Recommendation {
        title: "Excavation technique",
        content: "In zones with moderate or higher tendency, use controlled blasting and staged excavation to limit disturbance.",
    },
    Recommendation {
        title: "Stress relief",
        content: "Use pre-split or smooth blasting to reduce vibration; in strong-tendency zones consider stress-relief boreholes.",
    },
    Recommendation {
        title: "Support and reinforcement",
        content: "Choose support according to grade, such as flexible support, high-strength rock bolts or yielding support.",
    },
    Recommendation {
        title: "Emergency response",
        content: "Maintain an emergency plan, keep rescue equipment on hand and train personnel regularly.",
    },
];

/// Grade-specific emphasis
pub fn guidance(grade: RockBurstGrade) -> &'static str {
    match grade {
        RockBurstGrade::None => "Routine geological inspection is sufficient; keep standard support.",
        RockBurstGrade::Weak => "Monitor for spalling and apply local reinforcement where it appears.",
        RockBurstGrade::Moderate => "Apply controlled blasting, staged excavation and systematic bolting with monitoring.",
        RockBurstGrade::Strong => "Apply stress relief before excavation, yielding support and continuous micro-seismic monitoring.",
    }
}

/// Advice bundle for one prediction
#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub grade: RockBurstGrade,
    pub guidance: &'static str,
    pub recommendations: &'static [Recommendation],
}

pub fn for_grade(grade: RockBurstGrade) -> Advice {
    Advice {
        grade,
        guidance: guidance(grade),
        recommendations: &RECOMMENDATIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_grade_has_guidance() {
        for grade in RockBurstGrade::ALL {
            assert!(!guidance(grade).is_empty());
        }
    }

    #[test]
    fn test_for_grade() {
        let advice = for_grade(RockBurstGrade::Strong);
        assert_eq!(advice.recommendations.len(), 5);
        assert!(advice.guidance.contains("stress relief"));
    }
}
