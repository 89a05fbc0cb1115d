//! Composite goal classifier.
//!
//! A region is tested against two hypotheses: the outer tape rectangle (high
//! goal) and the inner one (middle goal). Each hypothesis needs every feature
//! score at or above its limit; the outer hypothesis is checked first.

use serde::{Deserialize, Serialize};

use crate::score::ScoreSet;

/// Which tape rectangle a region is tested against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hypothesis {
    Outer,
    Inner,
}

impl Hypothesis {
    /// Goal opening plus 4 in of tape on every side, width over height.
    pub fn ideal_aspect_ratio(self) -> f64 {
        match self {
            Hypothesis::Outer => 62.0 / 29.0,
            Hypothesis::Inner => 62.0 / 20.0,
        }
    }

    /// Physical target height in inches used by the distance model.
    pub fn target_height_in(self) -> f64 {
        match self {
            Hypothesis::Outer => 29.0,
            Hypothesis::Inner => 21.0,
        }
    }

    /// Goal class produced when this hypothesis is satisfied.
    pub fn goal_class(self) -> GoalClass {
        match self {
            Hypothesis::Outer => GoalClass::HighGoal,
            Hypothesis::Inner => GoalClass::MiddleGoal,
        }
    }
}

/// Classification of one region.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalClass {
    HighGoal,
    MiddleGoal,
    NotAGoal,
}

impl GoalClass {
    #[inline]
    pub fn is_goal(self) -> bool {
        !matches!(self, GoalClass::NotAGoal)
    }

    /// Hypothesis behind a goal class, `None` for [`GoalClass::NotAGoal`].
    pub fn hypothesis(self) -> Option<Hypothesis> {
        match self {
            GoalClass::HighGoal => Some(Hypothesis::Outer),
            GoalClass::MiddleGoal => Some(Hypothesis::Inner),
            GoalClass::NotAGoal => None,
        }
    }
}

impl std::fmt::Display for GoalClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GoalClass::HighGoal => "high goal",
            GoalClass::MiddleGoal => "middle goal",
            GoalClass::NotAGoal => "not a goal",
        })
    }
}

/// Minimum feature scores a hypothesis must reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreLimits {
    pub rectangularity: f32,
    pub aspect_ratio: f32,
    pub x_edge: f32,
    pub y_edge: f32,
}

impl Default for ScoreLimits {
    fn default() -> Self {
        Self {
            rectangularity: 60.0,
            aspect_ratio: 75.0,
            x_edge: 40.0,
            y_edge: 60.0,
        }
    }
}

impl ScoreLimits {
    /// `true` iff every feature relevant to `hypothesis` meets its limit.
    pub fn satisfied(&self, scores: &ScoreSet, hypothesis: Hypothesis) -> bool {
        scores.rectangularity >= self.rectangularity
            && scores.aspect_ratio(hypothesis) >= self.aspect_ratio
            && scores.x_edge >= self.x_edge
            && scores.y_edge >= self.y_edge
    }
}

/// Resolution when both hypotheses are satisfied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TieBreak {
    /// Outer always wins.
    #[default]
    OuterFirst,
    /// Outer wins unless its aspect-ratio score is below `ratio` times the
    /// inner aspect-ratio score.
    Ratio { ratio: f32 },
}

impl TieBreak {
    /// Hot-goal rectangle ratio used with [`TieBreak::Ratio`].
    pub const HOT_GOAL_RATIO: f32 = 0.95;

    pub fn hot_goal_ratio() -> Self {
        TieBreak::Ratio {
            ratio: Self::HOT_GOAL_RATIO,
        }
    }

    fn resolve(self, scores: &ScoreSet) -> GoalClass {
        match self {
            TieBreak::OuterFirst => GoalClass::HighGoal,
            TieBreak::Ratio { ratio } => {
                if scores.aspect_ratio_outer < ratio * scores.aspect_ratio_inner {
                    GoalClass::MiddleGoal
                } else {
                    GoalClass::HighGoal
                }
            }
        }
    }
}

/// Classify a score set. Pure: same inputs, same class.
pub fn classify(scores: &ScoreSet, limits: &ScoreLimits, tie_break: TieBreak) -> GoalClass {
    let outer = limits.satisfied(scores, Hypothesis::Outer);
    let inner = limits.satisfied(scores, Hypothesis::Inner);
    match (outer, inner) {
        (true, true) => tie_break.resolve(scores),
        (true, false) => GoalClass::HighGoal,
        (false, true) => GoalClass::MiddleGoal,
        (false, false) => GoalClass::NotAGoal,
    }
}
