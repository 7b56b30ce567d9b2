use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::models::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StronglyRecommend,
    Recommend,
    Neutral,
    NotRecommend,
    StronglyNotRecommend,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StronglyRecommend => "strongly_recommend",
            Recommendation::Recommend => "recommend",
            Recommendation::Neutral => "neutral",
            Recommendation::NotRecommend => "not_recommend",
            Recommendation::StronglyNotRecommend => "strongly_not_recommend",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            Recommendation::StronglyRecommend | Recommendation::Recommend
        )
    }

    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Recommendation::StronglyNotRecommend | Recommendation::NotRecommend
        )
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strongly_recommend" => Ok(Recommendation::StronglyRecommend),
            "recommend" => Ok(Recommendation::Recommend),
            "neutral" => Ok(Recommendation::Neutral),
            "not_recommend" => Ok(Recommendation::NotRecommend),
            "strongly_not_recommend" => Ok(Recommendation::StronglyNotRecommend),
            _ => Err(UnknownVariant::new("recommendation", s)),
        }
    }
}

crate::text_enum_sqlx!(Recommendation);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub interview_id: i64,
    pub candidate_id: i64,
    pub company_id: Option<i64>,
    pub technical_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub problem_solving_rating: Option<i32>,
    pub cultural_fit_rating: Option<i32>,
    pub leadership_rating: Option<i32>,
    pub overall_rating: i32,
    pub recommendation: Recommendation,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub interview_id: i64,
    pub candidate_id: i64,
    pub company_id: Option<i64>,
    pub technical_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub problem_solving_rating: Option<i32>,
    pub cultural_fit_rating: Option<i32>,
    pub leadership_rating: Option<i32>,
    pub overall_rating: i32,
    pub recommendation: Recommendation,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub company_id: Option<i64>,
    pub candidate_id: Option<i64>,
}

impl FeedbackFilter {
    pub fn matches(&self, feedback: &Feedback) -> bool {
        self.company_id
            .map_or(true, |company_id| feedback.company_id == Some(company_id))
            && self
                .candidate_id
                .map_or(true, |candidate_id| feedback.candidate_id == candidate_id)
    }
}
