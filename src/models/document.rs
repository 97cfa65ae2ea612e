use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TutorialIdeas,
    UseCases,
    TechnicalQuestions,
    ProblemStatements,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::TutorialIdeas,
        Category::UseCases,
        Category::TechnicalQuestions,
        Category::ProblemStatements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TutorialIdeas => "tutorial_ideas",
            Category::UseCases => "use_cases",
            Category::TechnicalQuestions => "technical_questions",
            Category::ProblemStatements => "problem_statements",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, serialize_with = "serialize_votes")]
    pub votes: f64,
    #[serde(default)]
    pub hearted: bool,
    #[serde(default)]
    pub has_replies: bool,
}

/// Whole vote counts go back out as JSON integers.
pub(crate) fn serialize_votes<S: Serializer>(votes: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if votes.is_finite() && votes.fract() == 0.0 && votes.abs() <= MAX_EXACT {
        serializer.serialize_i64(*votes as i64)
    } else {
        serializer.serialize_f64(*votes)
    }
}

fn by_votes(a: &ClassifiedItem, b: &ClassifiedItem) -> Ordering {
    b.votes.total_cmp(&a.votes)
}

fn by_votes_then_hearted(a: &ClassifiedItem, b: &ClassifiedItem) -> Ordering {
    by_votes(a, b).then_with(|| b.hearted.cmp(&a.hearted))
}

/// The four buckets of classified comments, as written to and read from disk.
///
/// Missing keys deserialize as empty buckets, so partial documents load too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedDocument {
    #[serde(default)]
    pub tutorial_ideas: Vec<ClassifiedItem>,
    #[serde(default)]
    pub use_cases: Vec<ClassifiedItem>,
    #[serde(default)]
    pub technical_questions: Vec<ClassifiedItem>,
    #[serde(default)]
    pub problem_statements: Vec<ClassifiedItem>,
}

impl ClassifiedDocument {
    /// The sentinel returned when classification cannot produce anything.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bucket(&self, category: Category) -> &Vec<ClassifiedItem> {
        match category {
            Category::TutorialIdeas => &self.tutorial_ideas,
            Category::UseCases => &self.use_cases,
            Category::TechnicalQuestions => &self.technical_questions,
            Category::ProblemStatements => &self.problem_statements,
        }
    }

    pub fn bucket_mut(&mut self, category: Category) -> &mut Vec<ClassifiedItem> {
        match category {
            Category::TutorialIdeas => &mut self.tutorial_ideas,
            Category::UseCases => &mut self.use_cases,
            Category::TechnicalQuestions => &mut self.technical_questions,
            Category::ProblemStatements => &mut self.problem_statements,
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.bucket(*c).is_empty())
    }

    pub fn total_items(&self) -> usize {
        Category::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }

    /// Every item with its bucket, in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &ClassifiedItem)> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.bucket(c).iter().map(move |item| (c, item)))
    }

    /// Appends every bucket of `other` onto the matching bucket of `self`.
    pub fn extend(&mut self, other: ClassifiedDocument) {
        let ClassifiedDocument {
            tutorial_ideas,
            use_cases,
            technical_questions,
            problem_statements,
        } = other;
        self.tutorial_ideas.extend(tutorial_ideas);
        self.use_cases.extend(use_cases);
        self.technical_questions.extend(technical_questions);
        self.problem_statements.extend(problem_statements);
    }

    pub fn for_each_item_mut(&mut self, mut f: impl FnMut(&mut ClassifiedItem)) {
        for category in Category::ALL {
            self.bucket_mut(category).iter_mut().for_each(&mut f);
        }
    }

    /// Stable sort of each bucket, highest votes first.
    pub fn sort_by_votes(&mut self) {
        for category in Category::ALL {
            self.bucket_mut(category).sort_by(by_votes);
        }
    }

    /// Stable sort of each bucket by votes, then hearted, both descending.
    pub fn sort_by_votes_then_hearted(&mut self) {
        for category in Category::ALL {
            self.bucket_mut(category).sort_by(by_votes_then_hearted);
        }
    }
}
