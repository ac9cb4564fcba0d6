//! Evaluation criteria, scores and the form-to-record validation boundary.
//!
//! The remote table uses the column names of the original school deployment
//! (`grupo`, `turma`, `avaliador`, `criterio1..5`, `total`, `obs`), so the
//! serde renames here define the wire format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ApiError;

/// The five fixed criteria every project group is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Functionality,
    UsabilityAndVisual,
    Originality,
    Completion,
    Presentation,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Functionality,
        Criterion::UsabilityAndVisual,
        Criterion::Originality,
        Criterion::Completion,
        Criterion::Presentation,
    ];

    /// Position of this criterion in the form (0-based), matching `criterioN - 1`.
    pub fn index(self) -> usize {
        match self {
            Criterion::Functionality => 0,
            Criterion::UsabilityAndVisual => 1,
            Criterion::Originality => 2,
            Criterion::Completion => 3,
            Criterion::Presentation => 4,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Criterion::Functionality => "c1",
            Criterion::UsabilityAndVisual => "c2",
            Criterion::Originality => "c3",
            Criterion::Completion => "c4",
            Criterion::Presentation => "c5",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Functionality => "Functionality",
            Criterion::UsabilityAndVisual => "Usability and Visual",
            Criterion::Originality => "Originality",
            Criterion::Completion => "Completion Level",
            Criterion::Presentation => "Presentation and Delivery",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Criterion::Functionality => {
                "Does the project perform every proposed task reliably, without crashes or critical errors?"
            }
            Criterion::UsabilityAndVisual => {
                "Is the interface intuitive, the design pleasant, and the overall experience good?"
            }
            Criterion::Originality => {
                "Does the project offer a creative or innovative solution, or a clear differentiator?"
            }
            Criterion::Completion => {
                "Was the project delivered complete and polished, or are features still missing?"
            }
            Criterion::Presentation => {
                "Did the group show full technical command of the project and present it clearly?"
            }
        }
    }
}

/// One of the allowed score values for a criterion.
///
/// Serialized as the bare number (0.3, 0.7, 1.0). Deserializing any other
/// number fails, so a queue entry with a corrupted score is rejected as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Score {
    Regular,
    Good,
    Excellent,
}

impl Score {
    pub const ALL: [Score; 3] = [Score::Regular, Score::Good, Score::Excellent];

    /// Score in hundredths of a point. Totals are summed in this unit.
    pub fn hundredths(self) -> u32 {
        match self {
            Score::Regular => 30,
            Score::Good => 70,
            Score::Excellent => 100,
        }
    }

    pub fn value(self) -> f64 {
        f64::from(self.hundredths()) / 100.0
    }

    pub fn label(self) -> &'static str {
        match self {
            Score::Regular => "Regular",
            Score::Good => "Good",
            Score::Excellent => "Excellent",
        }
    }

    /// Map a raw numeric value to a score. Only exact (2-decimal) matches count.
    pub fn from_value(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|score| f64::from(score.hundredths()) == rounded)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Score::from_value(value).ok_or_else(|| {
            serde::de::Error::custom(format!("{} is not an allowed score value", value))
        })
    }
}

/// Sum of scores, rounded to 2 decimal places.
pub fn total_of(scores: impl IntoIterator<Item = Score>) -> f64 {
    let hundredths: u32 = scores.into_iter().map(Score::hundredths).sum();
    f64::from(hundredths) / 100.0
}

/// A validated evaluation, exactly as it is sent to the remote store.
///
/// `total` is computed once in [`Evaluation::new`] and carried as-is from then on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(rename = "grupo")]
    pub group: String,
    #[serde(rename = "turma")]
    pub class: String,
    #[serde(rename = "avaliador")]
    pub evaluator: String,
    #[serde(rename = "criterio1")]
    pub criterion1: Score,
    #[serde(rename = "criterio2")]
    pub criterion2: Score,
    #[serde(rename = "criterio3")]
    pub criterion3: Score,
    #[serde(rename = "criterio4")]
    pub criterion4: Score,
    #[serde(rename = "criterio5")]
    pub criterion5: Score,
    pub total: f64,
    #[serde(rename = "obs")]
    pub note: Option<String>,
}

impl Evaluation {
    pub fn new(
        group: impl Into<String>,
        class: impl Into<String>,
        evaluator: impl Into<String>,
        scores: [Score; 5],
        note: Option<String>,
    ) -> Self {
        let [criterion1, criterion2, criterion3, criterion4, criterion5] = scores;
        Self {
            group: group.into(),
            class: class.into(),
            evaluator: evaluator.into(),
            criterion1,
            criterion2,
            criterion3,
            criterion4,
            criterion5,
            total: total_of(scores),
            note,
        }
    }

    pub fn scores(&self) -> [Score; 5] {
        [
            self.criterion1,
            self.criterion2,
            self.criterion3,
            self.criterion4,
            self.criterion5,
        ]
    }

    pub fn score(&self, criterion: Criterion) -> Score {
        self.scores()[criterion.index()]
    }
}

/// Raw form input as a host collects it. Nothing here is trusted until
/// [`EvaluationForm::validate`] turns it into an [`Evaluation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationForm {
    pub evaluator: String,
    pub class: String,
    pub group: String,
    /// Raw numeric score per criterion, indexed by [`Criterion::index`].
    pub scores: [Option<f64>; 5],
    #[serde(default)]
    pub note: String,
}

impl EvaluationForm {
    pub fn set_score(&mut self, criterion: Criterion, score: Score) {
        self.scores[criterion.index()] = Some(score.value());
    }

    pub fn set_raw_score(&mut self, criterion: Criterion, value: f64) {
        self.scores[criterion.index()] = Some(value);
    }

    /// Live total of whatever has been scored so far, for display while filling the form.
    pub fn running_total(&self) -> f64 {
        let sum: f64 = self.scores.iter().flatten().sum();
        (sum * 100.0).round() / 100.0
    }

    /// Check the form and build the evaluation that will be submitted.
    ///
    /// Checks run in form order so the first message names the first problem
    /// the user would see.
    pub fn validate(&self) -> Result<Evaluation, ApiError> {
        let evaluator = self.evaluator.trim();
        if evaluator.is_empty() {
            return Err(ApiError::validation(
                "evaluator",
                "Please enter the evaluator's name.",
            ));
        }
        let class = self.class.trim();
        if class.is_empty() {
            return Err(ApiError::validation("class", "Please select the class."));
        }
        let group = self.group.trim();
        if group.is_empty() {
            return Err(ApiError::validation("group", "Please enter the group name."));
        }
        if self.scores.iter().any(Option::is_none) {
            return Err(ApiError::validation(
                "scores",
                format!("Please score all {} criteria.", Criterion::ALL.len()),
            ));
        }

        let mut scores = [Score::Regular; 5];
        for criterion in Criterion::ALL {
            let raw = self.scores[criterion.index()];
            scores[criterion.index()] = raw.and_then(Score::from_value).ok_or_else(|| {
                ApiError::validation(
                    criterion.id(),
                    format!("Invalid score for {}.", criterion.label()),
                )
            })?;
        }

        let note = self.note.trim();
        let note = (!note.is_empty()).then(|| note.to_string());

        Ok(Evaluation::new(group, class, evaluator, scores, note))
    }
}
