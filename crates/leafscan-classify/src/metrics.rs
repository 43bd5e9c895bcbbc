//! Held-out evaluation: confusion matrix and per-class report
//!
//! Both tables are laid out in label order (unhealthy, healthy). The
//! report prints in the familiar columnar text layout:
//!
//! ```text
//!              precision    recall  f1-score   support
//!
//!    unhealthy      1.00      0.90      0.95        10
//!      healthy      0.91      1.00      0.95        10
//!
//!     accuracy                          0.95        20
//!    macro avg      0.95      0.95      0.95        20
//! weighted avg      0.95      0.95      0.95        20
//! ```

use crate::label::Label;
use std::fmt;

/// 2x2 counts, rows are true labels and columns predicted labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    /// Tally aligned truth/prediction pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Label, Label)>,
    {
        let mut m = Self::default();
        for (truth, predicted) in pairs {
            m.counts[truth.index()][predicted.index()] += 1;
        }
        m
    }

    pub fn get(&self, truth: Label, predicted: Label) -> usize {
        self.counts[truth.index()][predicted.index()]
    }

    pub fn counts(&self) -> [[usize; 2]; 2] {
        self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }

    /// Fraction of correct predictions, 0 when empty.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Number of samples whose true label is `label`.
    pub fn support(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    fn predicted(&self, label: Label) -> usize {
        self.counts.iter().map(|row| row[label.index()]).sum()
    }

    pub fn precision(&self, label: Label) -> f64 {
        ratio(self.get(label, label), self.predicted(label))
    }

    pub fn recall(&self, label: Label) -> f64 {
        ratio(self.get(label, label), self.support(label))
    }

    pub fn f1(&self, label: Label) -> f64 {
        let p = self.precision(label);
        let r = self.recall(label);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        let [a, b] = self.counts;
        writeln!(f, "[[{:>w$} {:>w$}]", a[0], a[1], w = width)?;
        write!(f, " [{:>w$} {:>w$}]]", b[0], b[1], w = width)
    }
}

/// Precision, recall, F1 and support of one class or average
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class scores plus accuracy and averages
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// Scores in [`Label::ALL`] order
    pub classes: [ClassScores; 2],
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

impl ClassificationReport {
    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let classes = Label::ALL.map(|label| ClassScores {
            precision: matrix.precision(label),
            recall: matrix.recall(label),
            f1: matrix.f1(label),
            support: matrix.support(label),
        });
        let total = matrix.total();

        let mean = |get: fn(&ClassScores) -> f64| classes.iter().map(get).sum::<f64>() / 2.0;
        let weighted = |get: fn(&ClassScores) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes
                    .iter()
                    .map(|c| get(c) * c.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };

        Self {
            classes,
            accuracy: matrix.accuracy(),
            macro_avg: ClassScores {
                precision: mean(|c| c.precision),
                recall: mean(|c| c.recall),
                f1: mean(|c| c.f1),
                support: total,
            },
            weighted_avg: ClassScores {
                precision: weighted(|c| c.precision),
                recall: weighted(|c| c.recall),
                f1: weighted(|c| c.f1),
                support: total,
            },
        }
    }

    pub fn class(&self, label: Label) -> &ClassScores {
        &self.classes[label.index()]
    }
}

const NAME_WIDTH: usize = 12;

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, s: &ClassScores) -> fmt::Result {
    writeln!(
        f,
        "{:>nw$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name,
        s.precision,
        s.recall,
        s.f1,
        s.support,
        nw = NAME_WIDTH
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>nw$} {:>9} {:>9} {:>9} {:>9}",
            "",
            "precision",
            "recall",
            "f1-score",
            "support",
            nw = NAME_WIDTH
        )?;
        writeln!(f)?;
        for label in Label::ALL {
            write_row(f, label.name(), self.class(label))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>nw$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.macro_avg.support,
            nw = NAME_WIDTH
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

/// Held-out evaluation of a trained model
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
}

impl Evaluation {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Label, Label)>,
    {
        let confusion = ConfusionMatrix::from_pairs(pairs);
        let report = ClassificationReport::from_confusion(&confusion);
        Self { confusion, report }
    }

    pub fn accuracy(&self) -> f64 {
        self.confusion.accuracy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label::{Healthy as H, Unhealthy as U};
    use approx::assert_relative_eq;

    fn sample_matrix() -> ConfusionMatrix {
        // 10 unhealthy: 9 right; 10 healthy: all right
        let mut pairs = vec![(U, U); 9];
        pairs.push((U, H));
        pairs.extend(vec![(H, H); 10]);
        ConfusionMatrix::from_pairs(pairs)
    }

    #[test]
    fn test_confusion_layout() {
        let m = sample_matrix();
        assert_eq!(m.counts(), [[9, 1], [0, 10]]);
        assert_eq!(m.total(), 20);
        assert_relative_eq!(m.accuracy(), 0.95);
        assert_eq!(m.to_string(), "[[ 9  1]\n [ 0 10]]");
    }

    #[test]
    fn test_scores() {
        let m = sample_matrix();
        assert_relative_eq!(m.precision(U), 1.0);
        assert_relative_eq!(m.recall(U), 0.9);
        assert_relative_eq!(m.precision(H), 10.0 / 11.0);
        assert_relative_eq!(m.recall(H), 1.0);
        assert_relative_eq!(m.f1(U), 2.0 * 0.9 / 1.9);
    }

    #[test]
    fn test_zero_division_is_zero() {
        let m = ConfusionMatrix::from_pairs([(U, U), (H, U)]);
        assert_eq!(m.precision(H), 0.0);
        assert_eq!(m.f1(H), 0.0);
        assert_eq!(ConfusionMatrix::default().accuracy(), 0.0);
    }

    #[test]
    fn test_report_text() {
        let report = ClassificationReport::from_confusion(&sample_matrix());
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        let header = format!(
            "{}precision{}recall{}f1-score{}support",
            " ".repeat(13),
            " ".repeat(4),
            " ".repeat(2),
            " ".repeat(3)
        );
        assert_eq!(lines[0], header);
        assert_eq!(lines[1], "");
        let unhealthy = format!(
            "   unhealthy{0}1.00{0}0.90{0}0.95{1}10",
            " ".repeat(6),
            " ".repeat(8)
        );
        assert_eq!(lines[2], unhealthy);
        let accuracy = format!("    accuracy{}0.95{}20", " ".repeat(26), " ".repeat(8));
        assert_eq!(lines[5], accuracy);
        assert!(lines[7].starts_with("weighted avg"));
        assert_relative_eq!(report.macro_avg.recall, 0.95);
    }
}
