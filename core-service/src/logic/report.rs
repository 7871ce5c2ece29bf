//! Attack Summary - Pie chart data for predicted tables

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackCount {
    pub label: String,
    pub count: usize,
    /// Share of all rows, 0-100
    pub percent: f64,
}

/// Value counts of the "Attack Type" column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackSummary {
    pub total: usize,
    /// Most frequent first; ties by label
    pub attacks: Vec<AttackCount>,
}

impl AttackSummary {
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in labels {
            *counts.entry(label.as_ref()).or_insert(0) += 1;
        }

        let total = labels.len();
        let mut attacks: Vec<AttackCount> = counts
            .into_iter()
            .map(|(label, count)| AttackCount {
                label: label.to_string(),
                count,
                percent: count as f64 * 100.0 / total as f64,
            })
            .collect();

        attacks.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        Self { total, attacks }
    }

    pub fn count_of(&self, label: &str) -> usize {
        self.attacks
            .iter()
            .find(|a| a.label == label)
            .map(|a| a.count)
            .unwrap_or(0)
    }

    /// Rows not labelled `benign_label`
    pub fn attack_rows(&self, benign_label: &str) -> usize {
        self.total - self.count_of(benign_label)
    }
}
