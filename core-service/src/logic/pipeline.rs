//! Prediction Pipeline - align → infer → annotate
//!
//! Mọi dữ liệu đi qua tham số và giá trị trả về, không có state ẩn.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ATTACK_TYPE_COLUMN, DISPLAY_COLUMNS};
use crate::logic::features::{align_with_stats, AlignmentStats};
use crate::logic::model::{infer, Assets, InferenceError};
use crate::logic::report::AttackSummary;
use crate::logic::table::{Table, TableError, TablePreview};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Uploaded table plus the "Attack Type" column
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    table: Table,
    labels: Vec<String>,
}

impl AnnotatedTable {
    /// Attach `labels` row-for-row to a copy of `table`
    pub fn new(table: &Table, labels: Vec<String>) -> Result<Self, TableError> {
        let mut table = table.clone();
        table.set_column(ATTACK_TYPE_COLUMN, labels.clone())?;
        Ok(Self { table, labels })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Predicted label per row, in row order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn row_count(&self) -> usize {
        self.labels.len()
    }

    /// srcip / dstip / proto (when present) + Attack Type, first `limit` rows
    pub fn display_view(&self, limit: usize) -> TablePreview {
        let mut columns: Vec<&str> = DISPLAY_COLUMNS.to_vec();
        columns.push(ATTACK_TYPE_COLUMN);
        self.table.project(&columns, limit)
    }

    pub fn summary(&self) -> AttackSummary {
        AttackSummary::from_labels(&self.labels)
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        self.table.to_csv_bytes()
    }
}

/// Outcome of one "run predictions" action
#[derive(Debug, Clone)]
pub struct PredictionRun {
    pub annotated: AnnotatedTable,
    pub alignment: AlignmentStats,
    pub inference_time_us: u64,
}

/// Serializable digest of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub rows: usize,
    pub alignment: AlignmentStats,
    pub inference_time_us: u64,
}

impl PredictionRun {
    pub fn report(&self) -> RunReport {
        RunReport {
            rows: self.annotated.row_count(),
            alignment: self.alignment.clone(),
            inference_time_us: self.inference_time_us,
        }
    }
}

/// Align `table` to the loaded schema, classify every row, annotate
pub fn predict_table(assets: &Assets, table: &Table) -> Result<PredictionRun, PipelineError> {
    let started = Instant::now();

    let (aligned, alignment) = align_with_stats(table, assets.schema());
    let labels = infer(&aligned, assets.classifier(), assets.label_map())?;
    let inference_time_us = assets.record_run(started, labels.len());

    log::info!(
        "Classified {} rows in {} us ({} features zero-filled)",
        labels.len(),
        inference_time_us,
        alignment.zero_filled.len()
    );

    Ok(PredictionRun {
        annotated: AnnotatedTable::new(table, labels)?,
        alignment,
        inference_time_us,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use crate::logic::features::FeatureSchema;
    use crate::logic::model::{Classifier, LabelMap};

    /// Class id = value of feature `sport` modulo 3
    struct PortMod;

    impl Classifier for PortMod {
        fn name(&self) -> &str {
            "port-mod"
        }

        fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, InferenceError> {
            Ok(features.rows().into_iter().map(|row| row[0] as i64 % 3).collect())
        }
    }

    fn assets() -> Assets {
        let labels: LabelMap = [(0, "Normal".to_string()), (1, "DoS".to_string())]
            .into_iter()
            .collect();
        Assets::from_parts(Box::new(PortMod), labels, FeatureSchema::builtin()).unwrap()
    }

    #[test]
    fn test_predict_table() {
        let csv = "srcip,dstip,proto,sport\n1.1.1.1,2.2.2.2,tcp,3\n1.1.1.2,2.2.2.2,udp,4\n1.1.1.3,2.2.2.2,tcp,5\n";
        let table = Table::from_csv_bytes(csv.as_bytes()).unwrap();

        let run = predict_table(&assets(), &table).unwrap();

        assert_eq!(run.annotated.labels(), &["Normal", "DoS", "Unknown"]);
        assert_eq!(run.annotated.table().column_count(), 5);
        assert_eq!(run.alignment.matched, vec!["sport"]);
        assert_eq!(run.alignment.dropped, vec!["srcip", "dstip", "proto"]);
    }

    #[test]
    fn test_display_view() {
        let csv = "proto,sport,srcip\ntcp,3,1.1.1.1\n";
        let table = Table::from_csv_bytes(csv.as_bytes()).unwrap();
        let run = predict_table(&assets(), &table).unwrap();

        let view = run.annotated.display_view(20);
        assert_eq!(view.columns, vec!["srcip", "proto", "Attack Type"]);
        assert_eq!(view.rows, vec![vec!["1.1.1.1", "tcp", "Normal"]]);
    }

    #[test]
    fn test_export_csv() {
        let table = Table::from_csv_bytes(b"sport,note\n4,x\n").unwrap();
        let run = predict_table(&assets(), &table).unwrap();

        let csv = String::from_utf8(run.annotated.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "sport,note,Attack Type\n4,x,DoS\n");
    }

    #[test]
    fn test_inference_error_propagates() {
        let table = Table::from_csv_bytes(b"sport\nhttp\n").unwrap();
        let assets = assets();
        let result = predict_table(&assets, &table);

        assert!(matches!(
            result,
            Err(PipelineError::Inference(InferenceError::NonNumeric { .. }))
        ));
        assert_eq!(assets.status().inference_count, 0);
    }

    #[test]
    fn test_stats_recorded() {
        let assets = assets();
        let table = Table::from_csv_bytes(b"sport\n1\n2\n").unwrap();
        predict_table(&assets, &table).unwrap();

        let status = assets.status();
        assert_eq!(status.inference_count, 1);
        assert_eq!(status.rows_classified, 2);
    }
}
