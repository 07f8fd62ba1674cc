//! EEG-Processing: epoch extraction and quality assessment
//!
//! Windowing, structural validation, signal-quality metrics and a bounded
//! worker pool for scoring epochs in parallel.

pub mod assessor;
pub mod batch;
pub mod config;
pub mod extractor;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod validator;

pub use assessor::QualityAssessor;
pub use batch::{AssessmentOutcome, BatchAssessor, BatchOutcome, CancellationFlag};
pub use config::{
    BatchConfig, EpochConfig, FailurePolicy, MetricWeights, PipelineConfig, QualityConfig, TailPolicy,
    ValidationConfig,
};
pub use extractor::EpochExtractor;
pub use metrics::{
    CohesionQuality, FlatlineQuality, GapQuality, MetricKind, NanQuality, OutlierQuality, QualityMetric,
    QualityMetricSuite, SharpnessQuality, SpreadMeasure,
};
pub use pipeline::{EpochPipeline, PipelineResult};
pub use report::{MetricScores, QualityReport, QualitySummary, QualityTable};
pub use validator::{EpochValidator, RejectedEpoch, ValidationVerdict};
