//! End-to-end staged pipeline: a serial normalisation stage feeding a
//! parallel enrichment stage backed by its own worker pool, plus the
//! bounded-concurrency batch variant.

use llmcache_pipeline::{Pipeline, PipelineConfig, PipelineConfigBuilder, Stage, StageConfig};
use std::convert::Infallible;
use std::time::Duration;

fn build_pipeline() -> Pipeline<String, Infallible> {
    let stages = vec![
        Stage::new(StageConfig::serial("normalize", Duration::from_millis(100)), |s: String| async move {
            Ok(s.trim().to_lowercase())
        }),
        Stage::new(StageConfig::parallel("enrich", Duration::from_secs(1), 2, 16), |s: String| async move {
            Ok(format!("{s}!"))
        }),
    ];
    Pipeline::new(PipelineConfig::default(), stages)
}

#[tokio::test]
async fn process_folds_through_serial_then_parallel_stages() {
    let pipeline = build_pipeline();
    let result = pipeline.process("  Hello World  ".to_string()).await.unwrap();
    assert_eq!(result, "hello world!");

    let stats = pipeline.stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.errors, 0);
}

#[tokio::test]
async fn process_batch_preserves_positional_alignment() {
    let pipeline = Pipeline::new(
        PipelineConfigBuilder::new().batch_concurrency(2).build(),
        vec![Stage::new(StageConfig::serial("shout", Duration::from_millis(50)), |s: String| async move {
            Ok(s.to_uppercase())
        })],
    );

    let inputs = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
    let results = pipeline.process_batch(inputs).await;

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap(), "A");
    assert_eq!(results[1].as_ref().unwrap(), "B");
    assert_eq!(results[2].as_ref().unwrap(), "C");
    assert_eq!(results[3].as_ref().unwrap(), "D");
}

#[tokio::test]
async fn a_stage_error_aborts_the_pipeline_without_running_later_stages() {
    let later_ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = std::sync::Arc::clone(&later_ran);

    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        vec![
            Stage::new(StageConfig::serial("fails", Duration::from_millis(50)), |_: String| async move {
                Err::<String, &'static str>("boom")
            }),
            Stage::new(StageConfig::serial("never-runs", Duration::from_millis(50)), move |s: String| {
                let flag = std::sync::Arc::clone(&flag);
                async move {
                    flag.store(true, std::sync::atomic::Ordering::SeqCst);
                    Ok(s)
                }
            }),
        ],
    );

    let result = pipeline.process("x".to_string()).await;
    assert!(result.is_err());
    assert!(!later_ran.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(pipeline.stats().errors, 1);
}
