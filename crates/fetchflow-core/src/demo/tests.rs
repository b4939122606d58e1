use super::*;
use crate::api::{Accessor, MemorySource};
use crate::pipeline::PipelineOptions;

fn demo_options(failure_rate: f64) -> DemoOptions {
    DemoOptions {
        flaky_failure_rate: failure_rate,
        ..DemoOptions::default()
    }
}

fn lines(report: &DemoReport, stage: Stage) -> Vec<String> {
    report
        .get(stage)
        .and_then(|r| r.outcome.clone().ok())
        .unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn every_stage_succeeds_over_fixtures() {
    let pipeline = Pipeline::new(MemorySource::fixtures(), PipelineOptions::default());
    let report = run_demo(&pipeline, &demo_options(0.0)).await;

    assert_eq!(report.stages.len(), 8);
    assert_eq!(report.failures().count(), 0);
    assert!(lines(&report, Stage::ActiveUsers)[0].contains("Ervin Howell"));
    assert_eq!(
        lines(&report, Stage::UserWithPosts)[..2],
        ["user: Ervin Howell".to_string(), "posts: 3".to_string()]
    );
    assert_eq!(
        lines(&report, Stage::FindByEmail),
        vec!["found: Leanne Graham (Sincere@april.biz)".to_string()]
    );
    assert_eq!(lines(&report, Stage::RecentPosts).len(), 3);
    assert_eq!(
        lines(&report, Stage::TitleSearch),
        vec!["10 posts with \"dolor\" in the title".to_string()]
    );
    assert!(lines(&report, Stage::Stats).contains(&"average posts per user: 4".to_string()));
    assert_eq!(
        lines(&report, Stage::FlakyRetry),
        vec!["operation finished: success".to_string()]
    );
    assert_eq!(
        lines(&report, Stage::Parallel),
        vec![
            "recent posts: 2".to_string(),
            "posts with \"sit\": 5".to_string()
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn pacing_and_join_timing() {
    let pipeline = Pipeline::new(MemorySource::fixtures(), PipelineOptions::default());
    let report = run_demo(&pipeline, &demo_options(0.0)).await;
    let elapsed = |stage| report.get(stage).map(|r| r.elapsed).unwrap_or_default();
    assert_eq!(elapsed(Stage::ActiveUsers), Duration::from_millis(1000));
    assert_eq!(elapsed(Stage::Stats), Duration::from_millis(500));
    // 300ms pacing + the 1000ms delay branch, the slowest of the three.
    assert_eq!(elapsed(Stage::Parallel), Duration::from_millis(1300));
    // 500ms pacing + 100ms of work on the first attempt.
    assert_eq!(elapsed(Stage::FlakyRetry), Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn exhausted_flaky_stage_does_not_stop_the_demo() {
    let pipeline = Pipeline::new(MemorySource::fixtures(), PipelineOptions::default());
    let opts = DemoOptions {
        pacing: false,
        ..demo_options(1.0)
    };
    let report = run_demo(&pipeline, &opts).await;

    let failed: Vec<Stage> = report.failures().map(|r| r.stage).collect();
    assert_eq!(failed, vec![Stage::FlakyRetry]);
    let err = report.get(Stage::FlakyRetry).unwrap().outcome.clone().unwrap_err();
    assert!(err.starts_with("all 3 attempts failed: random failure ("), "{err}");
    assert_eq!(err.matches("random failure").count(), 1, "{err}");
    // 3 x 100ms of work + 200ms + 400ms of backoff.
    assert_eq!(
        report.get(Stage::FlakyRetry).unwrap().elapsed,
        Duration::from_millis(900)
    );
    assert!(report.get(Stage::Parallel).unwrap().outcome.is_ok());
}

#[tokio::test(start_paused = true)]
async fn search_stage_reports_timeout() {
    let source = MemorySource::fixtures()
        .with_accessor_latency(Accessor::Posts, Duration::from_secs(30));
    let options = PipelineOptions {
        unstable: vec![],
        ..PipelineOptions::default()
    };
    let pipeline = Pipeline::new(source, options);
    let opts = DemoOptions {
        pacing: false,
        search_timeout: Duration::from_millis(1000),
        ..demo_options(0.0)
    };
    let report = run_demo(&pipeline, &opts).await;

    let search = report.get(Stage::TitleSearch).unwrap();
    assert_eq!(
        search.outcome.clone().unwrap_err(),
        "operation timed out after 1000ms"
    );
    assert_eq!(search.elapsed, Duration::from_millis(1000));
    // Stages that only need users still succeed.
    assert!(report.get(Stage::ActiveUsers).unwrap().outcome.is_ok());
    assert!(report.get(Stage::FindByEmail).unwrap().outcome.is_ok());
    // Everything that reads posts hit the 10s request timeout.
    assert!(report.get(Stage::RecentPosts).unwrap().outcome.is_err());
    assert!(report.get(Stage::Stats).unwrap().outcome.is_err());
    assert!(report.get(Stage::Parallel).unwrap().outcome.is_err());
}

#[test]
fn stage_numbers_and_titles() {
    assert_eq!(Stage::ActiveUsers.number(), 1);
    assert_eq!(Stage::Parallel.number(), 8);
    assert_eq!(Stage::TitleSearch.to_string(), "5. title search with timeout");
}

#[test]
fn truncate_counts_chars() {
    assert_eq!(truncate("short", 50), "short");
    assert_eq!(truncate("abcdef", 3), "abc...");
    assert_eq!(truncate("ééééé", 2), "éé...");
}

#[test]
fn describe_walks_pipeline_error_chain() {
    use crate::api::ApiError;
    use crate::flow::FlowError;

    let e = PipelineError::Flow(FlowError::RetryExhausted {
        attempts: 3,
        last: Box::new(FlowError::Operation(ApiError::Unavailable(
            "users".to_string(),
        ))),
    });
    assert_eq!(describe(&e), "all 3 attempts failed: users unavailable");
}
