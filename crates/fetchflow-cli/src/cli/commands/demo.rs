//! `fetchflow demo` – the staged walkthrough.

use anyhow::{bail, Result};
use fetchflow_core::api::DataSource;
use fetchflow_core::config::FetchflowConfig;
use fetchflow_core::demo::{self, DemoOptions};
use fetchflow_core::pipeline::Pipeline;

pub async fn run_demo<S: DataSource>(
    pipeline: &Pipeline<S>,
    cfg: &FetchflowConfig,
    pacing: bool,
) -> Result<()> {
    let mut opts = DemoOptions::from_config(cfg);
    opts.pacing = pacing;

    let report = demo::run_demo(pipeline, &opts).await;
    for stage in &report.stages {
        println!("== {} ({} ms)", stage.stage, stage.elapsed.as_millis());
        match &stage.outcome {
            Ok(lines) => {
                for line in lines {
                    println!("   {}", line);
                }
            }
            Err(err) => println!("   failed: {}", err),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{} of {} stage(s) failed", failed, report.stages.len());
    }
    println!("All {} stages completed.", report.stages.len());
    Ok(())
}
