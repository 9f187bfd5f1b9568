#![cfg(unix)]

use gr_driver::{Driver, DriverConfig, ProcessWorker, QueueFiles, ResultNaming, WorkerCommand};
use gr_sweep::{generate, AlgorithmFamily, GeneratorConfig};
use gr_types::{GrError, WorkerError};

fn config_in(dir: &std::path::Path) -> DriverConfig {
    DriverConfig::default()
        .with_queue(QueueFiles::new(
            dir.join("remaining.txt"),
            dir.join("completed.txt"),
        ))
        .with_output_dir(dir.join("results"))
}

#[tokio::test]
async fn generated_grasp_queue_drains_through_a_process() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_worker(WorkerCommand::new("cat"));
    let generator = GeneratorConfig::default().with_output(&config.queue.remaining);
    generate(AlgorithmFamily::Grasp, &generator, 0).unwrap();

    let worker = ProcessWorker::new(config.worker.clone());
    let summary = Driver::new(config.clone(), Box::new(worker))
        .run(std::future::pending())
        .await
        .unwrap();

    assert_eq!(summary.processed, 9);
    assert_eq!(summary.failed, 0);

    let completed = std::fs::read_to_string(&config.queue.completed).unwrap();
    let lines: Vec<&str> = completed.lines().collect();
    assert_eq!(lines.first(), Some(&"8-0.7.60 0.7 60"));
    assert_eq!(lines.last(), Some(&"0-0.3.15 0.3 15"));

    let result = std::fs::read_to_string(config.output_dir.join("4-0.5.30.csv")).unwrap();
    assert_eq!(result, "4-0.5.30 0.5 30");
}

#[tokio::test]
async fn tagged_genetic_queue_with_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let command = WorkerCommand::new("sh").with_args(["-c", "read line; echo \"$line\" >&2; exit 1"]);
    let config = config_in(dir.path())
        .with_worker(command)
        .with_naming(ResultNaming::SkipAlgorithmTag);
    let generator = GeneratorConfig::default()
        .with_groups(16)
        .with_output(&config.queue.remaining);
    let written = generate(AlgorithmFamily::Genetic, &generator, 5).unwrap();
    assert_eq!(written.range, 15..18);

    let worker = ProcessWorker::new(config.worker.clone());
    let summary = Driver::new(config.clone(), Box::new(worker))
        .run(std::future::pending())
        .await
        .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failed, 3);
    let result = std::fs::read_to_string(config.output_dir.join("15-200.0.99.1.1.0.01.csv")).unwrap();
    assert_eq!(result, "ag 15-200.0.99.1.1.0.01 200 0.99 1 1 0.01\n");
}

#[tokio::test]
async fn missing_worker_program_keeps_item_queued() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_worker(WorkerCommand::new("gr-no-such-optimizer"));
    std::fs::write(&config.queue.remaining, "0-0.3.15 0.3 15").unwrap();

    let worker = ProcessWorker::new(config.worker.clone());
    let err = Driver::new(config.clone(), Box::new(worker))
        .run(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, GrError::Worker(WorkerError::Spawn { .. })));
    assert_eq!(
        std::fs::read_to_string(&config.queue.remaining).unwrap(),
        "0-0.3.15 0.3 15"
    );
    assert_eq!(std::fs::read_to_string(&config.queue.completed).unwrap(), "");
}
