//! End-to-end batch runs through the worker pool with an in-memory downloader.

use async_trait::async_trait;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use yt_scrape::downloader::check_directory;
use yt_scrape::{
    source, DownloadError, DownloadOptions, DownloadRequest, Downloader, Result, VideoInfo,
    WorkerPool,
};

/// Sleeps per request and records how many calls overlap.
#[derive(Default)]
struct Tracking {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl Downloader for Tracking {
    async fn download(&self, request: &DownloadRequest) -> Result<VideoInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = check_directory(&request.output).await;
        // Vary latency so completion order differs from submission order.
        let delay = 5 + (request.url.len() % 7) as u64 * 3;
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result?;
        if request.url.contains("fail") {
            return Err(DownloadError::Extractor {
                code: Some(1),
                message: format!("ERROR: cannot fetch {}", request.url),
            });
        }
        Ok(VideoInfo {
            title: Some(request.url.clone()),
            duration: Some(60),
        })
    }
}

fn requests(count: usize, output: &Path) -> Vec<DownloadRequest> {
    let options = DownloadOptions {
        output: output.to_path_buf(),
        ..Default::default()
    };
    (0..count)
        .map(|i| DownloadRequest::new(format!("https://youtu.be/video{}", i), &options))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_request_yields_exactly_one_outcome() {
    let dir = tempfile::tempdir().unwrap();
    for workers in [1, 3, 10, 20] {
        for count in [1, 5, 23] {
            let downloader = Arc::new(Tracking::default());
            let pool = WorkerPool::new(Arc::clone(&downloader), workers);
            let results = pool.run(requests(count, dir.path())).await.unwrap();

            assert_eq!(results.len(), count);
            assert_eq!(results.successes().len() + results.failures().len(), count);
            assert_eq!(downloader.calls.load(Ordering::SeqCst), count);

            let indexes: HashSet<usize> = results.successes().iter().map(|o| o.index).collect();
            assert_eq!(indexes, (0..count).collect::<HashSet<_>>());
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_never_exceeds_worker_count() {
    let dir = tempfile::tempdir().unwrap();
    for workers in [1i64, 2, 5, 20] {
        let downloader = Arc::new(Tracking::default());
        let pool = WorkerPool::new(Arc::clone(&downloader), workers);
        pool.run(requests(40, dir.path())).await.unwrap();

        let max = downloader.max_in_flight.load(Ordering::SeqCst);
        assert!(
            max <= workers as usize,
            "{} downloads in flight with {} workers",
            max,
            workers
        );
        assert!(max >= 1);
    }
}

#[tokio::test]
async fn test_out_of_range_workers_fall_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    for workers in [0, 25] {
        let downloader = Arc::new(Tracking::default());
        let pool = WorkerPool::new(Arc::clone(&downloader), workers);
        assert_eq!(pool.workers(), 10);

        let results = pool.run(requests(30, dir.path())).await.unwrap();
        assert_eq!(results.len(), 30);
        assert!(downloader.max_in_flight.load(Ordering::SeqCst) <= 10);
    }
}

#[tokio::test]
async fn test_failing_task_does_not_stop_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let options = DownloadOptions {
        output: dir.path().to_path_buf(),
        ..Default::default()
    };
    let batch = vec![
        DownloadRequest::new("https://youtu.be/one", &options),
        DownloadRequest::new("https://youtu.be/fail", &options),
        DownloadRequest::new("https://youtu.be/three", &options),
    ];

    let pool = WorkerPool::new(Arc::new(Tracking::default()), 3);
    let results = pool.run(batch).await.unwrap();

    let mut succeeded: Vec<&str> = results
        .successes()
        .iter()
        .map(|o| o.request.url.as_str())
        .collect();
    succeeded.sort();
    assert_eq!(succeeded, vec!["https://youtu.be/one", "https://youtu.be/three"]);

    assert_eq!(results.failures().len(), 1);
    let failure = &results.failures()[0];
    assert_eq!(failure.request.url, "https://youtu.be/fail");
    assert!(!failure.is_success());
    assert!(failure
        .error()
        .unwrap()
        .contains("ERROR: cannot fetch https://youtu.be/fail"));
    assert!(results.has_failures());
}

#[tokio::test]
async fn test_batch_twice_into_same_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("downloads");
    let pool = WorkerPool::new(Arc::new(Tracking::default()), 4);

    for _ in 0..2 {
        let results = pool.run(requests(6, &output)).await.unwrap();
        assert!(!results.has_failures(), "{:?}", results.failures());
        assert_eq!(results.successes().len(), 6);
    }
    assert!(output.is_dir());
}

#[tokio::test]
async fn test_url_file_to_summary() {
    let dir = tempfile::tempdir().unwrap();
    let list_path = dir.path().join("urls.txt");
    let mut file = std::fs::File::create(&list_path).unwrap();
    write!(
        file,
        "https://www.youtube.com/watch?v=A\n# comment\n\nnot-a-url\nhttps://youtu.be/fail\n"
    )
    .unwrap();
    drop(file);

    let list = source::read_url_file(&list_path).await.unwrap();
    assert_eq!(list.rejected.len(), 1);
    assert_eq!(list.rejected[0].content, "not-a-url");

    let output = dir.path().join("out");
    let options = DownloadOptions {
        output: output.clone(),
        ..Default::default()
    };
    let pool = WorkerPool::new(Arc::new(Tracking::default()), 10);
    let results = pool.run(list.into_requests(&options)).await.unwrap();

    let summary = results.summary(&output).to_string();
    assert!(summary.contains("Total URLs processed: 2"));
    assert!(summary.contains("Successful downloads: 1"));
    assert!(summary.contains("Failed downloads: 1"));
    assert!(summary.contains("https://youtu.be/fail: "));
}
