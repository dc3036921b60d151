//! Render-pass and inference statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Keep at most this many latency samples.
const MAX_SAMPLES: usize = 10_000;

/// Metrics collector for render passes and model calls
pub struct RenderMetrics {
    /// Render passes that reached the inference step
    render_passes: AtomicU64,
    /// Successful predictions
    predictions: AtomicU64,
    /// Failed predictions
    failures: AtomicU64,
    /// Inference times (in microseconds)
    inference_times: RwLock<Vec<u64>>,
    /// Churn probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self {
            render_passes: AtomicU64::new(0),
            predictions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            inference_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    pub fn record_render_pass(&self) {
        self.render_passes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, inference_time: Duration, probability: f64) {
        self.predictions.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.inference_times.write() {
            times.push(inference_time.as_micros() as u64);
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }

        let bucket = (probability.clamp(0.0, 1.0) * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_passes(&self) -> u64 {
        self.render_passes.load(Ordering::Relaxed)
    }

    pub fn predictions(&self) -> u64 {
        self.predictions.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Get inference time statistics
    pub fn get_inference_stats(&self) -> ProcessingStats {
        let mut sorted = match self.inference_times.read() {
            Ok(times) => times.clone(),
            Err(_) => return ProcessingStats::default(),
        };
        if sorted.is_empty() {
            return ProcessingStats::default();
        }
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Get churn probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or_default()
    }

    /// Render passes per second since startup
    pub fn get_render_rate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.render_passes() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let stats = self.get_inference_stats();
        let distribution = self.get_probability_distribution();

        info!(
            render_passes = self.render_passes(),
            predictions = self.predictions(),
            failures = self.failures(),
            render_rate = format!("{:.2}/s", self.get_render_rate()),
            "Session summary"
        );
        info!(
            "Inference time (μs): mean={} p50={} p95={} p99={} max={}",
            stats.mean_us, stats.p50_us, stats.p95_us, stats.p99_us, stats.max_us
        );

        let total: u64 = distribution.iter().sum();
        if total == 0 {
            return;
        }
        info!("Churn probability distribution:");
        for (i, &count) in distribution.iter().enumerate() {
            let pct = (count as f64 / total as f64) * 100.0;
            let bar: String = "█".repeat(((pct / 5.0) as usize).min(20));
            info!(
                "  {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
    }
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference time statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = RenderMetrics::new();

        metrics.record_render_pass();
        metrics.record_render_pass();
        metrics.record_prediction(Duration::from_micros(100), 0.5);
        metrics.record_failure();

        assert_eq!(metrics.render_passes(), 2);
        assert_eq!(metrics.predictions(), 1);
        assert_eq!(metrics.failures(), 1);
    }

    #[test]
    fn test_inference_stats() {
        let metrics = RenderMetrics::new();
        for us in 1..=100 {
            metrics.record_prediction(Duration::from_micros(us), 0.2);
        }

        let stats = metrics.get_inference_stats();
        assert_eq!(stats.count, 100);
        assert_eq!(stats.mean_us, 50);
        assert_eq!(stats.p50_us, 51);
        assert_eq!(stats.p95_us, 96);
        assert_eq!(stats.max_us, 100);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(RenderMetrics::new().get_inference_stats(), ProcessingStats::default());
    }

    #[test]
    fn test_probability_buckets() {
        let metrics = RenderMetrics::new();
        metrics.record_prediction(Duration::ZERO, 0.0);
        metrics.record_prediction(Duration::ZERO, 0.55);
        metrics.record_prediction(Duration::ZERO, 1.0);

        let distribution = metrics.get_probability_distribution();
        assert_eq!(distribution[0], 1);
        assert_eq!(distribution[5], 1);
        assert_eq!(distribution[9], 1);
        assert_eq!(distribution.iter().sum::<u64>(), 3);
    }
}
