//! Hash-rate benchmark for the WASM build.

use wasm_bindgen::prelude::*;
use astrobwt_core::{hash::to_hex, AstroBwt};
use crate::state::{BatchResultInfo, HashStats};

/// Hashes `seed || counter` for consecutive counters and tracks throughput.
#[wasm_bindgen]
pub struct PowBench {
    /// Seed bytes prefixed to every input.
    seed: Vec<u8>,
    /// Evaluator reused across batches.
    hasher: AstroBwt,
    /// Hashing statistics.
    stats: HashStats,
    /// Start time of the run.
    start_time: f64,
    /// Whether a run is active.
    is_running: bool,
}

#[wasm_bindgen]
impl PowBench {
    /// Create a new benchmark.
    ///
    /// # Arguments
    /// * `seed_hex` - Hex bytes prefixed to each hashed input
    #[wasm_bindgen(constructor)]
    pub fn new(seed_hex: &str) -> Result<PowBench, JsValue> {
        let seed = hex::decode(seed_hex)
            .map_err(|_| JsValue::from_str("Invalid seed hex"))?;

        Ok(PowBench {
            seed,
            hasher: AstroBwt::new(),
            stats: HashStats::new(),
            start_time: 0.0,
            is_running: false,
        })
    }

    /// Hash a batch of inputs.
    ///
    /// # Arguments
    /// * `batch_size` - Number of digests to compute in this batch
    #[wasm_bindgen]
    pub fn run_batch(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let info = self.hash_batch(batch_size);

        // Update elapsed time
        if self.start_time > 0.0 {
            let now = js_sys::Date::now();
            self.stats.elapsed_ms = now - self.start_time;
            self.stats.update_hash_rate();
        }

        info.to_js()
    }

    /// Start timing.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.is_running = true;
        self.start_time = js_sys::Date::now();
    }

    /// Stop timing.
    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.is_running = false;
    }

    /// Check if a run is active.
    #[wasm_bindgen(getter)]
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Get current statistics.
    #[wasm_bindgen]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        self.stats.to_js()
    }

    /// Get the formatted hash rate.
    #[wasm_bindgen]
    pub fn get_hash_rate_display(&self) -> String {
        self.stats.format_hash_rate()
    }

    /// Reset counters and statistics, keeping the seed.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.stats = HashStats::new();
        self.start_time = 0.0;
        self.is_running = false;
    }
}

impl PowBench {
    /// Hash `batch_size` consecutive counters without touching the clock.
    pub fn hash_batch(&mut self, batch_size: u32) -> BatchResultInfo {
        let mut input = Vec::with_capacity(self.seed.len() + 8);
        let mut last = None;

        for _ in 0..batch_size {
            let counter = self.stats.counter;
            input.clear();
            input.extend_from_slice(&self.seed);
            input.extend_from_slice(&counter.to_le_bytes());

            last = Some((counter, self.hasher.narrow(&input)));
            self.stats.counter = counter.wrapping_add(1);
        }

        self.stats.total_hashes += batch_size as u64;

        BatchResultInfo {
            hashes_computed: batch_size as u64,
            last_counter: last.map(|(counter, _)| counter),
            last_hash: last.map(|(_, hash)| to_hex(&hash)),
        }
    }

    /// Current statistics.
    pub fn stats(&self) -> &HashStats {
        &self.stats
    }
}
