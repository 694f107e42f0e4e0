//! State crossing the owning-thread / worker boundary.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::metrics::Metric;
use crate::model::GraphAttributes;
use crate::snapshot::ImmutableGraph;

/// Point-in-time inputs of one pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct PassInput {
    pub(crate) graph: ImmutableGraph,
    pub(crate) attributes: GraphAttributes,
}

/// Worker → owning thread notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassEvent {
    /// At least one metric was queued.
    MetricReady,
    /// Sent after the pass's last metric push.
    Finished { generation: u64, cancelled: bool },
}

#[derive(Debug)]
pub(crate) struct ReadyMetric {
    pub(crate) generation: u64,
    pub(crate) metric: Metric,
}

#[derive(Debug, Default)]
struct Buffers {
    ready: VecDeque<ReadyMetric>,
    pool: Vec<Vec<f32>>,
}

/// Ready-metric queue and free-vector pool behind one mutex.
#[derive(Debug)]
pub(crate) struct PassShared {
    buffers: Mutex<Buffers>,
    max_pooled: usize,
}

impl PassShared {
    pub(crate) fn new(max_pooled: usize) -> Self {
        Self {
            buffers: Mutex::new(Buffers::default()),
            max_pooled,
        }
    }

    /// A pooled (or fresh) vector of `len` NaNs.
    pub(crate) fn take_vector(&self, len: usize) -> Vec<f32> {
        let mut values = self.buffers.lock().pool.pop().unwrap_or_default();
        values.clear();
        values.resize(len, f32::NAN);
        values
    }

    pub(crate) fn recycle(&self, values: Vec<f32>) {
        if values.capacity() == 0 {
            return;
        }
        let mut buffers = self.buffers.lock();
        if buffers.pool.len() < self.max_pooled {
            buffers.pool.push(values);
        }
    }

    pub(crate) fn push_ready(&self, generation: u64, metric: Metric) {
        self.buffers.lock().ready.push_back(ReadyMetric { generation, metric });
    }

    /// Take everything queued so far, in push order.
    pub(crate) fn drain_ready(&self) -> VecDeque<ReadyMetric> {
        std::mem::take(&mut self.buffers.lock().ready)
    }

    pub(crate) fn pooled(&self) -> usize {
        self.buffers.lock().pool.len()
    }
}
