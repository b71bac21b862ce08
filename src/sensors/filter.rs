//! Median filtering for the analog probes.
//!
//! The TDS and pH probes are noisy enough that a single ADC read is useless.
//! Each probe gets an [`AnalogFilter`]: a fixed-capacity ring of raw counts,
//! refilled at most once per sampling interval, reduced to a median whenever
//! the controller wants a value. The median is taken over a sorted copy so
//! the ring itself keeps arrival order.

use embedded_hal::delay::DelayNs;
use heapless::HistoryBuffer;

/// Ring depth for the TDS probe.
pub const TDS_SAMPLES: usize = 30;
/// Ring depth for the pH probe.
pub const PH_SAMPLES: usize = 10;

/// Fixed-capacity ring of raw ADC counts. New samples overwrite the oldest.
#[derive(Debug, Clone)]
pub struct SampleBuffer<const N: usize> {
    ring: HistoryBuffer<u16, N>,
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuffer::new(),
        }
    }

    pub fn push(&mut self, raw: u16) {
        self.ring.write(raw);
    }

    /// Number of valid samples, saturating at `N`.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.ring.len() == self.ring.capacity()
    }

    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Median of the valid samples. Even counts average the two middle
    /// values; an empty buffer reads as 0.
    pub fn median(&self) -> u16 {
        let Ok(mut sorted) = heapless::Vec::<u16, N>::from_slice(self.ring.as_slice()) else {
            return 0;
        };
        if sorted.is_empty() {
            return 0;
        }
        sorted.sort_unstable();

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            ((u32::from(sorted[mid - 1]) + u32::from(sorted[mid])) / 2) as u16
        }
    }
}

/// A [`SampleBuffer`] paired with its minimum sampling interval.
#[derive(Debug, Clone)]
pub struct AnalogFilter<const N: usize> {
    buffer: SampleBuffer<N>,
    interval_ms: u32,
    last_sample_ms: Option<u64>,
}

impl<const N: usize> AnalogFilter<N> {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            buffer: SampleBuffer::new(),
            interval_ms,
            last_sample_ms: None,
        }
    }

    /// Take one sample through `read` if at least the interval has passed
    /// since the previous one. The first call always samples.
    ///
    /// Returns whether a sample was taken.
    pub fn sample(&mut self, now_ms: u64, read: impl FnOnce() -> u16) -> bool {
        let due = self
            .last_sample_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= u64::from(self.interval_ms));
        if due {
            self.buffer.push(read());
            self.last_sample_ms = Some(now_ms);
        }
        due
    }

    /// Blocking fill: `count` samples spaced by the filter interval.
    ///
    /// Used once at startup so the first control decision sees a full ring
    /// instead of a single raw read.
    pub fn burst(&mut self, count: usize, delay: &mut impl DelayNs, mut read: impl FnMut() -> u16) {
        for i in 0..count {
            if i > 0 {
                delay.delay_ms(self.interval_ms);
            }
            self.buffer.push(read());
        }
    }

    pub fn median(&self) -> u16 {
        self.buffer.median()
    }

    pub fn buffer(&self) -> &SampleBuffer<N> {
        &self.buffer
    }

    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoDelay {
        total_ms: u32,
    }

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    #[test]
    fn empty_median_is_zero() {
        let buf = SampleBuffer::<5>::new();
        assert!(buf.is_empty());
        assert_eq!(buf.median(), 0);
    }

    #[test]
    fn odd_median_ignores_outlier() {
        let mut buf = SampleBuffer::<5>::new();
        for raw in [100, 102, 4095, 101, 99] {
            buf.push(raw);
        }
        assert_eq!(buf.median(), 101);
    }

    #[test]
    fn even_median_averages_middle_pair() {
        let mut buf = SampleBuffer::<4>::new();
        for raw in [10, 40, 20, 30] {
            buf.push(raw);
        }
        assert_eq!(buf.median(), 25);
    }

    #[test]
    fn partial_ring_uses_only_valid_samples() {
        let mut buf = SampleBuffer::<30>::new();
        buf.push(7);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.median(), 7);
    }

    #[test]
    fn full_only_at_capacity() {
        let mut buf = SampleBuffer::<3>::new();
        assert!(buf.is_empty() && !buf.is_full());
        buf.push(1);
        buf.push(2);
        assert!(!buf.is_full());
        buf.push(3);
        assert!(buf.is_full());
        buf.clear();
        assert!(!buf.is_full());
    }

    #[test]
    fn oldest_sample_is_overwritten() {
        let mut buf = SampleBuffer::<3>::new();
        for raw in [1000, 1000, 1000, 5, 5] {
            buf.push(raw);
        }
        assert!(buf.is_full());
        assert_eq!(buf.median(), 5);
    }

    #[test]
    fn filter_respects_interval() {
        let mut f = AnalogFilter::<TDS_SAMPLES>::new(40);
        assert!(f.sample(0, || 1));
        assert!(!f.sample(39, || 2));
        assert!(f.sample(40, || 3));
        assert!(!f.sample(79, || 4));
        assert!(f.sample(200, || 5));
        assert_eq!(f.buffer().len(), 3);
    }

    #[test]
    fn burst_fills_ring_and_waits_between_samples() {
        let mut f = AnalogFilter::<PH_SAMPLES>::new(30);
        let mut delay = NoDelay { total_ms: 0 };
        let mut next = 0u16;
        f.burst(PH_SAMPLES, &mut delay, || {
            next += 1;
            next
        });
        assert!(f.buffer().is_full());
        assert_eq!(delay.total_ms, 30 * (PH_SAMPLES as u32 - 1));
        assert_eq!(f.median(), 5);
    }
}
