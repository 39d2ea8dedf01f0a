#![allow(dead_code)]

use embedded_hal_async::delay::DelayNs;
use mic_dsp::{AdcDma, TransferConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Drain,
    Running(bool),
    Armed { count: usize },
    Completed { written: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Write every slot, then resolve.
    Fill,
    /// Write half the slots and never resolve.
    Stall,
    /// Resolve after this many writes.
    StopAfter(usize),
    /// A conversion left in flight never finishes. Draining returns at once
    /// and the transfer waits on it forever without writing.
    Wedged,
}

/// ADC + transfer channel that replays `source` in a loop.
pub struct FakeAdcDma {
    pub events: Vec<Event>,
    pub configs: Vec<TransferConfig>,
    pub running: bool,
    pub behavior: Behavior,
    source: Vec<u16>,
    cursor: usize,
}

impl FakeAdcDma {
    pub fn new(source: &[u16]) -> Self {
        assert!(!source.is_empty());
        Self {
            events: Vec::new(),
            configs: Vec::new(),
            running: false,
            behavior: Behavior::Fill,
            source: source.to_vec(),
            cursor: 0,
        }
    }

    pub fn constant(code: u16) -> Self {
        Self::new(&[code])
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn set_source(&mut self, source: &[u16]) {
        self.source = source.to_vec();
        self.cursor = 0;
    }

    fn next_sample(&mut self) -> u16 {
        let sample = self.source[self.cursor % self.source.len()];
        self.cursor += 1;
        sample
    }

    fn write(&mut self, dest: &mut [u16], count: usize) {
        for slot in dest.iter_mut().take(count) {
            *slot = self.next_sample();
        }
    }
}

impl AdcDma for FakeAdcDma {
    fn drain_fifo(&mut self) {
        self.events.push(Event::Drain);
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
        self.events.push(Event::Running(running));
    }

    async fn transfer(&mut self, config: &TransferConfig, dest: &mut [u16]) -> usize {
        self.configs.push(*config);
        self.events.push(Event::Armed { count: dest.len() });
        self.set_running(true);

        let count = match self.behavior {
            Behavior::Fill => dest.len(),
            Behavior::StopAfter(n) => n.min(dest.len()),
            Behavior::Stall => {
                self.write(dest, dest.len() / 2);
                return core::future::pending::<usize>().await;
            }
            Behavior::Wedged => return core::future::pending::<usize>().await,
        };
        self.write(dest, count);
        self.events.push(Event::Completed { written: count });
        count
    }
}

/// Delay that resolves on first poll and records what was asked for.
#[derive(Default)]
pub struct FakeDelay {
    pub requested_ns: Vec<u32>,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.requested_ns.push(ns);
    }
}

/// `a, b, a, b, ...`
pub fn alternating(a: u16, b: u16) -> [u16; 2] {
    [a, b]
}
