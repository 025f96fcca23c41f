use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::drivers::joystick::event::SwitchReport;

use super::{Action, CodeSlot, SwitchState, SwitchTable};

/// Key state sent with every switch transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released = 0,
    Pressed = 1,
}

impl KeyState {
    pub fn value(&self) -> u32 {
        *self as u32
    }
}

/// A press or release of one switch code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub time_ms: u32,
    pub switch: String,
    pub input: u32,
    pub code: u16,
    pub state: KeyState,
    pub action: Action,
}

/// Counts of raw reports that were dropped by the router
#[derive(Debug, Default)]
pub struct RouterCounters {
    unmatched: AtomicU64,
    out_of_range: AtomicU64,
    spurious_release: AtomicU64,
}

impl RouterCounters {
    /// Reports with no configured switch
    pub fn unmatched(&self) -> u64 {
        self.unmatched.load(Ordering::Relaxed)
    }

    /// Single-code reports with a value other than 0 or 1
    pub fn out_of_range(&self) -> u64 {
        self.out_of_range.load(Ordering::Relaxed)
    }

    /// Bipolar releases with no asserted code
    pub fn spurious_release(&self) -> u64 {
        self.spurious_release.load(Ordering::Relaxed)
    }
}

/// Translates raw switch reports into code transitions. The router owns the
/// switch table and is the only writer of each switch's state.
#[derive(Debug)]
pub struct SwitchRouter {
    table: SwitchTable,
    counters: Arc<RouterCounters>,
}

impl SwitchRouter {
    pub fn new(table: SwitchTable) -> Self {
        Self {
            table,
            counters: Arc::new(RouterCounters::default()),
        }
    }

    pub fn table(&self) -> &SwitchTable {
        &self.table
    }

    /// Returns a shared handle to the drop counters
    pub fn counters(&self) -> Arc<RouterCounters> {
        self.counters.clone()
    }

    /// Route a single raw report. Returns the resulting transition, or `None`
    /// if the report does not change any switch.
    pub fn route(&mut self, report: &SwitchReport) -> Option<Transition> {
        let Some(entry) = self.table.find_mut(report.class, report.index) else {
            log::trace!(
                "Not assigned (class={}, index={}, value={})",
                report.class,
                report.index,
                report.value
            );
            self.counters.unmatched.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        log::trace!(
            "Switch '{}' report (class={}, index={}, value={})",
            entry.name,
            report.class,
            report.index,
            report.value
        );

        let (slot, state) = if entry.is_bipolar() {
            match report.value {
                v if v < 0 => {
                    entry.last = SwitchState::Asserted(CodeSlot::First);
                    (CodeSlot::First, KeyState::Pressed)
                }
                v if v > 0 => {
                    entry.last = SwitchState::Asserted(CodeSlot::Second);
                    (CodeSlot::Second, KeyState::Pressed)
                }
                _ => {
                    let SwitchState::Asserted(slot) = entry.last else {
                        log::trace!("Switch '{}' released while idle", entry.name);
                        self.counters
                            .spurious_release
                            .fetch_add(1, Ordering::Relaxed);
                        return None;
                    };
                    entry.last = SwitchState::Idle;
                    (slot, KeyState::Released)
                }
            }
        } else {
            match report.value {
                0 => (CodeSlot::First, KeyState::Released),
                1 => (CodeSlot::First, KeyState::Pressed),
                _ => {
                    log::trace!(
                        "Switch '{}' value {} out of range",
                        entry.name,
                        report.value
                    );
                    self.counters.out_of_range.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        };

        let code = entry.code(slot)?;
        Some(Transition {
            time_ms: report.time_ms,
            switch: entry.name.clone(),
            input: entry.input,
            code: code.code,
            state,
            action: code.action.clone(),
        })
    }
}
