#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

/// Process stats logged per pipeline stage when `--monitor` is on.
#[cfg(feature = "cli")]
pub struct RunMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    peak_memory_mb: Mutex<u64>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new();
        if enabled {
            system.refresh_all();
        }
        Self {
            system: Mutex::new(system),
            pid: sysinfo::get_current_pid().ok(),
            started: Instant::now(),
            peak_memory_mb: Mutex::new(0),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.pid.is_some()
    }

    /// Log cpu/memory/elapsed for a stage, tracking the memory peak.
    pub fn observe(&self, stage: &str) {
        if !self.enabled {
            return;
        }
        let Some(pid) = self.pid else { return };
        let Ok(mut system) = self.system.lock() else { return };
        system.refresh_all();
        let Some(process) = system.process(pid) else { return };

        let memory_mb = process.memory() / 1024 / 1024;
        let cpu_usage = process.cpu_usage();

        let Ok(mut peak) = self.peak_memory_mb.lock() else { return };
        if memory_mb > *peak {
            *peak = memory_mb;
        }
        tracing::info!(
            "{}: cpu {:.1}%, memory {}MB (peak {}MB), elapsed {:?}",
            stage,
            cpu_usage,
            memory_mb,
            *peak,
            self.started.elapsed()
        );
    }

    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        if let Ok(peak) = self.peak_memory_mb.lock() {
            tracing::info!(
                "run finished in {:?}, peak memory {}MB",
                self.started.elapsed(),
                *peak
            );
        }
    }
}

#[cfg(feature = "cli")]
impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// No-op stand-in when the crate is built without the CLI stack.
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct RunMonitor;

#[cfg(not(feature = "cli"))]
impl RunMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn observe(&self, _stage: &str) {}

    pub fn finish(&self) {}
}
