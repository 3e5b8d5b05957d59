//! Process and runtime information reported by health probes.
//!
//! [`RuntimeInfoProvider`] is the seam between the responder and the host
//! process. [`SystemRuntime`] is the real implementation, backed by
//! `sysinfo` for memory and CPU figures.

use std::sync::Mutex;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, System};

use crate::error::DiagnosticError;

/// Memory figures for the current process, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    /// Resident set size
    pub rss: u64,
    /// Address space reserved by the process
    pub heap_total: u64,
    /// Address space actually backed by memory
    pub heap_used: u64,
    /// Memory held outside the process heap
    pub external: u64,
}

/// CPU figures for the current process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuUsage {
    /// Usage since the previous sample, where 100.0 is one full core
    pub percent: f32,
    /// Logical cores available to the process
    pub cores: usize,
}

/// Supplies the per-request process facts that go into a health payload.
pub trait RuntimeInfoProvider: Send + Sync {
    /// Seconds the process has been up, fractional.
    fn uptime_secs(&self) -> f64;

    fn pid(&self) -> u32;

    fn memory_usage(&self) -> Result<MemoryUsage, DiagnosticError>;

    fn cpu_usage(&self) -> Result<CpuUsage, DiagnosticError>;

    /// Version string of the running service.
    fn version(&self) -> String;

    fn platform(&self) -> String;

    fn architecture(&self) -> String;
}

/// Reads the live process through `sysinfo`.
///
/// Uptime counts from construction, so build one as early as possible in
/// `main`. CPU usage is the delta between two refreshes of the same
/// `System`, so CPU and memory each keep their own handle: a memory read
/// must not reset the CPU baseline taken by the previous probe.
///
/// Samples read `/proc` synchronously under a std `Mutex`. That is a few
/// microseconds per probe; move it to `spawn_blocking` if it grows.
pub struct SystemRuntime {
    started_at: Instant,
    pid: Pid,
    memory: Mutex<System>,
    cpu: Mutex<System>,
}

impl SystemRuntime {
    pub fn new() -> Self {
        let pid = Pid::from_u32(std::process::id());
        let mut cpu = System::new();
        // Prime the CPU counters so the first probe has a baseline
        cpu.refresh_process(pid);

        Self {
            started_at: Instant::now(),
            pid,
            memory: Mutex::new(System::new()),
            cpu: Mutex::new(cpu),
        }
    }

    fn sample<T>(
        &self,
        system: &Mutex<System>,
        read: impl FnOnce(&sysinfo::Process) -> T,
    ) -> Result<T, DiagnosticError> {
        let mut system = system
            .lock()
            .map_err(|_| DiagnosticError::new("Process statistics lock poisoned"))?;

        if !system.refresh_process(self.pid) {
            return Err(DiagnosticError::new(format!(
                "Process {} not found in process table",
                self.pid
            )));
        }

        system
            .process(self.pid)
            .map(read)
            .ok_or_else(|| DiagnosticError::new(format!("Process {} vanished", self.pid)))
    }
}

impl Default for SystemRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeInfoProvider for SystemRuntime {
    fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    fn pid(&self) -> u32 {
        self.pid.as_u32()
    }

    fn memory_usage(&self) -> Result<MemoryUsage, DiagnosticError> {
        self.sample(&self.memory, |process| {
            let resident = process.memory();
            let reserved = process.virtual_memory();
            MemoryUsage {
                rss: resident,
                heap_total: reserved,
                heap_used: resident,
                // No allocator outside the Rust heap is tracked
                external: 0,
            }
        })
    }

    fn cpu_usage(&self) -> Result<CpuUsage, DiagnosticError> {
        let percent = self.sample(&self.cpu, |process| process.cpu_usage())?;
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Ok(CpuUsage { percent, cores })
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn platform(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn architecture(&self) -> String {
        std::env::consts::ARCH.to_string()
    }
}
