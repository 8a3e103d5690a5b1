use crate::domain::model::SportHarvest;
#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct SystemStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// 單次收割的結果統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStats {
    pub sports: usize,
    pub found: usize,
    pub empty: usize,
    pub failed: usize,
    pub events: usize,
}

impl HarvestStats {
    pub fn from_harvests(harvests: &[SportHarvest]) -> Self {
        use crate::domain::model::SportOutcome;

        let mut stats = Self {
            sports: harvests.len(),
            ..Self::default()
        };
        for harvest in harvests {
            match &harvest.outcome {
                SportOutcome::Found(events) => {
                    stats.found += 1;
                    stats.events += events.len();
                }
                SportOutcome::Empty => stats.empty += 1,
                SportOutcome::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }
}

pub struct RunMonitor {
    #[cfg(feature = "cli")]
    system: Mutex<System>,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
    #[cfg(feature = "cli")]
    peak_memory: Mutex<u64>,
    start_time: Instant,
    enabled: bool,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            #[cfg(feature = "cli")]
            system: Mutex::new(System::new()),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
            #[cfg(feature = "cli")]
            peak_memory: Mutex::new(0),
            start_time: Instant::now(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[cfg(feature = "cli")]
    pub fn get_stats(&self) -> Option<SystemStats> {
        if !self.enabled {
            return None;
        }

        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        Some(SystemStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: *peak,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    #[cfg(not(feature = "cli"))]
    pub fn get_stats(&self) -> Option<SystemStats> {
        None
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self, harvests: &[SportHarvest]) {
        let stats = HarvestStats::from_harvests(harvests);
        tracing::info!(
            "📊 Harvest Stats - {} sports: {} found, {} empty, {} failed; {} events in {:?}",
            stats.sports,
            stats.found,
            stats.empty,
            stats.failed,
            stats.events,
            self.elapsed()
        );
        for harvest in harvests {
            tracing::debug!("  {}", harvest.summary());
        }
        self.log_stats("Final");
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
