//! simfleet 指标收集模块
//!
//! 命令处理与收敛循环的运行指标。

use std::time::Duration;

use contracts::{MotionKind, MotionOutcome};
use metrics::{counter, gauge, histogram};

/// 命令处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    /// 调用方错误 (4xx)
    Rejected,
    /// 收敛超时
    TimedOut,
    /// 仿真器或内部错误 (5xx)
    Failed,
}

impl CommandStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandStatus::Ok => "ok",
            CommandStatus::Rejected => "rejected",
            CommandStatus::TimedOut => "timed_out",
            CommandStatus::Failed => "failed",
        }
    }
}

/// 记录一次命令处理
///
/// # Example
///
/// ```ignore
/// let started = Instant::now();
/// let response = next.run(request).await;
/// record_command("/move-distance", CommandStatus::Ok, started.elapsed());
/// ```
pub fn record_command(command: &str, status: CommandStatus, elapsed: Duration) {
    counter!(
        "simfleet_commands_total",
        "command" => command.to_string(),
        "status" => status.as_str()
    )
    .increment(1);

    histogram!("simfleet_command_duration_ms", "command" => command.to_string())
        .record(elapsed.as_secs_f64() * 1000.0);
}

/// 记录收敛循环结果
pub fn record_convergence(kind: MotionKind, outcome: &MotionOutcome) {
    histogram!("simfleet_convergence_polls", "kind" => kind.as_str())
        .record(outcome.polls() as f64);

    if !outcome.is_converged() {
        counter!("simfleet_convergence_timeouts_total", "kind" => kind.as_str()).increment(1);
    }
}

/// 记录当前机器人数量
pub fn record_fleet_size(size: usize) {
    gauge!("simfleet_fleet_size").set(size as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        let labels: Vec<_> = [
            CommandStatus::Ok,
            CommandStatus::Rejected,
            CommandStatus::TimedOut,
            CommandStatus::Failed,
        ]
        .iter()
        .map(|s| s.as_str())
        .collect();
        assert_eq!(labels, vec!["ok", "rejected", "timed_out", "failed"]);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let outcome = MotionOutcome::TimedOut {
            target: 1.0,
            achieved: 0.2,
            polls: 10,
        };
        record_convergence(MotionKind::MoveDistance, &outcome);
        record_command("stop", CommandStatus::Ok, Duration::from_millis(3));
        record_fleet_size(2);
    }
}
