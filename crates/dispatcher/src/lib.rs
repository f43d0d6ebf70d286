//! # Dispatcher
//!
//! HTTP 命令入口。
//!
//! 负责：
//! - 把每条命令路由到 `Session` 上的对应操作
//! - 解析 kebab-case 查询参数并拒绝非法值
//! - 将 `ControlError` 映射为 HTTP 状态码
//! - 每条命令记录一次耗时与结果指标
//!
//! 所有命令共享一个 `Mutex<Session>`，因此按到达顺序串行执行。

pub mod error;
pub mod handlers;
pub mod router;

pub use error::{DispatchError, Result};
pub use router::{router, AppState, SharedSession};
