//! # 数据模型
//!
//! 定义批量分享分发系统的核心数据结构。
//!
//! ## 核心模型
//!
//! ### DispatchJob - 分发作业
//! 一次批量分享请求对应的作业描述，包含目标链接、凭证、份数和并发参数。
//!
//! ### TaskOutcome - 单次任务结果
//! 作业中某一份分享尝试的最终结果，成功携带上游返回内容，失败携带错误分类。
//!
//! ### JobResult - 作业汇总结果
//! 作业完成后的聚合视图，包含成功/失败计数和全部任务结果。
//!
//! ## 设计原则
//!
//! - 作业一旦构造即不可变，执行过程中只读
//! - 状态字段使用枚举类型，避免无效状态
//! - 面向HTTP响应的模型实现 `serde` 序列化

pub mod job;
pub mod outcome;

pub use job::*;
pub use outcome::*;
