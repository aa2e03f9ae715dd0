// ==========================================
// 制管车间排产系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 日历不变量 =====
    // 固定班次日历每天都有工作时段,推算超出保护期限
    // 说明日历查询被破坏,按致命错误处理
    #[error("日历推算越界 (订单 {order_id}): 自 {from} 起 {limit_days} 天内未找到可用班次")]
    CalendarExhausted {
        order_id: String,
        from: chrono::NaiveDateTime,
        limit_days: i64,
    },

    // ===== 队列前置条件 =====
    #[error("订单 {order_id} 未分配设备,无法推算排程")]
    UnassignedMachine { order_id: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
