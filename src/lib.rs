// ==========================================
// 制管车间排产系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV/Excel 批处理
// 系统定位: 订单分配/排程推算/逾期重排的确定性批计算
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 输出层 - 结果表单
pub mod exporter;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DeliveryStatus, Machine, ProcessType};

// 领域实体
pub use domain::{DeliveryEntry, Order, OrderTable, RawOrderRecord};

// 引擎
pub use engine::{
    DeviceAssigner, EngineError, LatenessResolver, OrderGrouper, ProductionTimeEstimator,
    QueueSequencer, ScheduleOrchestrator, ScheduleProjector, ScheduleResult, ShiftCalendar,
};

// 配置
pub use config::ScheduleConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "制管车间排产系统";
