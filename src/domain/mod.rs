// ==========================================
// 制管车间排产系统 - 领域层
// ==========================================
// 职责: 实体与共享类型,不含业务规则
// ==========================================

pub mod order;
pub mod types;

// 重导出核心实体
pub use order::{DeliveryEntry, Order, OrderTable, RawOrderRecord};
pub use types::{DeliveryStatus, Machine, ProcessType};
