// ==========================================
// 制管车间排产系统 - 生产时间估算
// ==========================================
// 职责: 未完成数量 ÷ 设备产能 → 整分钟生产时长
// ==========================================

use crate::domain::Order;

// ==========================================
// ProductionTimeEstimator - 生产时间估算器
// ==========================================
pub struct ProductionTimeEstimator {
    // 无状态引擎,不需要注入依赖
}

impl ProductionTimeEstimator {
    pub fn new() -> Self {
        Self {}
    }

    /// 单笔订单生产时长（分钟,四舍五入到整分钟）
    ///
    /// 未分配设备按 0 处理（分配完成后不应出现,防御取值）
    pub fn duration_minutes(&self, order: &Order) -> i64 {
        let Some(machine) = order.machine else {
            return 0;
        };
        let hours = order.remaining_qty / machine.throughput_per_hour();
        (hours * 60.0).round() as i64
    }

    /// 批量写回生产时长
    pub fn estimate_all(&self, orders: &mut [Order]) {
        for order in orders.iter_mut() {
            order.duration_min = self.duration_minutes(order);
        }
    }
}

impl Default for ProductionTimeEstimator {
    fn default() -> Self {
        Self::new()
    }
}
