// ==========================================
// 制管车间排产系统 - 排程推算引擎
// ==========================================
// 职责: 沿班次日历推算每单生产开始/结束时间
// 红线: 设备游标由本引擎独占更新,严格按队列顺序推进
// 输入: 已排序并标记换料/时长的合并队列
// 输出: 每单时间区间 + 各设备游标
// ==========================================

use crate::domain::types::Machine;
use crate::domain::Order;
use crate::engine::calendar::ShiftCalendar;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;
use tracing::debug;

/// 换料惩罚（分钟）
pub const DEFAULT_CHANGEOVER_PENALTY_MIN: i64 = 15;

/// 分段间缓冲（分钟）
pub const DEFAULT_SEGMENT_GAP_MIN: i64 = 1;

/// 单段搜索保护期限: 固定日历每天都有班次,超出即判定日历被破坏
const SEARCH_GUARD_DAYS: i64 = 3_650;

// ==========================================
// ScheduleProjector - 排程推算引擎
// ==========================================
pub struct ScheduleProjector {
    calendar: ShiftCalendar,
    changeover_penalty_min: i64,
    segment_gap_min: i64,
}

impl ScheduleProjector {
    pub fn new() -> Self {
        Self::with_penalties(DEFAULT_CHANGEOVER_PENALTY_MIN, DEFAULT_SEGMENT_GAP_MIN)
    }

    pub fn with_penalties(changeover_penalty_min: i64, segment_gap_min: i64) -> Self {
        Self {
            calendar: ShiftCalendar::new(),
            changeover_penalty_min,
            segment_gap_min,
        }
    }

    /// 推算合并队列的生产时间
    ///
    /// 每台设备的游标自 `horizon_start` 重新初始化（含重排后的再次推算）,
    /// 逐单推进:
    /// 1) 开始候选 = 设备游标,需换料再加惩罚分钟
    /// 2) 剩余时长分段消耗: 跳过休息时段,钳到班次开始,
    ///    段间留缓冲分钟,直到时长耗尽
    /// 3) 订单开始 = 首段开始,结束 = 末段结束;
    ///    游标 = 末段结束（不含缓冲）
    ///
    /// # 返回
    /// 各设备推算完成后的游标
    pub fn project(
        &self,
        orders: &mut [Order],
        horizon_start: NaiveDateTime,
    ) -> EngineResult<HashMap<Machine, NaiveDateTime>> {
        let mut cursors: HashMap<Machine, NaiveDateTime> = Machine::ALL
            .iter()
            .map(|&m| (m, horizon_start))
            .collect();

        for order in orders.iter_mut() {
            let machine = order.machine.ok_or_else(|| EngineError::UnassignedMachine {
                order_id: order.order_id.clone(),
            })?;

            let mut current = cursors[&machine];
            if order.changeover {
                current += Duration::minutes(self.changeover_penalty_min);
            }

            let (first_start, last_end) = self.consume(&order.order_id, current, order.duration_min)?;

            order.start_time = Some(first_start);
            order.end_time = Some(last_end);
            cursors.insert(machine, last_end);

            debug!(
                order_id = %order.order_id,
                machine = %machine,
                start = %first_start,
                end = %last_end,
                "订单排程推算完成"
            );
        }

        Ok(cursors)
    }

    /// 自 `from` 起消耗 `duration_min` 分钟的生产时长
    ///
    /// # 返回
    /// (首段开始, 末段结束)
    fn consume(
        &self,
        order_id: &str,
        from: NaiveDateTime,
        duration_min: i64,
    ) -> EngineResult<(NaiveDateTime, NaiveDateTime)> {
        let guard_end = from + Duration::days(SEARCH_GUARD_DAYS);

        // 零时长订单: 占位在最近可生产时刻,不消耗日历
        if duration_min <= 0 {
            let (slot_start, _) = self.calendar.available_from(from);
            return Ok((slot_start, slot_start));
        }

        let mut current = from;
        let mut remaining = duration_min;
        let mut first_start: Option<NaiveDateTime> = None;
        let mut last_end = from;

        while remaining > 0 {
            if current > guard_end {
                return Err(EngineError::CalendarExhausted {
                    order_id: order_id.to_string(),
                    from,
                    limit_days: SEARCH_GUARD_DAYS,
                });
            }

            let (segment_start, available_min) = self.calendar.available_from(current);
            let produced = remaining.min(available_min);
            let segment_end = segment_start + Duration::minutes(produced);

            first_start.get_or_insert(segment_start);
            last_end = segment_end;
            remaining -= produced;
            current = segment_end + Duration::minutes(self.segment_gap_min);
        }

        // first_start 在首轮循环必然写入
        let start = first_start.unwrap_or(from);
        Ok((start, last_end))
    }
}

impl Default for ScheduleProjector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
