// ==========================================
// 制管车间排产系统 - 班次日历
// ==========================================
// 职责: 固定班次/休息时段的日历查询
// 班次: 08:00-12:00 / 13:30-17:30 / 18:00-21:00
// 休息: 12:00-13:30 / 17:30-18:00 / 21:00-次日08:00
// ==========================================

use chrono::{Duration, NaiveDateTime, Timelike};

/// 每日工作班次（时,分）
const WORK_SHIFTS: [((u32, u32), (u32, u32)); 3] =
    [((8, 0), (12, 0)), ((13, 30), (17, 30)), ((18, 0), (21, 0))];

/// 日间休息时段（跨天休息 21:00-08:00 单独处理）
const DAY_BREAKS: [((u32, u32), (u32, u32)); 2] = [((12, 0), (13, 30)), ((17, 30), (18, 0))];

/// 夜间休息起点 / 次日复工时刻
const NIGHT_BREAK_START: (u32, u32) = (21, 0);
const DAY_START: (u32, u32) = (8, 0);

fn at(t: NaiveDateTime, (h, m): (u32, u32)) -> NaiveDateTime {
    // 时刻常量均为合法时分,失败分支不可达
    t.date().and_hms_opt(h, m, 0).unwrap_or(t)
}

// ==========================================
// ShiftSlot - 班次查询结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSlot {
    pub start: NaiveDateTime,   // 班次开始
    pub end: NaiveDateTime,     // 班次结束
    pub available_min: i64,     // 从查询时刻(不早于班次开始)到班次结束的分钟数
}

// ==========================================
// ShiftCalendar - 班次日历
// ==========================================
pub struct ShiftCalendar {
    // 无状态,纯时间函数
}

impl ShiftCalendar {
    pub fn new() -> Self {
        Self {}
    }

    /// 判断 t 是否处于休息时段
    ///
    /// # 返回
    /// - `Some(休息结束时间)`: t 在休息时段内
    /// - `None`: t 在工作时段内
    ///
    /// 夜间休息跨天: 21:00 起到次日 08:00,凌晨时段归前一日夜休
    pub fn break_end_at(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        // 凌晨 00:00-08:00 属前一日夜休
        if (t.hour(), t.minute()) < DAY_START {
            return Some(at(t, DAY_START));
        }

        // 夜休 21:00 之后,复工点在次日
        if (t.hour(), t.minute()) >= NIGHT_BREAK_START {
            return Some(at(t, DAY_START) + Duration::days(1));
        }

        for (start, end) in DAY_BREAKS {
            let break_start = at(t, start);
            let break_end = at(t, end);
            if break_start <= t && t < break_end {
                return Some(break_end);
            }
        }
        None
    }

    /// 覆盖或晚于 t 的下一个工作班次及剩余可用分钟数
    ///
    /// 当日班次已全部结束时,返回次日第一个班次（整段 240 分钟可用）
    pub fn next_window(&self, t: NaiveDateTime) -> ShiftSlot {
        for (start, end) in WORK_SHIFTS {
            let shift_start = at(t, start);
            let shift_end = at(t, end);
            if t < shift_end {
                let effective_start = t.max(shift_start);
                return ShiftSlot {
                    start: shift_start,
                    end: shift_end,
                    available_min: (shift_end - effective_start).num_minutes(),
                };
            }
        }

        let next_day_start = at(t, WORK_SHIFTS[0].0) + Duration::days(1);
        let next_day_end = at(t, WORK_SHIFTS[0].1) + Duration::days(1);
        ShiftSlot {
            start: next_day_start,
            end: next_day_end,
            available_min: (next_day_end - next_day_start).num_minutes(),
        }
    }

    /// 从 t 起最近的可生产时刻及首段可用分钟数
    ///
    /// 先跳过休息时段,再取下一个班次并钳到班次开始
    pub fn available_from(&self, t: NaiveDateTime) -> (NaiveDateTime, i64) {
        let after_break = self.break_end_at(t).unwrap_or(t);
        let slot = self.next_window(after_break);
        (after_break.max(slot.start), slot.available_min)
    }
}

impl Default for ShiftCalendar {
    fn default() -> Self {
        Self::new()
    }
}
