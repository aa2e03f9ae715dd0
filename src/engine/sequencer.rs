// ==========================================
// 制管车间排产系统 - 队列排序引擎
// ==========================================
// 职责: 五键排序保持同料连续,异型管机2硬约束订单前置
// 输入: 已分组并计算组最早交期的订单队列
// 输出: 排序后的合并队列 + 换料标记
// ==========================================

use crate::domain::types::Machine;
use crate::domain::Order;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::HashMap;

// ==========================================
// QueueSequencer - 队列排序引擎
// ==========================================
pub struct QueueSequencer {
    // 无状态引擎,不需要注入依赖
}

impl QueueSequencer {
    pub fn new() -> Self {
        Self {}
    }

    /// 排序合并队列
    ///
    /// 排序键（升序,标注除外）:
    /// 1) 组最早交期（无交期组视为最晚）
    /// 2) 材质键
    /// 3) 材料厚度
    /// 4) 是否有交期（降序,有交期在前）
    /// 5) 自身交期
    ///
    /// 随后仅对异型管机2子队列追加首键重排:
    /// 异型管机1不可生产的订单（降序）排最前,其余键不变。
    pub fn sequence(&self, mut orders: Vec<Order>) -> Vec<Order> {
        orders.sort_by(compare_queue_keys);

        // 异型管机2子队列单独重排后接回队尾,其余订单相对顺序不变
        let mut rest = Vec::with_capacity(orders.len());
        let mut profile2 = Vec::new();
        for order in orders {
            if order.machine == Some(Machine::Profile2) {
                profile2.push(order);
            } else {
                rest.push(order);
            }
        }

        profile2.sort_by(|a, b| {
            b.profile1_incompatible
                .cmp(&a.profile1_incompatible)
                .then_with(|| compare_queue_keys(a, b))
        });

        rest.extend(profile2);
        rest
    }

    /// 重算换料标记
    ///
    /// 设备队列逐行比较 (厚度, 材质),任一不同即需换料;
    /// 每台设备的首单恒为换料。队列任何重排后必须重算。
    pub fn recompute_changeover(&self, orders: &mut [Order]) {
        let mut last_signature: HashMap<Machine, (Option<i64>, String)> = HashMap::new();

        for order in orders.iter_mut() {
            let Some(machine) = order.machine else {
                order.changeover = false;
                continue;
            };
            let signature = (order.thickness_key(), order.material_key.clone());
            order.changeover = match last_signature.get(&machine) {
                Some(prev) => *prev != signature,
                None => true,
            };
            last_signature.insert(machine, signature);
        }
    }
}

impl Default for QueueSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// 五键比较（组最早交期 / 材质 / 厚度 / 有无交期 / 自身交期）
fn compare_queue_keys(a: &Order, b: &Order) -> Ordering {
    let group_due_a = a.group_due.unwrap_or(NaiveDateTime::MAX);
    let group_due_b = b.group_due.unwrap_or(NaiveDateTime::MAX);
    match group_due_a.cmp(&group_due_b) {
        Ordering::Equal => {}
        other => return other,
    }

    match a.material_key.cmp(&b.material_key) {
        Ordering::Equal => {}
        other => return other,
    }

    let thickness_a = a.thickness_key().unwrap_or(i64::MAX);
    let thickness_b = b.thickness_key().unwrap_or(i64::MAX);
    match thickness_a.cmp(&thickness_b) {
        Ordering::Equal => {}
        other => return other,
    }

    // 有交期在前（降序）
    match b.has_due_date().cmp(&a.has_due_date()) {
        Ordering::Equal => {}
        other => return other,
    }

    let due_a = a.due_date.unwrap_or(NaiveDateTime::MAX);
    let due_b = b.due_date.unwrap_or(NaiveDateTime::MAX);
    due_a.cmp(&due_b)
}

#[cfg(test)]
mod tests;
