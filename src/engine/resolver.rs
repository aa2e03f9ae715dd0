// ==========================================
// 制管车间排产系统 - 逾期重排引擎
// ==========================================
// 职责: 判定逾期订单,向前搜索无交期订单并移位让道
// 红线: 移位决策基于单次一致快照,先全部标记再一次性重排
// 输入: 已推算时间的设备分块队列（组编号为当前队列顺序）
// 输出: 标记/移位后的新队列
// ==========================================

use crate::domain::types::{DeliveryStatus, Machine};
use crate::domain::Order;
use std::collections::HashMap;
use tracing::{debug, info};

// ==========================================
// LatenessResolver - 逾期重排引擎
// ==========================================
pub struct LatenessResolver {
    // 无状态引擎,不需要注入依赖
}

impl LatenessResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 判定交付状态
    ///
    /// 无交期,或交期不早于自身生产结束时间 → 按时交付;否则逾期。
    /// 无交期订单永不因哨兵比较被判逾期。
    pub fn evaluate_status(&self, orders: &mut [Order]) {
        for order in orders.iter_mut() {
            order.status = match (order.due_date, order.end_time) {
                (Some(due), Some(end)) if due < end => DeliveryStatus::Overdue,
                _ => DeliveryStatus::OnTime,
            };
        }
    }

    /// 标记可移位订单
    ///
    /// 逐台设备: 对每个逾期订单,自其组编号向 0 方向回溯,
    /// 在第一个含"无交期且未移位"成员的非空组停下,
    /// 标记该组全部此类成员,不再继续向前。
    ///
    /// # 返回
    /// 本次新增标记数（0 表示已到不动点）
    pub fn mark_relocatable(&self, orders: &mut [Order]) -> usize {
        // 设备内组编号 → 成员下标（基于当前队列快照）
        let mut groups: HashMap<(Machine, usize), Vec<usize>> = HashMap::new();
        for (idx, order) in orders.iter().enumerate() {
            if let (Some(machine), Some(group_id)) = (order.machine, order.group_id) {
                groups.entry((machine, group_id)).or_default().push(idx);
            }
        }

        let overdue: Vec<(Machine, usize)> = orders
            .iter()
            .filter(|o| o.status.is_overdue())
            .filter_map(|o| Some((o.machine?, o.group_id?)))
            .collect();

        let mut to_mark: Vec<usize> = Vec::new();
        for (machine, group_id) in overdue {
            let mut gid = group_id;
            while gid > 0 {
                gid -= 1;
                let Some(members) = groups.get(&(machine, gid)) else {
                    continue;
                };
                let candidates: Vec<usize> = members
                    .iter()
                    .copied()
                    .filter(|&i| orders[i].due_date.is_none() && !orders[i].relocated)
                    .collect();
                if !candidates.is_empty() {
                    to_mark.extend(candidates);
                    break;
                }
            }
        }

        let mut newly_marked = 0;
        for idx in to_mark {
            if !orders[idx].relocated {
                orders[idx].relocated = true;
                newly_marked += 1;
                debug!(
                    order_id = %orders[idx].order_id,
                    "无交期订单标记移位,为逾期订单让道"
                );
            }
        }
        newly_marked
    }

    /// 应用移位: 已标记订单移到所属设备队尾
    ///
    /// 未移位订单相对顺序不变;移位订单彼此按(材质,厚度)升序后追加
    pub fn apply_relocation(&self, orders: Vec<Order>) -> Vec<Order> {
        let mut kept: HashMap<Machine, Vec<Order>> = HashMap::new();
        let mut moved: HashMap<Machine, Vec<Order>> = HashMap::new();

        for order in orders {
            let Some(machine) = order.machine else {
                continue;
            };
            if order.relocated {
                moved.entry(machine).or_default().push(order);
            } else {
                kept.entry(machine).or_default().push(order);
            }
        }

        let mut result = Vec::new();
        for machine in Machine::ALL {
            if let Some(block) = kept.remove(&machine) {
                result.extend(block);
            }
            if let Some(mut block) = moved.remove(&machine) {
                block.sort_by(|a, b| {
                    a.material_key.cmp(&b.material_key).then_with(|| {
                        a.thickness_key()
                            .unwrap_or(i64::MAX)
                            .cmp(&b.thickness_key().unwrap_or(i64::MAX))
                    })
                });
                let moved_count = block.len();
                info!(machine = %machine, moved = moved_count, "移位订单已接到设备队尾");
                result.extend(block);
            }
        }
        result
    }

    /// 展示排序: 设备内每个连续组段中逾期订单前置,其余保持稳定
    ///
    /// 按连续组段而非全局组编号排序,避免把已移位订单折回原位
    pub fn sort_overdue_first_within_groups(&self, orders: Vec<Order>) -> Vec<Order> {
        let run_key = |o: &Order| (o.machine, o.group_id);

        let mut permutation: Vec<usize> = Vec::with_capacity(orders.len());
        let mut start = 0;
        while start < orders.len() {
            let mut end = start + 1;
            while end < orders.len() && run_key(&orders[end]) == run_key(&orders[start]) {
                end += 1;
            }
            for i in start..end {
                if orders[i].status.is_overdue() {
                    permutation.push(i);
                }
            }
            for i in start..end {
                if !orders[i].status.is_overdue() {
                    permutation.push(i);
                }
            }
            start = end;
        }

        let mut slots: Vec<Option<Order>> = orders.into_iter().map(Some).collect();
        permutation
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect()
    }
}

impl Default for LatenessResolver {
    fn default() -> Self {
        Self::new()
    }
}
