// ==========================================
// 制管车间排产系统 - 换料分组引擎
// ==========================================
// 职责: 设备内按(厚度,材质)划分换料组,计算组最早交期
// 红线: 分组不跨设备,组编号只在设备内可比较
// ==========================================

use crate::domain::types::Machine;
use crate::domain::Order;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// 设备内分组键: (厚度微米, 材质键)
type GroupKey = (Option<i64>, String);

// ==========================================
// OrderGrouper - 换料分组引擎
// ==========================================
pub struct OrderGrouper {
    // 无状态引擎,不需要注入依赖
}

impl OrderGrouper {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算组最早交期并写回每个成员
    ///
    /// 组最早交期 = 组内有真实交期成员的最小交期;
    /// 全组无交期时保持 None（排序时视为最晚）
    pub fn compute_group_due(&self, orders: &mut [Order]) {
        let mut earliest: HashMap<(Machine, GroupKey), NaiveDateTime> = HashMap::new();

        for order in orders.iter() {
            let (Some(machine), Some(due)) = (order.machine, order.due_date) else {
                continue;
            };
            let key = (machine, owned_key(order));
            earliest
                .entry(key)
                .and_modify(|cur| {
                    if due < *cur {
                        *cur = due;
                    }
                })
                .or_insert(due);
        }

        for order in orders.iter_mut() {
            order.group_due = order
                .machine
                .and_then(|machine| earliest.get(&(machine, owned_key(order))).copied());
        }
    }

    /// 按当前队列顺序分配组编号（设备内首次出现计数,从 0 起）
    ///
    /// 队列每次重排后必须重新调用,保证编号沿队列单调出现
    pub fn assign_group_ids(&self, orders: &mut [Order]) {
        let mut numbering: HashMap<Machine, HashMap<GroupKey, usize>> = HashMap::new();

        for order in orders.iter_mut() {
            let Some(machine) = order.machine else {
                continue;
            };
            let per_machine = numbering.entry(machine).or_default();
            let next_id = per_machine.len();
            let id = *per_machine.entry(owned_key(order)).or_insert(next_id);
            order.group_id = Some(id);
        }
    }
}

impl Default for OrderGrouper {
    fn default() -> Self {
        Self::new()
    }
}

fn owned_key(order: &Order) -> GroupKey {
    (order.thickness_key(), order.material_key.clone())
}
