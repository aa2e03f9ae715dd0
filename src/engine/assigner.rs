// ==========================================
// 制管车间排产系统 - 设备分配引擎
// ==========================================
// 职责: 按厚度/材质规则将订单分配到三台设备
// 红线: 异型管机1受限厚度与非不锈钢,硬约束订单只进异型管机2
// 输入: 已剔除差异化/已完成的订单列表
// 输出: 已分配订单 + 无法分配订单（带原因）
// ==========================================

use crate::domain::types::{Machine, ProcessType};
use crate::domain::Order;
use crate::engine::material;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 异型管机1可生产厚度集合（微米）
pub const PROFILE1_THICKNESS_UM: [i64; 5] = [500, 600, 750, 800, 1000];

/// 判断订单是否超出异型管机1能力（厚度受限或不锈钢）
pub fn profile1_incompatible(thickness_um: i64, material_key: &str) -> bool {
    !PROFILE1_THICKNESS_UM.contains(&thickness_um) || material::is_stainless(material_key)
}

// ==========================================
// AssignmentOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub scheduled: Vec<Order>,        // 已分配设备的订单
    pub dropped: Vec<(Order, String)>, // 分配失败订单（原因）
}

// ==========================================
// DeviceAssigner - 设备分配引擎
// ==========================================
pub struct DeviceAssigner {
    // 无状态引擎,不需要注入依赖
}

impl DeviceAssigner {
    pub fn new() -> Self {
        Self {}
    }

    /// 分配设备
    ///
    /// 规则（异型订单按厚度降序逐单决策,厚料先定以保护负荷均衡）:
    /// 1) 厚度不在异型管机1可生产集合,或材质含不锈钢 → 异型管机2（硬约束）
    /// 2) 相同(厚度,材质)已分配过 → 沿用原设备,保持同组不拆
    /// 3) 厚度 ≥ 1.0mm 或异型管机2负荷 ≤ 异型管机1负荷 → 异型管机2,否则异型管机1
    ///
    /// 负荷单位: 未完成数量 ÷ 对应设备产能（小时）,三条规则命中后均累加。
    /// 直管订单直接归直管机;厚度缺失的异型订单无法参与规则比较,
    /// 从排产集剔除并记录原因。
    pub fn assign(&self, mut orders: Vec<Order>) -> AssignmentOutcome {
        let mut profile1_load_h = 0.0_f64;
        let mut profile2_load_h = 0.0_f64;
        let mut assigned_keys: HashMap<(i64, String), Machine> = HashMap::new();
        let mut drop_reasons: HashMap<usize, String> = HashMap::new();

        // 直管订单: 工艺即设备
        for order in orders.iter_mut() {
            if order.process_type == ProcessType::Straight {
                order.machine = Some(Machine::Straight);
            }
        }

        // 异型订单索引,按厚度降序决策（排序稳定,同厚度保持输入顺序）
        let mut profile_idx: Vec<usize> = orders
            .iter()
            .enumerate()
            .filter(|(_, o)| o.process_type == ProcessType::Profile)
            .map(|(i, _)| i)
            .collect();

        profile_idx.retain(|&i| {
            if orders[i].thickness_mm.is_none() {
                warn!(
                    order_id = %orders[i].order_id,
                    row = orders[i].row_number,
                    "材料厚度缺失,设备分配失败,订单移出排产集"
                );
                drop_reasons.insert(i, "材料厚度缺失,无法进行设备分配".to_string());
                false
            } else {
                true
            }
        });

        profile_idx.sort_by(|&a, &b| {
            let ta = orders[a].thickness_mm.unwrap_or_default();
            let tb = orders[b].thickness_mm.unwrap_or_default();
            tb.total_cmp(&ta)
        });

        for &i in &profile_idx {
            let thickness_um = match orders[i].thickness_key() {
                Some(t) => t,
                None => continue,
            };
            let quantity = orders[i].remaining_qty;
            let key = (thickness_um, orders[i].material_key.clone());
            let incompatible = profile1_incompatible(thickness_um, &orders[i].material_key);
            orders[i].profile1_incompatible = incompatible;

            let machine = if incompatible {
                // 规则1: 硬约束,只有异型管机2能生产
                Machine::Profile2
            } else if let Some(&reused) = assigned_keys.get(&key) {
                // 规则2: 同(厚度,材质)沿用,减少换料
                reused
            } else if thickness_um >= 1_000 || profile2_load_h <= profile1_load_h {
                // 规则3: 厚料优先异型管机2,其余按负荷均衡
                Machine::Profile2
            } else {
                Machine::Profile1
            };

            match machine {
                Machine::Profile1 => {
                    profile1_load_h += quantity / Machine::Profile1.throughput_per_hour();
                }
                _ => {
                    profile2_load_h += quantity / Machine::Profile2.throughput_per_hour();
                }
            }
            assigned_keys.insert(key, machine);
            orders[i].machine = Some(machine);
        }

        debug!(
            profile1_load_h = format!("{:.2}", profile1_load_h),
            profile2_load_h = format!("{:.2}", profile2_load_h),
            "异型设备负荷累计完成"
        );

        // 拆分为已分配 / 分配失败
        let mut scheduled = Vec::with_capacity(orders.len());
        let mut dropped = Vec::new();
        for (i, order) in orders.into_iter().enumerate() {
            if order.machine.is_some() {
                scheduled.push(order);
            } else {
                let reason = drop_reasons
                    .remove(&i)
                    .unwrap_or_else(|| "设备分配未命中任何规则".to_string());
                dropped.push((order, reason));
            }
        }

        AssignmentOutcome { scheduled, dropped }
    }
}

impl Default for DeviceAssigner {
    fn default() -> Self {
        Self::new()
    }
}
