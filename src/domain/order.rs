// ==========================================
// 制管车间排产系统 - 订单领域模型
// ==========================================
// 职责: 导入中间结构与排产订单实体
// 红线: 交期缺失用 Option 表达,不引入哨兵日期
// ==========================================

use crate::domain::types::{DeliveryStatus, Machine, ProcessType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// RawOrderRecord - 导入中间结构体
// ==========================================
// 用途: 导入管道中间产物（文件解析 → 字段映射 → 此结构）
// cells 保留原始单元格文本,供"其他"表单原样透传
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrderRecord {
    // 源字段（已类型转换）
    pub order_id: Option<String>,        // 订单编号
    pub process_type_raw: Option<String>, // 加工工艺（原文）
    pub completion_raw: Option<String>,  // 完成量（原文,含"已完成"判定）
    pub thickness_mm: Option<f64>,       // 材料厚度（mm）
    pub material_raw: Option<String>,    // 材料材质（原文,可能带"来料"前缀）
    pub remaining_qty: Option<f64>,      // 未完成数量
    pub produced_qty: Option<f64>,       // 生产件数
    pub due_date: Option<NaiveDateTime>, // 预计交期（解析失败 → None）
    pub due_date_raw: Option<String>,    // 预计交期原文
    pub order_date: Option<NaiveDate>,   // 下单日期

    // 元信息
    pub row_number: usize,   // 原始文件行号（表头后从 1 起）
    pub cells: Vec<String>,  // 原始单元格文本（与表头对齐）
}

// ==========================================
// OrderTable - 导入批次
// ==========================================
// 用途: 一次导入的全部订单行 + 原始表头
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTable {
    pub headers: Vec<String>,      // 原始表头（列顺序保持不变）
    pub rows: Vec<RawOrderRecord>, // 订单行
}

// ==========================================
// Order - 排产订单实体
// ==========================================
// 生命周期: 由输入批次创建一次,经分配/分组/排序/推算/
// 逾期重排各阶段就地更新,除进入"其他"集合外不删除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    // ===== 源数据 =====
    pub order_id: String,                // 订单编号（与项目交付时间多对一）
    pub process_type: ProcessType,       // 加工工艺
    pub thickness_mm: Option<f64>,       // 材料厚度（mm）
    pub material_key: String,            // 材质分组键（"来料"前缀已剥离）
    pub material_raw: String,            // 原始材质文本（输出时据此还原前缀）
    pub completion_raw: Option<String>,  // 完成量（原文透传）
    pub remaining_qty: f64,              // 未完成数量（缺失按 0）
    pub produced_qty: f64,               // 生产件数（透传）
    pub due_date: Option<NaiveDateTime>, // 预计交期（None = 无交期）
    pub order_date: Option<NaiveDate>,   // 下单日期
    pub row_number: usize,               // 原始文件行号

    // ===== 排产计算状态 =====
    pub machine: Option<Machine>,          // 分配设备
    pub group_id: Option<usize>,           // 换料组编号（设备内局部,不跨设备比较）
    pub group_due: Option<NaiveDateTime>,  // 组最早交期
    pub changeover: bool,                  // 是否换料
    pub duration_min: i64,                 // 生产时间（分钟）
    pub start_time: Option<NaiveDateTime>, // 生产开始时间
    pub end_time: Option<NaiveDateTime>,   // 生产结束时间
    pub status: DeliveryStatus,            // 按时交付 / 逾期交付
    pub relocated: bool,                   // 是否已被移位（逾期重排）
    pub profile1_incompatible: bool,       // 异型管机1不可生产
}

impl Order {
    /// 厚度分组键（微米,避免浮点做 Hash/Eq 键）
    pub fn thickness_key(&self) -> Option<i64> {
        self.thickness_mm.map(|t| (t * 1000.0).round() as i64)
    }

    /// 是否有真实交期
    pub fn has_due_date(&self) -> bool {
        self.due_date.is_some()
    }

    /// 换料组键: (厚度, 材质)
    pub fn group_key(&self) -> (Option<i64>, &str) {
        (self.thickness_key(), self.material_key.as_str())
    }

    /// 换料判定签名: 相邻订单任一分量不同即需换料
    pub fn changeover_signature(&self) -> (Option<Machine>, Option<i64>, &str) {
        (self.machine, self.thickness_key(), self.material_key.as_str())
    }
}

// ==========================================
// DeliveryEntry - 项目交付时间条目
// ==========================================
// 同一订单编号的交付时间 = 各行生产结束时间的最大值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEntry {
    pub order_id: String,               // 订单编号
    pub delivery_time: NaiveDateTime,   // 项目交付时间
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_order() -> Order {
        Order {
            order_id: "O1".to_string(),
            process_type: ProcessType::Profile,
            thickness_mm: Some(0.75),
            material_key: "304不锈钢".to_string(),
            material_raw: "来料304不锈钢".to_string(),
            completion_raw: None,
            remaining_qty: 100.0,
            produced_qty: 0.0,
            due_date: None,
            order_date: None,
            row_number: 1,
            machine: None,
            group_id: None,
            group_due: None,
            changeover: false,
            duration_min: 0,
            start_time: None,
            end_time: None,
            status: DeliveryStatus::OnTime,
            relocated: false,
            profile1_incompatible: false,
        }
    }

    #[test]
    fn test_thickness_key_in_micrometres() {
        let order = blank_order();
        assert_eq!(order.thickness_key(), Some(750));
    }

    #[test]
    fn test_thickness_key_absent() {
        let mut order = blank_order();
        order.thickness_mm = None;
        assert_eq!(order.thickness_key(), None);
    }

    #[test]
    fn test_group_key_pairs_thickness_and_material() {
        let order = blank_order();
        assert_eq!(order.group_key(), (Some(750), "304不锈钢"));
    }
}
