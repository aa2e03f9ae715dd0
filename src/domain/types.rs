// ==========================================
// 制管车间排产系统 - 领域类型定义
// ==========================================
// 职责: 设备/工艺/交付状态等共享枚举
// 红线: 设备集合固定为三台,不做通用化
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 设备 (Machine)
// ==========================================
// 直管机只接直管订单; 异型管机1受厚度/材质限制;
// 异型管机2为兜底设备,厚料优先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Machine {
    Straight, // 直管机
    Profile1, // 异型管机1
    Profile2, // 异型管机2
}

impl Machine {
    /// 全部设备（固定顺序,输出表单按此排列）
    pub const ALL: [Machine; 3] = [Machine::Straight, Machine::Profile1, Machine::Profile2];

    /// 每小时产能（件/小时）
    pub fn throughput_per_hour(&self) -> f64 {
        match self {
            Machine::Straight => 90.0,
            Machine::Profile1 => 50.0,
            Machine::Profile2 => 80.0,
        }
    }

    /// 设备中文名（输出表单名）
    pub fn display_name(&self) -> &'static str {
        match self {
            Machine::Straight => "直管机",
            Machine::Profile1 => "异型管机1",
            Machine::Profile2 => "异型管机2",
        }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ==========================================
// 加工工艺 (Process Type)
// ==========================================
// "直管" → 直管机; "差异化" → 不排产; 其余按异型处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessType {
    Straight,       // 直管
    Profile,        // 异型
    Differentiated, // 差异化
}

impl ProcessType {
    /// 从原始工艺文本分类（先去除全部空白字符）
    pub fn classify(raw: &str) -> Self {
        let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.contains("差异化") {
            ProcessType::Differentiated
        } else if cleaned == "直管" {
            ProcessType::Straight
        } else {
            ProcessType::Profile
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessType::Straight => write!(f, "直管"),
            ProcessType::Profile => write!(f, "异型"),
            ProcessType::Differentiated => write!(f, "差异化"),
        }
    }
}

// ==========================================
// 交付状态 (Delivery Status)
// ==========================================
// 无交期订单恒为按时交付
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    OnTime,  // 按时交付
    Overdue, // 逾期交付
}

impl DeliveryStatus {
    pub fn is_overdue(&self) -> bool {
        matches!(self, DeliveryStatus::Overdue)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::OnTime => write!(f, "按时交付"),
            DeliveryStatus::Overdue => write!(f, "逾期交付"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_process_type() {
        assert_eq!(ProcessType::classify("直管"), ProcessType::Straight);
        assert_eq!(ProcessType::classify(" 直 管 "), ProcessType::Straight);
        assert_eq!(ProcessType::classify("差异化"), ProcessType::Differentiated);
        assert_eq!(ProcessType::classify("弯管"), ProcessType::Profile);
        assert_eq!(ProcessType::classify(""), ProcessType::Profile);
    }

    #[test]
    fn test_machine_throughput() {
        assert_eq!(Machine::Straight.throughput_per_hour(), 90.0);
        assert_eq!(Machine::Profile1.throughput_per_hour(), 50.0);
        assert_eq!(Machine::Profile2.throughput_per_hour(), 80.0);
    }

    #[test]
    fn test_machine_display() {
        assert_eq!(Machine::Profile2.to_string(), "异型管机2");
    }
}
