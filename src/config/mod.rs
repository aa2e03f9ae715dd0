// ==========================================
// 制管车间排产系统 - 配置层
// ==========================================
// 职责: 排产运行参数,默认值 + JSON 文件覆写
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

// ==========================================
// ScheduleConfig - 排产运行配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 排产起点: 每轮推算时各设备游标的初始时刻
    pub horizon_start: NaiveDateTime,

    /// 交期文本 "M.D HH:MM" 的隐含年份
    pub due_date_year: i32,

    /// 换料惩罚（分钟）
    pub changeover_penalty_min: i64,

    /// 分段间缓冲（分钟）
    pub segment_gap_min: i64,

    /// 逾期重排轮数上限
    ///
    /// 循环在"一轮未产生新移位"时提前收敛;取 1 即单轮重排
    pub max_repair_passes: u32,
}

/// 默认排产起点: 2025-03-21 08:00
fn default_horizon_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 21)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon_start: default_horizon_start(),
            due_date_year: 2025,
            changeover_penalty_min: 15,
            segment_gap_min: 1,
            max_repair_passes: 8,
        }
    }
}

impl ScheduleConfig {
    /// 从 JSON 文件加载配置,缺省字段用默认值补齐
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
