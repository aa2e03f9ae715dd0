// ==========================================
// 制管车间排产系统 - 结果输出层
// ==========================================
// 职责: 排产结果 → 结果表单（CSV,每个结果集一个文件）
// 输出: 三台设备表单 / 项目交付时间 / 其他（未排产透传）
// 红线: 内部簿记列（组编号/哨兵标记/机1不可生产/是否拆分）不输出
// ==========================================

use crate::domain::types::Machine;
use crate::domain::{Order, OrderTable};
use crate::engine::material;
use crate::engine::orchestrator::ScheduleResult;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// 输出层错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出目录创建失败: {0}")]
    CreateDir(String),

    #[error("结果文件写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("结果文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;

/// 设备表单列（原始列 + 计算列,簿记列已剔除）
const MACHINE_SHEET_HEADERS: [&str; 14] = [
    "订单编号",
    "加工工艺",
    "完成量",
    "材料厚度",
    "材料材质",
    "未完成数量",
    "生产件数",
    "下单日期",
    "预计交期",
    "生产时间",
    "是否换料",
    "生产开始时间",
    "生产结束时间",
    "按时交付检查",
];

// ==========================================
// ResultExporter - 结果输出器
// ==========================================
pub struct ResultExporter {
    output_dir: PathBuf,
}

impl ResultExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// 输出全部结果表单
    pub fn export(&self, result: &ScheduleResult, table: &OrderTable) -> ExportResult<()> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ExportError::CreateDir(e.to_string()))?;

        for machine in Machine::ALL {
            self.write_machine_sheet(machine, result)?;
        }
        self.write_delivery_sheet(result)?;
        self.write_excluded_sheet(table, result)?;

        info!(dir = %self.output_dir.display(), "结果表单输出完成");
        Ok(())
    }

    /// 单台设备表单
    fn write_machine_sheet(&self, machine: Machine, result: &ScheduleResult) -> ExportResult<()> {
        let path = self.output_dir.join(format!("{}.csv", machine.display_name()));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(MACHINE_SHEET_HEADERS)?;

        for order in result.machine_queue(machine) {
            writer.write_record(machine_sheet_row(order))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 项目交付时间表单（已按交付时间升序）
    fn write_delivery_sheet(&self, result: &ScheduleResult) -> ExportResult<()> {
        let path = self.output_dir.join("项目交付时间.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["订单编号", "项目交付时间"])?;

        for entry in &result.deliveries {
            writer.write_record([
                entry.order_id.as_str(),
                &entry.delivery_time.format("%Y-%m-%d %H:%M").to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 其他表单: 差异化/已完成订单原列原序透传
    fn write_excluded_sheet(&self, table: &OrderTable, result: &ScheduleResult) -> ExportResult<()> {
        let path = self.output_dir.join("其他.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.headers)?;

        for record in &result.excluded {
            writer.write_record(&record.cells)?;
        }
        writer.flush()?;
        Ok(())
    }
}

// ==========================================
// 行格式化
// ==========================================

fn machine_sheet_row(order: &Order) -> Vec<String> {
    vec![
        order.order_id.clone(),
        order.process_type.to_string(),
        order.completion_raw.clone().unwrap_or_default(),
        order.thickness_mm.map(format_number).unwrap_or_default(),
        material::restore_material(&order.material_raw, &order.material_key),
        format_number(order.remaining_qty),
        format_number(order.produced_qty),
        order
            .order_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        order
            .due_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        format_duration(order.duration_min),
        if order.changeover { "是" } else { "否" }.to_string(),
        order
            .start_time
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        order
            .end_time
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        order.status.to_string(),
    ]
}

/// 生产时间文本: "X小时 Y分钟"
fn format_duration(minutes: i64) -> String {
    format!("{}小时 {}分钟", minutes / 60, minutes % 60)
}

/// 数值文本: 整数不带小数点
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(300), "5小时 0分钟");
        assert_eq!(format_duration(67), "1小时 7分钟");
        assert_eq!(format_duration(0), "0小时 0分钟");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.75), "0.75");
        assert_eq!(format_number(400.0), "400");
    }
}
