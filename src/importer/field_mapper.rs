// ==========================================
// 制管车间排产系统 - 字段映射
// ==========================================
// 职责: 解析产物 → RawOrderRecord（类型转换 + 交期文本解析）
// 策略: 单行字段失败只降级为空值并告警,不中断批次
// ==========================================

use crate::domain::{OrderTable, RawOrderRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::ParsedTable;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

// ===== 订单表列名 =====
pub const COL_ORDER_ID: &str = "订单编号";
pub const COL_PROCESS_TYPE: &str = "加工工艺";
pub const COL_COMPLETION: &str = "完成量";
pub const COL_THICKNESS: &str = "材料厚度";
pub const COL_MATERIAL: &str = "材料材质";
pub const COL_REMAINING_QTY: &str = "未完成数量";
pub const COL_PRODUCED_QTY: &str = "生产件数";
pub const COL_DUE_DATE: &str = "预计交期";
pub const COL_ORDER_DATE: &str = "下单日期";

const REQUIRED_COLUMNS: [&str; 9] = [
    COL_ORDER_ID,
    COL_PROCESS_TYPE,
    COL_COMPLETION,
    COL_THICKNESS,
    COL_MATERIAL,
    COL_REMAINING_QTY,
    COL_PRODUCED_QTY,
    COL_DUE_DATE,
    COL_ORDER_DATE,
];

// ==========================================
// FieldMapper - 字段映射器
// ==========================================
pub struct FieldMapper {
    due_date_year: i32,
}

impl FieldMapper {
    pub fn new(due_date_year: i32) -> Self {
        Self { due_date_year }
    }

    /// 映射整张订单表
    ///
    /// 必需列缺失为致命错误;单元格级失败降级为空值
    pub fn map_table(&self, parsed: ParsedTable) -> ImportResult<OrderTable> {
        let column_index = |name: &str| -> ImportResult<usize> {
            parsed
                .headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
        };

        for column in REQUIRED_COLUMNS {
            column_index(column)?;
        }

        let idx_order_id = column_index(COL_ORDER_ID)?;
        let idx_process = column_index(COL_PROCESS_TYPE)?;
        let idx_completion = column_index(COL_COMPLETION)?;
        let idx_thickness = column_index(COL_THICKNESS)?;
        let idx_material = column_index(COL_MATERIAL)?;
        let idx_remaining = column_index(COL_REMAINING_QTY)?;
        let idx_produced = column_index(COL_PRODUCED_QTY)?;
        let idx_due = column_index(COL_DUE_DATE)?;
        let idx_order_date = column_index(COL_ORDER_DATE)?;

        let mut rows = Vec::with_capacity(parsed.rows.len());
        for (offset, cells) in parsed.rows.into_iter().enumerate() {
            let row_number = offset + 1; // 表头后从 1 起
            let cell = |idx: usize| cells.get(idx).map(|s| s.as_str()).unwrap_or("");
            let non_empty = |idx: usize| {
                let value = cell(idx).trim();
                (!value.is_empty()).then(|| value.to_string())
            };

            let due_date_raw = non_empty(idx_due);
            let due_date = due_date_raw
                .as_deref()
                .and_then(|raw| parse_due_date(raw, self.due_date_year, row_number));

            rows.push(RawOrderRecord {
                order_id: non_empty(idx_order_id),
                process_type_raw: non_empty(idx_process),
                completion_raw: non_empty(idx_completion),
                thickness_mm: parse_number(cell(idx_thickness), COL_THICKNESS, row_number),
                material_raw: non_empty(idx_material),
                remaining_qty: parse_number(cell(idx_remaining), COL_REMAINING_QTY, row_number),
                produced_qty: parse_number(cell(idx_produced), COL_PRODUCED_QTY, row_number),
                due_date,
                due_date_raw,
                order_date: parse_order_date(cell(idx_order_date)),
                row_number,
                cells,
            });
        }

        Ok(OrderTable {
            headers: parsed.headers,
            rows,
        })
    }
}

// ==========================================
// 单元格解析
// ==========================================

/// 数值解析: 空白/非数值 → None（降级,不中断）
fn parse_number(raw: &str, column: &str, row_number: usize) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(row = row_number, column, value = %raw, "数值解析失败,按空值处理");
            None
        }
    }
}

/// 交期文本解析: "M.D HH:MM"（支持全角冒号,年份由配置隐含）
///
/// 非两段式或数值越界 → None（按无交期处理）并告警
pub fn parse_due_date(raw: &str, year: i32, row_number: usize) -> Option<NaiveDateTime> {
    let normalized = raw.trim().replace('：', ":");
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    if parts.len() != 2 {
        warn!(row = row_number, value = %raw, "交期格式错误,按无交期处理");
        return None;
    }

    let parsed = parse_month_day(parts[0], year).and_then(|date| {
        parse_hour_minute(parts[1]).and_then(|(hour, minute)| date.and_hms_opt(hour, minute, 0))
    });

    if parsed.is_none() {
        warn!(row = row_number, value = %raw, "交期解析失败,按无交期处理");
    }
    parsed
}

fn parse_month_day(raw: &str, year: i32) -> Option<NaiveDate> {
    let (month, day) = raw.split_once('.')?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_hour_minute(raw: &str) -> Option<(u32, u32)> {
    let (hour, minute) = raw.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

/// 下单日期: 常见日期格式逐一尝试,失败 → None
fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y-%m-%d %H:%M:%S", "%Y年%m月%d日"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
