// ==========================================
// 制管车间排产系统 - 导入层
// ==========================================
// 职责: 订单表文件 → 内存订单批次
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{ParsedTable, UniversalFileParser};

use crate::domain::OrderTable;
use std::path::Path;
use tracing::info;

/// 读取并映射订单表
pub fn import_order_table<P: AsRef<Path>>(path: P, due_date_year: i32) -> ImportResult<OrderTable> {
    let parsed = UniversalFileParser.parse(path.as_ref())?;
    let table = FieldMapper::new(due_date_year).map_table(parsed)?;
    info!(
        path = %path.as_ref().display(),
        rows = table.rows.len(),
        "订单表导入完成"
    );
    Ok(table)
}
