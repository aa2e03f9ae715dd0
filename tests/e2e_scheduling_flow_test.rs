// ==========================================
// 制管车间排产系统 - 文件端到端测试
// ==========================================
// 覆盖: CSV 订单表 → 导入 → 排产 → 结果表单输出
// ==========================================

use pipe_mill_aps::config::ScheduleConfig;
use pipe_mill_aps::engine::ScheduleOrchestrator;
use pipe_mill_aps::exporter::ResultExporter;
use pipe_mill_aps::importer;
use std::io::Write;

const INPUT_CSV: &str = "\
订单编号,加工工艺,完成量,材料厚度,材料材质,未完成数量,生产件数,预计交期,下单日期
D001,直管,,0.5,Q235,90,120,3.22 9:00,2025-03-20
D002,弯管,,1.2,来料304不锈钢,400,0,,2025-03-20
D003,弯管,,0.75,Q235,120,0,3.21 17：00,2025-03-19
D004,差异化,,0.5,Q235,10,0,,2025-03-18
D005,弯管,已完成,0.6,SPCC,0,200,,2025-03-18
";

fn write_input() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{}", INPUT_CSV).unwrap();
    file
}

#[test]
fn test_csv_roundtrip_produces_all_result_sheets() {
    let input = write_input();
    let output_dir = tempfile::tempdir().unwrap();

    let config = ScheduleConfig::default();
    let table = importer::import_order_table(input.path(), config.due_date_year).unwrap();
    assert_eq!(table.rows.len(), 5);

    let result = ScheduleOrchestrator::new(config).run(&table).unwrap();
    ResultExporter::new(output_dir.path())
        .export(&result, &table)
        .unwrap();

    for name in ["直管机.csv", "异型管机1.csv", "异型管机2.csv", "项目交付时间.csv", "其他.csv"] {
        assert!(output_dir.path().join(name).exists(), "缺少结果文件 {}", name);
    }
}

#[test]
fn test_machine_sheet_contents() {
    let input = write_input();
    let output_dir = tempfile::tempdir().unwrap();

    let config = ScheduleConfig::default();
    let table = importer::import_order_table(input.path(), config.due_date_year).unwrap();
    let result = ScheduleOrchestrator::new(config).run(&table).unwrap();
    ResultExporter::new(output_dir.path())
        .export(&result, &table)
        .unwrap();

    let straight = std::fs::read_to_string(output_dir.path().join("直管机.csv")).unwrap();
    // 直管订单: 90 件 = 1 小时,首单换料
    assert!(straight.contains("D001"));
    assert!(straight.contains("1小时 0分钟"));
    assert!(straight.contains("是"));
    assert!(straight.contains("按时交付"));

    let profile2 = std::fs::read_to_string(output_dir.path().join("异型管机2.csv")).unwrap();
    // 来料前缀在输出时还原
    assert!(profile2.contains("来料304不锈钢"));
    // 内部簿记列不输出
    let header_line = profile2.lines().next().unwrap();
    assert!(!header_line.contains("组"));
    assert!(!header_line.contains("是否拆分"));
    assert!(!header_line.contains("不可生产"));
}

#[test]
fn test_excluded_sheet_passthrough_verbatim() {
    let input = write_input();
    let output_dir = tempfile::tempdir().unwrap();

    let config = ScheduleConfig::default();
    let table = importer::import_order_table(input.path(), config.due_date_year).unwrap();
    let result = ScheduleOrchestrator::new(config).run(&table).unwrap();
    ResultExporter::new(output_dir.path())
        .export(&result, &table)
        .unwrap();

    let excluded = std::fs::read_to_string(output_dir.path().join("其他.csv")).unwrap();
    let lines: Vec<&str> = excluded.lines().collect();
    // 表头 + 差异化 + 已完成,原始顺序
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("订单编号"));
    assert!(lines[1].starts_with("D004"));
    assert!(lines[2].starts_with("D005"));
}

#[test]
fn test_full_width_colon_due_date_parsed() {
    let input = write_input();
    let config = ScheduleConfig::default();
    let table = importer::import_order_table(input.path(), config.due_date_year).unwrap();

    // D003 使用全角冒号交期
    let d003 = table
        .rows
        .iter()
        .find(|r| r.order_id.as_deref() == Some("D003"))
        .unwrap();
    assert!(d003.due_date.is_some());
}
