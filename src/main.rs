// ==========================================
// 制管车间排产系统 - 命令行入口
// ==========================================
// 用法: pipe-mill-aps <订单表.xlsx|csv> <输出目录> [配置.json]
// ==========================================

use anyhow::{bail, Context, Result};
use pipe_mill_aps::config::ScheduleConfig;
use pipe_mill_aps::domain::types::Machine;
use pipe_mill_aps::engine::ScheduleOrchestrator;
use pipe_mill_aps::exporter::ResultExporter;
use pipe_mill_aps::{importer, logging};

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", pipe_mill_aps::APP_NAME, pipe_mill_aps::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        bail!("用法: pipe-mill-aps <订单表.xlsx|csv> <输出目录> [配置.json]");
    }
    let input_path = &args[0];
    let output_dir = &args[1];

    // 配置: 默认值,或由 JSON 文件覆写
    let config = match args.get(2) {
        Some(path) => ScheduleConfig::load_from_file(path)
            .with_context(|| format!("加载配置失败: {}", path))?,
        None => ScheduleConfig::default(),
    };
    tracing::info!(
        horizon_start = %config.horizon_start,
        max_repair_passes = config.max_repair_passes,
        "运行配置就绪"
    );

    // 导入 → 排产 → 输出
    let table = importer::import_order_table(input_path, config.due_date_year)
        .with_context(|| format!("导入订单表失败: {}", input_path))?;

    let orchestrator = ScheduleOrchestrator::new(config);
    let result = orchestrator.run(&table).context("排产流程执行失败")?;

    ResultExporter::new(output_dir)
        .export(&result, &table)
        .context("结果输出失败")?;

    // 完成摘要
    for machine in Machine::ALL {
        tracing::info!(
            machine = %machine,
            orders = result.machine_queue(machine).len(),
            "设备队列"
        );
    }
    tracing::info!(
        excluded = result.excluded.len(),
        dropped = result.dropped.len(),
        overdue = result.overdue_count(),
        repair_passes = result.repair_passes,
        "排产完成,结果已保存至 {}",
        output_dir
    );

    Ok(())
}
