// ==========================================
// 制管车间排产系统 - 引擎编排器
// ==========================================
// 职责: 协调分配/分组/排序/估算/推算/逾期重排的执行顺序
// 流程: 拆分批次 → 分配设备 → 换料分组 → 队列排序 →
//       时长估算 → 排程推算 → 逾期重排循环 → 交付汇总
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::types::{DeliveryStatus, Machine, ProcessType};
use crate::domain::{DeliveryEntry, Order, OrderTable, RawOrderRecord};
use crate::engine::assigner::DeviceAssigner;
use crate::engine::error::EngineResult;
use crate::engine::estimator::ProductionTimeEstimator;
use crate::engine::grouper::OrderGrouper;
use crate::engine::material;
use crate::engine::projector::ScheduleProjector;
use crate::engine::resolver::LatenessResolver;
use crate::engine::sequencer::QueueSequencer;
use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// 完成量字段的已完成标记
const COMPLETED_MARKER: &str = "已完成";

// ==========================================
// ScheduleResult - 排产结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    /// 最终合并队列（设备分块,组内逾期前置的展示顺序）
    pub queue: Vec<Order>,

    /// 项目交付时间: 订单编号 → 各行结束时间最大值,按交付时间升序
    pub deliveries: Vec<DeliveryEntry>,

    /// 未排产订单（差异化/已完成）,原列原序透传
    pub excluded: Vec<RawOrderRecord>,

    /// 设备分配失败订单（原因）
    pub dropped: Vec<(Order, String)>,

    /// 实际执行的逾期重排轮数
    pub repair_passes: u32,

    /// 推算结束后各设备游标
    pub cursors: HashMap<Machine, NaiveDateTime>,
}

impl ScheduleResult {
    /// 某台设备的最终队列
    pub fn machine_queue(&self, machine: Machine) -> Vec<&Order> {
        self.queue
            .iter()
            .filter(|o| o.machine == Some(machine))
            .collect()
    }

    /// 逾期订单数
    pub fn overdue_count(&self) -> usize {
        self.queue.iter().filter(|o| o.status.is_overdue()).count()
    }
}

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
pub struct ScheduleOrchestrator {
    config: ScheduleConfig,
    assigner: DeviceAssigner,
    grouper: OrderGrouper,
    sequencer: QueueSequencer,
    estimator: ProductionTimeEstimator,
    projector: ScheduleProjector,
    resolver: LatenessResolver,
}

impl ScheduleOrchestrator {
    pub fn new(config: ScheduleConfig) -> Self {
        let projector =
            ScheduleProjector::with_penalties(config.changeover_penalty_min, config.segment_gap_min);
        Self {
            config,
            assigner: DeviceAssigner::new(),
            grouper: OrderGrouper::new(),
            sequencer: QueueSequencer::new(),
            estimator: ProductionTimeEstimator::new(),
            projector,
            resolver: LatenessResolver::new(),
        }
    }

    /// 执行完整排产流程
    pub fn run(&self, table: &OrderTable) -> EngineResult<ScheduleResult> {
        info!(rows = table.rows.len(), "开始执行排产流程");

        // ==========================================
        // 步骤1: 拆分批次（差异化/已完成 → 其他表单）
        // ==========================================
        let (candidates, excluded) = split_batch(&table.rows);
        info!(
            scheduled_candidates = candidates.len(),
            excluded = excluded.len(),
            "批次拆分完成"
        );

        // ==========================================
        // 步骤2: 设备分配
        // ==========================================
        let outcome = self.assigner.assign(candidates);
        let mut queue = outcome.scheduled;
        let dropped = outcome.dropped;
        for (order, reason) in &dropped {
            warn!(order_id = %order.order_id, reason = %reason, "订单移出排产集");
        }

        // ==========================================
        // 步骤3: 换料分组 + 队列排序
        // ==========================================
        self.grouper.compute_group_due(&mut queue);
        let queue_sorted = self.sequencer.sequence(queue);
        let mut queue = block_by_machine(queue_sorted);
        self.grouper.assign_group_ids(&mut queue);
        self.sequencer.recompute_changeover(&mut queue);

        // ==========================================
        // 步骤4: 时长估算 + 首轮排程推算
        // ==========================================
        self.estimator.estimate_all(&mut queue);
        let mut cursors = self.projector.project(&mut queue, self.config.horizon_start)?;
        self.resolver.evaluate_status(&mut queue);
        debug!(
            overdue = queue.iter().filter(|o| o.status.is_overdue()).count(),
            "首轮推算完成"
        );

        // ==========================================
        // 步骤5: 逾期重排循环（检测→移位→重推算,至不动点或轮数上限）
        // ==========================================
        let mut repair_passes = 0_u32;
        for pass in 1..=self.config.max_repair_passes {
            let newly_marked = self.resolver.mark_relocatable(&mut queue);
            if newly_marked == 0 {
                break;
            }
            repair_passes = pass;
            info!(pass, newly_marked, "逾期重排: 移位并重新推算");

            queue = self.resolver.apply_relocation(queue);
            self.grouper.assign_group_ids(&mut queue);
            self.sequencer.recompute_changeover(&mut queue);
            cursors = self.projector.project(&mut queue, self.config.horizon_start)?;
            self.resolver.evaluate_status(&mut queue);
        }

        // ==========================================
        // 步骤6: 交付汇总 + 展示排序
        // ==========================================
        let deliveries = aggregate_deliveries(&queue);
        let queue = self.resolver.sort_overdue_first_within_groups(queue);

        let overdue = queue.iter().filter(|o| o.status.is_overdue()).count();
        info!(
            scheduled = queue.len(),
            overdue,
            repair_passes,
            "排产流程执行完成"
        );

        Ok(ScheduleResult {
            queue,
            deliveries,
            excluded,
            dropped,
            repair_passes,
            cursors,
        })
    }
}

// ==========================================
// 批次拆分与订单构建
// ==========================================

/// 判断记录是否进入"其他"集合（不参与排产）
fn is_excluded(record: &RawOrderRecord) -> bool {
    let differentiated = record
        .process_type_raw
        .as_deref()
        .map(|s| ProcessType::classify(s) == ProcessType::Differentiated)
        .unwrap_or(false);
    let completed = record
        .completion_raw
        .as_deref()
        .map(|s| s.contains(COMPLETED_MARKER))
        .unwrap_or(false);
    differentiated || completed
}

fn split_batch(records: &[RawOrderRecord]) -> (Vec<Order>, Vec<RawOrderRecord>) {
    let mut candidates = Vec::new();
    let mut excluded = Vec::new();

    for record in records {
        if is_excluded(record) {
            excluded.push(record.clone());
        } else {
            candidates.push(build_order(record));
        }
    }
    (candidates, excluded)
}

fn build_order(record: &RawOrderRecord) -> Order {
    let material_raw = record.material_raw.clone().unwrap_or_default();
    let material_key = material::normalize_material(&material_raw);
    let process_type = record
        .process_type_raw
        .as_deref()
        .map(ProcessType::classify)
        .unwrap_or(ProcessType::Profile);

    Order {
        order_id: record.order_id.clone().unwrap_or_default(),
        process_type,
        thickness_mm: record.thickness_mm,
        material_key,
        material_raw,
        completion_raw: record.completion_raw.clone(),
        remaining_qty: record.remaining_qty.unwrap_or(0.0),
        produced_qty: record.produced_qty.unwrap_or(0.0),
        due_date: record.due_date,
        order_date: record.order_date,
        row_number: record.row_number,
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

/// 合并队列按设备分块（块内保持排序结果的相对顺序）
///
/// 下游的换料/推算/输出均以设备为单位,分块让移位"接到设备队尾"
/// 有唯一语义
fn block_by_machine(orders: Vec<Order>) -> Vec<Order> {
    let mut blocks: HashMap<Machine, Vec<Order>> = HashMap::new();
    for order in orders {
        if let Some(machine) = order.machine {
            blocks.entry(machine).or_default().push(order);
        }
    }

    let mut result = Vec::new();
    for machine in Machine::ALL {
        if let Some(block) = blocks.remove(&machine) {
            result.extend(block);
        }
    }
    result
}

/// 项目交付时间: 订单编号首次出现序收集,按交付时间稳定升序
fn aggregate_deliveries(orders: &[Order]) -> Vec<DeliveryEntry> {
    let mut max_end: HashMap<&str, NaiveDateTime> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for order in orders {
        let Some(end) = order.end_time else { continue };
        if seen.insert(order.order_id.as_str()) {
            first_seen.push(order.order_id.as_str());
        }
        max_end
            .entry(order.order_id.as_str())
            .and_modify(|cur| {
                if end > *cur {
                    *cur = end;
                }
            })
            .or_insert(end);
    }

    let mut entries: Vec<DeliveryEntry> = first_seen
        .into_iter()
        .filter_map(|id| {
            max_end.get(id).map(|&delivery_time| DeliveryEntry {
                order_id: id.to_string(),
                delivery_time,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.delivery_time);
    entries
}
