use super::QueueSequencer;
use crate::domain::types::{DeliveryStatus, Machine, ProcessType};
use crate::domain::Order;
use crate::engine::grouper::OrderGrouper;
use chrono::{NaiveDate, NaiveDateTime};

// ==========================================
// 测试辅助函数
// ==========================================

fn dt(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn make_order(
    order_id: &str,
    machine: Machine,
    thickness_mm: f64,
    material: &str,
    due_date: Option<NaiveDateTime>,
    profile1_incompatible: bool,
) -> Order {
    Order {
        order_id: order_id.to_string(),
        process_type: ProcessType::Profile,
        thickness_mm: Some(thickness_mm),
        material_key: material.to_string(),
        material_raw: material.to_string(),
        completion_raw: None,
        remaining_qty: 10.0,
        produced_qty: 0.0,
        due_date,
        order_date: None,
        row_number: 0,
        machine: Some(machine),
        group_id: None,
        group_due: None,
        changeover: false,
        duration_min: 0,
        start_time: None,
        end_time: None,
        status: DeliveryStatus::OnTime,
        relocated: false,
        profile1_incompatible,
    }
}

fn ids(orders: &[Order]) -> Vec<&str> {
    orders.iter().map(|o| o.order_id.as_str()).collect()
}

// ==========================================
// 排序键测试
// ==========================================

#[test]
fn test_scenario_01_dated_group_sorts_before_undated_group() {
    let grouper = OrderGrouper::new();
    let sequencer = QueueSequencer::new();

    let mut orders = vec![
        make_order("undated", Machine::Profile1, 0.5, "SPCC", None, false),
        make_order("dated", Machine::Profile1, 0.75, "Q235", Some(dt(25, 10)), false),
    ];
    grouper.compute_group_due(&mut orders);

    let sorted = sequencer.sequence(orders);

    assert_eq!(ids(&sorted), vec!["dated", "undated"]);
}

#[test]
fn test_scenario_02_same_group_stays_contiguous_dated_first() {
    // 同组内: 有交期在前,交期早者更前;无交期垫底
    let grouper = OrderGrouper::new();
    let sequencer = QueueSequencer::new();

    let mut orders = vec![
        make_order("no-due", Machine::Profile1, 0.75, "Q235", None, false),
        make_order("late", Machine::Profile1, 0.75, "Q235", Some(dt(26, 9)), false),
        make_order("early", Machine::Profile1, 0.75, "Q235", Some(dt(24, 9)), false),
    ];
    grouper.compute_group_due(&mut orders);

    let sorted = sequencer.sequence(orders);

    assert_eq!(ids(&sorted), vec!["early", "late", "no-due"]);
}

#[test]
fn test_scenario_03_group_due_pulls_whole_group_forward() {
    // B 组交期更早 → 整组(含无交期成员)排到 A 组之前
    let grouper = OrderGrouper::new();
    let sequencer = QueueSequencer::new();

    let mut orders = vec![
        make_order("a1", Machine::Profile1, 0.5, "Q235", Some(dt(28, 9)), false),
        make_order("b1", Machine::Profile1, 0.75, "SPCC", Some(dt(24, 9)), false),
        make_order("b2", Machine::Profile1, 0.75, "SPCC", None, false),
    ];
    grouper.compute_group_due(&mut orders);

    let sorted = sequencer.sequence(orders);

    assert_eq!(ids(&sorted), vec!["b1", "b2", "a1"]);
}

#[test]
fn test_scenario_04_profile2_incompatible_first() {
    // 异型管机2子队列: 机1不可生产的订单提到最前
    let grouper = OrderGrouper::new();
    let sequencer = QueueSequencer::new();

    let mut orders = vec![
        make_order("soft", Machine::Profile2, 0.5, "Q235", Some(dt(23, 9)), false),
        make_order("hard", Machine::Profile2, 1.2, "Q235", None, true),
    ];
    grouper.compute_group_due(&mut orders);

    let sorted = sequencer.sequence(orders);

    assert_eq!(ids(&sorted), vec!["hard", "soft"]);
}

#[test]
fn test_scenario_05_profile2_resort_leaves_other_machines_alone() {
    let grouper = OrderGrouper::new();
    let sequencer = QueueSequencer::new();

    let mut orders = vec![
        make_order("p1", Machine::Profile1, 0.5, "Q235", Some(dt(23, 9)), false),
        make_order("p2-hard", Machine::Profile2, 1.5, "SPCC", None, true),
        make_order("straight", Machine::Straight, 0.5, "Q195", Some(dt(24, 9)), false),
    ];
    grouper.compute_group_due(&mut orders);

    let sorted = sequencer.sequence(orders);

    // 非机2订单相对顺序由五键决定,机2订单整体接到队尾
    assert_eq!(ids(&sorted), vec!["p1", "straight", "p2-hard"]);
}

// ==========================================
// 换料标记测试
// ==========================================

#[test]
fn test_scenario_06_changeover_flags_per_machine() {
    let sequencer = QueueSequencer::new();
    let mut orders = vec![
        make_order("a", Machine::Profile1, 0.75, "Q235", None, false),
        make_order("b", Machine::Profile1, 0.75, "Q235", None, false),
        make_order("c", Machine::Profile1, 0.5, "Q235", None, false),
        make_order("d", Machine::Profile2, 0.5, "Q235", None, false),
    ];

    sequencer.recompute_changeover(&mut orders);

    assert!(orders[0].changeover); // 设备首单
    assert!(!orders[1].changeover); // 同厚度同材质
    assert!(orders[2].changeover); // 厚度变化
    assert!(orders[3].changeover); // 另一设备首单
}

#[test]
fn test_scenario_07_changeover_on_material_change() {
    let sequencer = QueueSequencer::new();
    let mut orders = vec![
        make_order("a", Machine::Straight, 0.5, "Q235", None, false),
        make_order("b", Machine::Straight, 0.5, "SPCC", None, false),
    ];

    sequencer.recompute_changeover(&mut orders);

    assert!(orders[0].changeover);
    assert!(orders[1].changeover);
}
