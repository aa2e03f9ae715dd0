use super::ScheduleProjector;
use crate::domain::types::{DeliveryStatus, Machine, ProcessType};
use crate::domain::Order;
use chrono::{NaiveDate, NaiveDateTime};

// ==========================================
// 测试辅助函数
// ==========================================

fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn make_order(order_id: &str, machine: Machine, duration_min: i64, changeover: bool) -> Order {
    Order {
        order_id: order_id.to_string(),
        process_type: ProcessType::Profile,
        thickness_mm: Some(0.75),
        material_key: "Q235".to_string(),
        material_raw: "Q235".to_string(),
        completion_raw: None,
        remaining_qty: 0.0,
        produced_qty: 0.0,
        due_date: None,
        order_date: None,
        row_number: 0,
        machine: Some(machine),
        group_id: None,
        group_due: None,
        changeover,
        duration_min,
        start_time: None,
        end_time: None,
        status: DeliveryStatus::OnTime,
        relocated: false,
        profile1_incompatible: false,
    }
}

// ==========================================
// 分段推算测试
// ==========================================

#[test]
fn test_scenario_01_single_segment_within_shift() {
    let projector = ScheduleProjector::new();
    let mut orders = vec![make_order("A", Machine::Profile2, 120, false)];

    projector.project(&mut orders, dt(21, 8, 0)).unwrap();

    assert_eq!(orders[0].start_time, Some(dt(21, 8, 0)));
    assert_eq!(orders[0].end_time, Some(dt(21, 10, 0)));
}

#[test]
fn test_scenario_02_break_splits_into_two_segments() {
    // 11:30 起 180 分钟: [11:30,12:00) 30 分钟,
    // 跳过午休后 [13:30,16:00) 150 分钟,结束 16:00
    let projector = ScheduleProjector::new();
    let mut orders = vec![make_order("A", Machine::Profile2, 180, false)];

    projector.project(&mut orders, dt(21, 11, 30)).unwrap();

    assert_eq!(orders[0].start_time, Some(dt(21, 11, 30)));
    assert_eq!(orders[0].end_time, Some(dt(21, 16, 0)));
}

#[test]
fn test_scenario_03_three_segments_across_breaks() {
    // 11:30 起 300 分钟: 30 + 240 + 30,经午休与晚饭休息
    let projector = ScheduleProjector::new();
    let mut orders = vec![make_order("A", Machine::Profile2, 300, false)];

    projector.project(&mut orders, dt(21, 11, 30)).unwrap();

    assert_eq!(orders[0].start_time, Some(dt(21, 11, 30)));
    assert_eq!(orders[0].end_time, Some(dt(21, 18, 30)));
}

#[test]
fn test_scenario_04_overnight_rollover() {
    // 20:00 起 120 分钟: [20:00,21:00) 后跨夜休,次日 [08:00,09:01)
    // (段间缓冲 1 分钟落在夜休内,首段实际消耗 60 分钟)
    let projector = ScheduleProjector::new();
    let mut orders = vec![make_order("A", Machine::Profile2, 120, false)];

    projector.project(&mut orders, dt(21, 20, 0)).unwrap();

    assert_eq!(orders[0].start_time, Some(dt(21, 20, 0)));
    assert_eq!(orders[0].end_time, Some(dt(22, 9, 0)));
}

#[test]
fn test_scenario_05_changeover_penalty_delays_start() {
    let projector = ScheduleProjector::new();
    let mut orders = vec![make_order("A", Machine::Profile2, 60, true)];

    projector.project(&mut orders, dt(21, 8, 0)).unwrap();

    assert_eq!(orders[0].start_time, Some(dt(21, 8, 15)));
    assert_eq!(orders[0].end_time, Some(dt(21, 9, 15)));
}

#[test]
fn test_scenario_06_changeover_penalty_absorbed_by_break() {
    // 游标 11:50,换料 +15 → 12:05 落在午休内,顺延到 13:30
    let projector = ScheduleProjector::new();
    let mut orders = vec![
        make_order("A", Machine::Profile2, 230, false),
        make_order("B", Machine::Profile2, 60, true),
    ];

    projector.project(&mut orders, dt(21, 8, 0)).unwrap();

    assert_eq!(orders[0].end_time, Some(dt(21, 11, 50)));
    assert_eq!(orders[1].start_time, Some(dt(21, 13, 30)));
    assert_eq!(orders[1].end_time, Some(dt(21, 14, 30)));
}

#[test]
fn test_scenario_07_cursor_monotonic_per_machine() {
    let projector = ScheduleProjector::new();
    let mut orders = vec![
        make_order("A", Machine::Profile2, 90, false),
        make_order("B", Machine::Profile2, 30, false),
        make_order("C", Machine::Profile2, 45, true),
    ];

    let cursors = projector.project(&mut orders, dt(21, 8, 0)).unwrap();

    for pair in orders.windows(2) {
        assert!(pair[1].start_time.unwrap() >= pair[0].end_time.unwrap());
    }
    // 游标 = 末单末段结束
    assert_eq!(cursors[&Machine::Profile2], orders[2].end_time.unwrap());
}

#[test]
fn test_scenario_08_machines_run_independently() {
    let projector = ScheduleProjector::new();
    let mut orders = vec![
        make_order("A", Machine::Profile1, 60, false),
        make_order("B", Machine::Profile2, 90, false),
    ];

    projector.project(&mut orders, dt(21, 8, 0)).unwrap();

    // 两台设备各自从排产起点开工,互不占用
    assert_eq!(orders[0].start_time, Some(dt(21, 8, 0)));
    assert_eq!(orders[1].start_time, Some(dt(21, 8, 0)));
}

#[test]
fn test_scenario_09_segments_respect_work_windows() {
    // 推算结果不得与休息时段相交: 起点 08:00 连续大单
    let projector = ScheduleProjector::new();
    let mut orders = vec![make_order("A", Machine::Profile2, 700, false)];

    projector.project(&mut orders, dt(21, 8, 0)).unwrap();

    // 240 + 240 + 180 = 660,剩 40 → 次日 [08:00,08:40)
    assert_eq!(orders[0].start_time, Some(dt(21, 8, 0)));
    assert_eq!(orders[0].end_time, Some(dt(22, 8, 40)));
}

#[test]
fn test_scenario_10_zero_duration_order_is_instantaneous() {
    let projector = ScheduleProjector::new();
    let mut orders = vec![make_order("A", Machine::Profile2, 0, false)];

    let cursors = projector.project(&mut orders, dt(21, 8, 0)).unwrap();

    assert_eq!(orders[0].start_time, Some(dt(21, 8, 0)));
    assert_eq!(orders[0].end_time, Some(dt(21, 8, 0)));
    assert_eq!(cursors[&Machine::Profile2], dt(21, 8, 0));
}

#[test]
fn test_scenario_11_projection_reinitializes_cursors() {
    // 同一引擎连续推算两次,结果一致（游标每次重置）
    let projector = ScheduleProjector::new();
    let mut first = vec![make_order("A", Machine::Profile2, 120, false)];
    let mut second = vec![make_order("A", Machine::Profile2, 120, false)];

    projector.project(&mut first, dt(21, 8, 0)).unwrap();
    projector.project(&mut second, dt(21, 8, 0)).unwrap();

    assert_eq!(first[0].start_time, second[0].start_time);
    assert_eq!(first[0].end_time, second[0].end_time);
}
