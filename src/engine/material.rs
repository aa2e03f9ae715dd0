// ==========================================
// 制管车间排产系统 - 材质键归一化
// ==========================================
// 职责: 剥离"来料"前缀得到分组键,输出时原样还原
// 输入: 原始材质文本
// 输出: 分组键 / 还原后的材质文本
// ==========================================

/// 供料前缀标记
const VENDOR_PREFIX: &str = "来料";

/// 不锈钢材质标记（异型管机1硬约束判定用）
const STAINLESS_MARKER: &str = "不锈钢";

/// 归一化材质: 剥离"来料"前缀并去除两端空白
///
/// 非前缀材质原样返回（仅去空白）,无失败分支
pub fn normalize_material(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(VENDOR_PREFIX) {
        Some(rest) => rest.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// 还原材质: 原始文本带"来料"前缀时,输出加回前缀
pub fn restore_material(original: &str, key: &str) -> String {
    if original.trim_start().starts_with(VENDOR_PREFIX) {
        format!("{}{}", VENDOR_PREFIX, key)
    } else {
        key.to_string()
    }
}

/// 分组键是否为不锈钢材质
pub fn is_stainless(material_key: &str) -> bool {
    material_key.contains(STAINLESS_MARKER)
}
