// ==========================================
// 每周派车分配系统 - 司机名单加载
// ==========================================
// 格式: 纯文本,每行一个姓名,空行与 # 开头的行忽略
// 用途: 新司机名单 / 半限制司机名单
// ==========================================

use crate::domain::driver::DriverKey;
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;
use tracing::debug;

/// 解析名单文本（去重,保持首次出现顺序）
pub fn parse_name_list(text: &str) -> Vec<DriverKey> {
    let mut keys: Vec<DriverKey> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let key = DriverKey::new(line);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// 从文件加载名单
pub fn load_name_list(path: &Path) -> ImportResult<Vec<DriverKey>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    let keys = parse_name_list(&text);
    debug!(file = %path.display(), count = keys.len(), "名单加载完成");
    Ok(keys)
}
