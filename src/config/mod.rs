//! 配置管理
//!
//! 加载顺序：`config.toml` → `config.<APP_ENV>.toml` → `SCHOOLHUB_*` 环境变量 → 常用环境变量覆盖。

mod r#impl;
mod structs;

pub use structs::*;
