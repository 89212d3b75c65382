use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct SystemInfoResponse {
    pub system_name: String, // 系统名称
    pub version: String,     // 服务版本
    pub environment: String, // 运行环境
    pub uptime_seconds: i64, // 运行时长
}
