use serde::Deserialize;
use ts_rs::TS;

// 创建学生
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub name: String,
    pub grade: Option<String>,
    pub parent_id: Option<i64>,
}

// 更新学生基本信息
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub grade: Option<String>,
}

// 绑定/解绑家长，parent_id 为 null 表示解绑
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentParentRequest {
    pub parent_id: Option<i64>,
}

// 学生列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListQuery {
    /// 仅返回该家长名下的学生
    pub parent_id: Option<i64>,
    /// 按姓名模糊搜索
    pub search: Option<String>,
}
