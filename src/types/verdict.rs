use serde::{Deserialize, Serialize};

/// 完整性评估结论，是研究循环"是否继续"判定中质量侧的唯一权威
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectionVerdict {
    /// 画像是否已满足完整性要求
    pub complete: bool,
    /// 尚未满足要求的字段名
    pub missing_fields: Vec<String>,
    /// 评估理由
    pub reasoning: String,
    /// 针对缺口的后续查询建议，供下一轮查询生成参考
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up_queries: Vec<String>,
}

impl ReflectionVerdict {
    /// 构造"不完整"结论
    pub fn incomplete(missing_fields: Vec<String>, reasoning: impl Into<String>) -> Self {
        Self {
            complete: false,
            missing_fields,
            reasoning: reasoning.into(),
            follow_up_queries: Vec::new(),
        }
    }

    /// 构造"已完整"结论
    pub fn complete(reasoning: impl Into<String>) -> Self {
        Self {
            complete: true,
            missing_fields: Vec::new(),
            reasoning: reasoning.into(),
            follow_up_queries: Vec::new(),
        }
    }
}
