//! 工具函数模块
use crate::types::{Candidate, Content, Part, Role};

/// 创建单段文本内容的便捷函数
///
/// # 参数
///
/// * `role` - 角色，系统指令传 `None`
/// * `text` - 文本内容
pub fn content(role: Option<Role>, text: &str) -> Content {
    Content {
        role,
        parts: vec![Part {
            text: Some(text.to_string()),
            thought: false,
        }],
    }
}

/// 提取候选结果中的文本
///
/// 按顺序拼接所有文本片段，跳过思考过程片段。
pub(crate) fn candidate_text(candidate: &Candidate) -> String {
    candidate
        .content
        .parts
        .iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text.as_deref())
        .collect()
}
