// ==========================================
// 表格导入 - 工作表识别器
// ==========================================
// 职责: 表头行 → 模板（或无匹配）
// 规则:
// - 按注册顺序探测模板，先匹配者胜出
// - 按规则顺序比对，遇到第一条不满足的规则即放弃该模板
// - 表头比对忽略大小写（比对单元格的可打印形式）
// - 规则列号超出表头长度视为不匹配（通配规则同样适用）
// 红线: 纯函数，无副作用，不记录日志
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::template::{ColumnRule, LabelRule, Template, TemplateRegistry};

/// 识别结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification<'r> {
    Matched(&'r Template),
    NoMatch,
}

impl<'r> Classification<'r> {
    pub fn template(&self) -> Option<&'r Template> {
        match self {
            Classification::Matched(template) => Some(template),
            Classification::NoMatch => None,
        }
    }

    pub fn template_name(&self) -> Option<&'r str> {
        self.template().map(|t| t.name.as_str())
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Classification::Matched(_))
    }
}

pub struct SheetClassifier<'r> {
    registry: &'r TemplateRegistry,
}

impl<'r> SheetClassifier<'r> {
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Self { registry }
    }

    /// 识别表头对应的模板（先匹配者胜出）
    pub fn classify(&self, header: &[CellValue]) -> Classification<'r> {
        self.registry
            .iter()
            .find(|template| header_matches(header, template))
            .map_or(Classification::NoMatch, Classification::Matched)
    }

    /// 所有能匹配该表头的模板（按注册顺序），用于发现重叠模板
    pub fn matching(&self, header: &[CellValue]) -> Vec<&'r Template> {
        self.registry
            .iter()
            .filter(|template| header_matches(header, template))
            .collect()
    }
}

/// 表头是否满足模板的全部列规则
pub fn header_matches(header: &[CellValue], template: &Template) -> bool {
    template
        .columns
        .iter()
        .all(|rule| rule_matches(header, rule))
}

fn rule_matches(header: &[CellValue], rule: &ColumnRule) -> bool {
    let Some(cell) = header.get(rule.index) else {
        return false;
    };
    match &rule.label {
        LabelRule::Any => true,
        LabelRule::Exact(expected) => cell.label_key() == expected.to_lowercase(),
    }
}
