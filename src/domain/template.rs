// ==========================================
// 表格导入 - 模板注册表
// ==========================================
// 职责: 定义已知表格布局（模板）及其列规则、数据偏移、落库表提示
// 红线: 注册表构建后只读；模板顺序即识别优先级（先匹配者胜出）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

// ==========================================
// 列规则
// ==========================================

/// 表头标签要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRule {
    /// 表头必须（忽略大小写）等于该标签
    Exact(String),
    /// 任意表头均可
    Any,
}

/// 数据行中该列的取值要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// 缺失则整行丢弃（strict）
    Required,
    /// 允许缺失
    Optional,
}

/// 单列规则: (列号, 表头要求, 取值要求)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawColumnRule", into = "RawColumnRule")]
pub struct ColumnRule {
    pub index: usize,
    pub label: LabelRule,
    pub presence: Presence,
}

impl ColumnRule {
    /// 标签必须匹配 + 值必填
    pub fn required(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: LabelRule::Exact(label.into()),
            presence: Presence::Required,
        }
    }

    /// 标签必须匹配 + 值可缺失
    pub fn optional(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: LabelRule::Exact(label.into()),
            presence: Presence::Optional,
        }
    }

    /// 任意标签 + 值必填
    pub fn any_required(index: usize) -> Self {
        Self {
            index,
            label: LabelRule::Any,
            presence: Presence::Required,
        }
    }

    /// 任意标签 + 值可缺失
    pub fn any_optional(index: usize) -> Self {
        Self {
            index,
            label: LabelRule::Any,
            presence: Presence::Optional,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.presence == Presence::Required
    }
}

// 外部 JSON 形态: {"id": 1, "val": "GTIN" | null, "strict": true}
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawColumnRule {
    #[serde(alias = "index")]
    id: usize,
    #[serde(default, alias = "label")]
    val: Option<String>,
    #[serde(default = "default_strict")]
    strict: bool,
}

fn default_strict() -> bool {
    true
}

impl From<RawColumnRule> for ColumnRule {
    fn from(raw: RawColumnRule) -> Self {
        Self {
            index: raw.id,
            label: match raw.val {
                Some(label) => LabelRule::Exact(label),
                None => LabelRule::Any,
            },
            presence: if raw.strict {
                Presence::Required
            } else {
                Presence::Optional
            },
        }
    }
}

impl From<ColumnRule> for RawColumnRule {
    fn from(rule: ColumnRule) -> Self {
        let strict = rule.is_strict();
        Self {
            id: rule.index,
            val: match rule.label {
                LabelRule::Exact(label) => Some(label),
                LabelRule::Any => None,
            },
            strict,
        }
    }
}

// ==========================================
// 模板
// ==========================================

/// 已知表格布局
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(rename = "cols", alias = "columns")]
    pub columns: Vec<ColumnRule>,
    /// 表头之后需要跳过的说明行数
    #[serde(default)]
    pub offset: usize,
    /// 落库目标表（仅持久化提示）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl Template {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnRule>, offset: usize) -> Self {
        Self {
            name: name.into(),
            columns,
            offset,
            table: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// 抽取所需的最小行宽
    pub fn required_width(&self) -> usize {
        self.columns.iter().map(|c| c.index + 1).max().unwrap_or(0)
    }
}

// ==========================================
// 注册表错误
// ==========================================

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("模板名称为空")]
    EmptyName,

    #[error("模板名称重复: {0}")]
    DuplicateName(String),

    #[error("模板没有任何列规则: {0}")]
    NoColumns(String),

    #[error("模板 {template} 的落库表名非法: {table}")]
    InvalidTableName { template: String, table: String },

    #[error("模板配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

// ==========================================
// TemplateRegistry - 有序模板注册表
// ==========================================

/// 有序、不可变的模板目录
///
/// 识别时按注册顺序逐个探测，先匹配者胜出；
/// 存在重叠时，更具体的模板必须排在更通用的模板之前。
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

impl TemplateRegistry {
    /// 构建注册表（校验名称唯一、列规则非空、表名合法）
    pub fn new(templates: Vec<Template>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for template in &templates {
            if template.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if !seen.insert(template.name.as_str()) {
                return Err(RegistryError::DuplicateName(template.name.clone()));
            }
            if template.columns.is_empty() {
                return Err(RegistryError::NoColumns(template.name.clone()));
            }
            if let Some(table) = &template.table {
                if !is_sql_identifier(table) {
                    return Err(RegistryError::InvalidTableName {
                        template: template.name.clone(),
                        table: table.clone(),
                    });
                }
            }
        }
        Ok(Self { templates })
    }

    /// 从 JSON 数组加载（顺序即优先级）
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let templates: Vec<Template> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    /// 内置模板
    pub fn builtin() -> Self {
        let class_gtins = Template::new(
            "class_gtins",
            vec![
                ColumnRule::required(1, "GTIN"),
                ColumnRule::required(2, "Наименование товара"),
                ColumnRule::required(5, "ИНН произв."),
                ColumnRule::required(6, "ТН ВЭД"),
                ColumnRule::required(8, "Артикул"),
            ],
            0,
        )
        .with_table("gtin_data");

        let mut order_columns = vec![
            ColumnRule::required(0, "ИНН"),
            ColumnRule::any_optional(1),
            ColumnRule::required(2, "ФИО"),
            // 商标列
            ColumnRule::any_required(3),
            ColumnRule::any_required(4),
            ColumnRule::optional(5, "ЗПОЛНЯТЬ ТОЛЬКО ЖЕЛТЫЕ ЯЧЕЙКИ!!"),
        ];
        order_columns.extend((6..=12).map(ColumnRule::any_required));
        let class_order = Template::new("class_order", order_columns, 2);

        Self {
            templates: vec![class_gtins, class_order],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// 表名只允许 [A-Za-z_][A-Za-z0-9_]*（拼接进 SQL）
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
