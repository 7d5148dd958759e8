// ==========================================
// 表格导入 - 运行配置
// ==========================================
// 来源: 环境变量（SHEET_INTAKE_*），缺省值见各字段说明
// 红线: 配置只读；非法取值在启动时报错，不做静默回退
// ==========================================

use crate::domain::template::TemplateRegistry;
use crate::importer::error::{ImportError, ImportResult};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_IMPORT_DIR: &str = "SHEET_INTAKE_IMPORT_DIR";
pub const ENV_DB_PATH: &str = "SHEET_INTAKE_DB_PATH";
pub const ENV_LOG_FILE: &str = "SHEET_INTAKE_LOG_FILE";
pub const ENV_LOCALE: &str = "SHEET_INTAKE_LOCALE";
pub const ENV_TEMPLATES: &str = "SHEET_INTAKE_TEMPLATES";
pub const ENV_ON_MALFORMED: &str = "SHEET_INTAKE_ON_MALFORMED";
pub const ENV_STAGE: &str = "SHEET_INTAKE_STAGE";
pub const ENV_PERF_SQL: &str = "SHEET_INTAKE_PERF_SQL";
pub const ENV_SLOW_SQL_MS: &str = "SHEET_INTAKE_SLOW_SQL_MS";

/// 默认慢 SQL 阈值（毫秒）
pub const DEFAULT_SLOW_SQL_MS: u64 = 200;

/// 畸形行处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    /// 跳过该行并继续（记录日志）
    #[default]
    Skip,
    /// 整个工作表作废，不落库
    Abort,
}

impl FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("期望 skip 或 abort，实际 {}", other)),
        }
    }
}

/// SQL 性能追踪配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSettings {
    pub trace_sql: bool,
    pub slow_sql_ms: u64,
}

impl Default for PerfSettings {
    fn default() -> Self {
        Self {
            trace_sql: false,
            slow_sql_ms: DEFAULT_SLOW_SQL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImporterConfig {
    /// 扫描目录（不存在时自动创建）
    pub import_dir: PathBuf,
    /// SQLite 数据库文件
    pub db_path: PathBuf,
    /// 日志文件（None 表示只输出到控制台）
    pub log_file: Option<PathBuf>,
    pub locale: String,
    /// 外部模板 JSON（None 表示使用内置模板）
    pub templates_path: Option<PathBuf>,
    pub malformed_policy: MalformedRowPolicy,
    /// 是否落库
    pub stage_rows: bool,
    pub perf: PerfSettings,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            import_dir: PathBuf::from("import"),
            db_path: default_db_path(),
            log_file: None,
            locale: "zh-CN".to_string(),
            templates_path: None,
            malformed_policy: MalformedRowPolicy::Skip,
            stage_rows: true,
            perf: PerfSettings::default(),
        }
    }
}

impl ImporterConfig {
    /// 从进程环境变量读取
    pub fn from_env() -> ImportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（便于测试）
    pub fn from_lookup<F>(lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(dir) = get(ENV_IMPORT_DIR) {
            config.import_dir = PathBuf::from(dir);
        }
        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        config.log_file = get(ENV_LOG_FILE).map(PathBuf::from);
        if let Some(locale) = get(ENV_LOCALE) {
            config.locale = locale;
        }
        config.templates_path = get(ENV_TEMPLATES).map(PathBuf::from);

        if let Some(raw) = get(ENV_ON_MALFORMED) {
            config.malformed_policy =
                raw.parse()
                    .map_err(|message| ImportError::ConfigValueError {
                        key: ENV_ON_MALFORMED.to_string(),
                        value: raw.clone(),
                        message,
                    })?;
        }
        if let Some(raw) = get(ENV_STAGE) {
            config.stage_rows = parse_flag(ENV_STAGE, &raw)?;
        }
        if let Some(raw) = get(ENV_PERF_SQL) {
            config.perf.trace_sql = parse_flag(ENV_PERF_SQL, &raw)?;
        }
        if let Some(raw) = get(ENV_SLOW_SQL_MS) {
            config.perf.slow_sql_ms =
                raw.parse::<u64>()
                    .map_err(|e| ImportError::ConfigValueError {
                        key: ENV_SLOW_SQL_MS.to_string(),
                        value: raw.clone(),
                        message: e.to_string(),
                    })?;
        }

        Ok(config)
    }

    /// 加载模板注册表
    ///
    /// # 返回
    /// - templates_path 为 None: 内置模板
    /// - Err(ConfigValueError): 模板文件无法读取
    /// - Err(Registry): JSON 格式错误或模板校验失败
    pub fn load_registry(&self) -> ImportResult<TemplateRegistry> {
        let Some(path) = &self.templates_path else {
            return Ok(TemplateRegistry::builtin());
        };

        let json = fs::read_to_string(path).map_err(|e| ImportError::ConfigValueError {
            key: ENV_TEMPLATES.to_string(),
            value: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(TemplateRegistry::from_json(&json)?)
    }
}

fn parse_flag(key: &str, raw: &str) -> ImportResult<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ImportError::ConfigValueError {
            key: key.to_string(),
            value: raw.to_string(),
            message: "期望布尔值（1/0, true/false, yes/no, on/off）".to_string(),
        }),
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 用户数据目录/sheet-intake/sheet_intake.db
/// - 无法获取数据目录时: ./sheet_intake.db
pub fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("sheet-intake").join("sheet_intake.db"),
        None => PathBuf::from("./sheet_intake.db"),
    }
}
