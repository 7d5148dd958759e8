// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）、英文、俄文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" / "en" / "ru"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 是否存在该语言的翻译文件
pub fn is_supported(locale: &str) -> bool {
    rust_i18n::available_locales!().iter().any(|l| *l == locale)
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use sheet_intake::i18n::t_with_args;
/// let msg = t_with_args("import.file_found", &[("path", "import/a.xlsx")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_supported_locales() {
        assert!(is_supported("zh-CN"));
        assert!(is_supported("en"));
        assert!(is_supported("ru"));
        assert!(!is_supported("xx"));
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("ru");
        let msg = t_with_args("import.file_found", &[("path", "import/a.xlsx")]);
        assert_eq!(msg, "Найден новый файл импорта: import/a.xlsx");

        set_locale("en");
        let msg = t_with_args(
            "import.sheet_identified",
            &[
                ("file", "a.xlsx"),
                ("sheet", "Sheet1"),
                ("template", "class_gtins"),
                ("count", "3"),
            ],
        );
        assert_eq!(msg, "a.xlsx [Sheet1] - identified as: class_gtins, rows: 3");

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_malformed_and_summary_wording() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let args = [
            ("file", "a.csv"),
            ("sheet", "a"),
            ("row", "6"),
            ("column", "5"),
            ("width", "3"),
        ];
        assert_eq!(
            t_with_args("import.row_malformed", &args),
            "a.csv [a] - sheet row 6 lacks column index 5 (width 3)"
        );
        assert!(t_with_args("import.row_malformed_skipped", &args).ends_with("row skipped"));

        let msg = t_with_args(
            "import.scan_finished",
            &[("sheets", "3"), ("matched", "2"), ("failed", "1")],
        );
        assert_eq!(msg, "Scan finished: 3 sheets, 2 identified, 1 failures");

        set_locale("zh-CN");
    }
}
