// ==========================================
// 模板识别 + 数据行抽取 集成测试
// ==========================================
// 测试目标: 通过公共 API 验证识别顺序、偏移、必填/可选过滤、畸形行
// ==========================================


use sheet_intake::domain::{CellValue, ColumnRule, Template, TemplateRegistry};
use sheet_intake::engine::{Classification, RowExtractor, SheetClassifier};
use test_helpers::text_row;

fn rows(count: usize, width: usize) -> Vec<Vec<CellValue>> {
    (0..count)
        .map(|r| {
            (0..width)
                .map(|c| CellValue::text(format!("r{}c{}", r, c)))
                .collect()
        })
        .collect()
}

#[test]
fn test_wildcards_and_case_insensitive_labels() {
    let registry = TemplateRegistry::new(vec![Template::new(
        "products",
        vec![
            ColumnRule::required(0, "GTIN"),
            ColumnRule::required(1, "Name"),
            ColumnRule::any_required(2),
            ColumnRule::any_optional(5),
        ],
        0,
    )])
    .unwrap();
    let classifier = SheetClassifier::new(&registry);

    let header = text_row(&["GTIN", "Name", "X", "X", "X", "Code"]);
    assert_eq!(classifier.classify(&header).template_name(), Some("products"));

    let lower = text_row(&["gtin", "Name", "X", "X", "X", "Code"]);
    assert!(classifier.classify(&lower).is_match());

    let wrong = text_row(&["GTIN", "Wrong", "X", "X", "X", "Code"]);
    assert_eq!(classifier.classify(&wrong), Classification::NoMatch);

    // 通配列超出表头宽度同样视为不匹配
    let narrow = text_row(&["GTIN", "Name", "X"]);
    assert_eq!(classifier.classify(&narrow), Classification::NoMatch);
}

#[test]
fn test_registry_order_decides_overlapping_templates() {
    let broad = Template::new("broad", vec![ColumnRule::any_required(0)], 0);
    let narrow = Template::new("narrow", vec![ColumnRule::required(0, "ID")], 0);
    let header = text_row(&["ID"]);

    let broad_first = TemplateRegistry::new(vec![broad.clone(), narrow.clone()]).unwrap();
    let narrow_first = TemplateRegistry::new(vec![narrow, broad]).unwrap();

    assert_eq!(
        SheetClassifier::new(&broad_first).classify(&header).template_name(),
        Some("broad")
    );
    assert_eq!(
        SheetClassifier::new(&narrow_first).classify(&header).template_name(),
        Some("narrow")
    );
    assert_eq!(SheetClassifier::new(&broad_first).matching(&header).len(), 2);
}

#[test]
fn test_offset_skips_leading_rows() {
    let template = Template::new("t", vec![ColumnRule::any_required(0)], 2);
    let data = rows(5, 1);

    let extraction = RowExtractor::new().extract(&data, &template);
    assert_eq!(extraction.len(), 3);
    assert_eq!(extraction.rows[0].values()[0], CellValue::text("r2c0"));
    assert_eq!(extraction.rows[2].values()[0], CellValue::text("r4c0"));

    // 偏移超过行数: 空结果
    let far = Template::new("t", vec![ColumnRule::any_required(0)], 10);
    assert!(RowExtractor::new().extract(&data, &far).is_empty());
}

#[test]
fn test_required_and_optional_columns_filter_rows() {
    let template = Template::new(
        "t",
        vec![
            ColumnRule::required(0, "Code"),
            ColumnRule::optional(1, "Note"),
            ColumnRule::any_required(2),
            ColumnRule::any_optional(3),
        ],
        0,
    );
    let data = vec![
        // 可选列缺失: 保留
        vec![
            CellValue::text("A"),
            CellValue::Empty,
            CellValue::Int(1),
            CellValue::Empty,
        ],
        // 必填(带标签)缺失: 丢弃
        vec![
            CellValue::Empty,
            CellValue::text("n"),
            CellValue::Int(2),
            CellValue::text("x"),
        ],
        // 必填(通配)为错误单元格: 丢弃
        vec![
            CellValue::text("C"),
            CellValue::text("n"),
            CellValue::Error("#N/A".to_string()),
            CellValue::text("x"),
        ],
        // 空字符串视为有值
        vec![
            CellValue::text("D"),
            CellValue::text(""),
            CellValue::Float(3.0),
            CellValue::text(""),
        ],
    ];

    let extraction = RowExtractor::new().extract(&data, &template);
    let codes: Vec<String> = extraction
        .rows
        .iter()
        .map(|r| r.values()[0].to_string())
        .collect();
    assert_eq!(codes, vec!["A", "D"]);
    assert!(extraction.malformed.is_empty());
}

#[test]
fn test_short_row_is_reported_and_later_rows_kept() {
    let template = Template::new(
        "t",
        vec![ColumnRule::any_required(0), ColumnRule::any_optional(3)],
        0,
    );
    let data = vec![
        text_row(&["a", "b", "c", "d"]),
        text_row(&["short"]),
        text_row(&["e", "f", "g", "h"]),
    ];

    let extraction = RowExtractor::new().extract(&data, &template);
    assert_eq!(extraction.len(), 2);
    assert_eq!(extraction.malformed.len(), 1);
    assert_eq!(extraction.malformed[0].row, 1);
    assert_eq!(extraction.malformed[0].column, 3);
    assert_eq!(extraction.malformed[0].width, 1);

    // 重复抽取结果一致
    assert_eq!(RowExtractor::new().extract(&data, &template), extraction);
}

#[test]
fn test_builtin_gtin_template_projects_rule_columns() {
    let registry = TemplateRegistry::builtin();
    let header = text_row(&test_helpers::GTIN_HEADER);
    let template = SheetClassifier::new(&registry)
        .classify(&header)
        .template()
        .unwrap();
    assert_eq!(template.name, "class_gtins");

    let data = vec![text_row(&[
        "1",
        "4600000000011",
        "Крем",
        "A",
        "RU",
        "7701234567",
        "3304990000",
        "белый",
        "ART-1",
    ])];
    let extraction = RowExtractor::new().extract(&data, template);
    assert_eq!(
        extraction.rows[0].values(),
        &text_row(&["4600000000011", "Крем", "7701234567", "3304990000", "ART-1"])[..]
    );
}
