//! Rock Type Catalog
//!
//! Categorical codes the classifier was trained with.

use serde::Serialize;

/// One selectable rock type and its encoded value
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RockType {
    pub code: f64,
    pub name: &'static str,
    pub name_zh: &'static str,
}

/// Rock types in code order (1.0 ..= 21.0)
pub const ROCK_TYPES: [RockType; 21] = [
    RockType { code: 1.0, name: "Granite", name_zh: "花岗岩" },
    RockType { code: 2.0, name: "Marble", name_zh: "大理岩" },
    RockType { code: 3.0, name: "Limestone", name_zh: "石灰岩" },
    RockType { code: 4.0, name: "Sandstone", name_zh: "砂岩" },
    RockType { code: 5.0, name: "Shale", name_zh: "页岩" },
    RockType { code: 6.0, name: "Dolomite", name_zh: "白云岩" },
    RockType { code: 7.0, name: "Diorite", name_zh: "闪长岩" },
    RockType { code: 8.0, name: "Rhyolite", name_zh: "流纹岩" },
    RockType { code: 9.0, name: "Tuff", name_zh: "凝灰岩" },
    RockType { code: 10.0, name: "Gneiss", name_zh: "片麻岩" },
    RockType { code: 11.0, name: "Granitic gneiss", name_zh: "片麻花岗岩" },
    RockType { code: 12.0, name: "Skarn", name_zh: "矽卡岩" },
    RockType { code: 13.0, name: "Granodiorite", name_zh: "花岗闪长岩" },
    RockType { code: 14.0, name: "Syenite", name_zh: "正长岩" },
    RockType { code: 15.0, name: "Biotite granite", name_zh: "黑云母花岗岩" },
    RockType { code: 16.0, name: "Diabase", name_zh: "辉绿岩" },
    RockType { code: 17.0, name: "Migmatite", name_zh: "混合岩" },
    RockType { code: 18.0, name: "Peridotite", name_zh: "橄榄岩" },
    RockType { code: 19.0, name: "Plagioclase amphibolite", name_zh: "斜长角闪岩" },
    RockType { code: 20.0, name: "Kimberlite", name_zh: "金伯利岩" },
    RockType { code: 21.0, name: "Other", name_zh: "其他" },
];

/// Look up a rock type by its encoded value
pub fn by_code(code: f64) -> Option<&'static RockType> {
    ROCK_TYPES.iter().find(|r| r.code == code)
}

/// Look up a rock type by English or Chinese name (case-insensitive for English)
pub fn by_name(name: &str) -> Option<&'static RockType> {
    let needle = name.trim();
    ROCK_TYPES
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(needle) || r.name_zh == needle)
}
