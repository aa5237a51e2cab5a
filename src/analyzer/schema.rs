use crate::model::ChartType;
use serde_json::{json, Value};

/// Gemini `responseSchema` for the extraction call, matching `ChartData`.
pub fn chart_data_schema() -> Value {
    let chart_types: Vec<&str> = ChartType::ALL.iter().map(|t| t.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "研究主題的摘要，約200字",
            },
            "keyFindings": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3-5個關鍵發現",
            },
            "charts": {
                "type": "ARRAY",
                "description": "1-8個圖表配置",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": {
                            "type": "STRING",
                            "enum": chart_types,
                            "description": "圖表類型",
                        },
                        "title": { "type": "STRING", "description": "圖表標題" },
                        "labels": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "圖表標籤",
                        },
                        "data": {
                            "type": "ARRAY",
                            "items": { "type": "NUMBER" },
                            "description": "圖表資料",
                        },
                        "backgroundColor": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "背景顏色陣列",
                        },
                        "borderColor": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "邊框顏色陣列",
                        },
                        "unit": {
                            "type": "STRING",
                            "description": "數據單位，如 %、萬人、億元等",
                        },
                    },
                    "required": ["type", "title", "labels", "data"],
                    "propertyOrdering": ["type", "title", "labels", "data", "backgroundColor", "borderColor", "unit"],
                },
            },
        },
        "required": ["summary", "keyFindings", "charts"],
        "propertyOrdering": ["summary", "keyFindings", "charts"],
    })
}
