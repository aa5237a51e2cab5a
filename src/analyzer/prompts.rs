pub struct PromptTemplate;

impl PromptTemplate {
    /// Search-grounded research prompt. Parameterised only by the topic.
    pub fn build_research_prompt(topic: &str) -> String {
        format!(
            r#"請搜尋關於「{topic}」的最新資訊和數據。
我需要：
1. 相關的統計數據和趨勢
2. 重要的數字和比例
3. 時間序列資料（如果有的話）
4. 地區性分布資料（如果適用）
5. 關鍵指標和變化趨勢

請提供具體的數字和可量化的資訊。"#
        )
    }

    /// Extraction prompt wrapping the research text.
    pub fn build_extraction_prompt(research_text: &str) -> String {
        format!(
            r#"基於以下研究資料，請生成結構化的分析結果和圖表資料：

研究資料：
{research_text}

請生成：
1. 一個簡潔的摘要
2. 3-5個關鍵發現
3. 1-8個有意義的圖表，包含真實數據

圖表應該包含具體的數字，不要使用假資料。如果某類型的資料不適合特定圖表，請選擇最合適的圖表類型。
顏色請使用適合的 rgba 或 hex 格式。"#
        )
    }
}
