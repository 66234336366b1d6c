//! # prompt — สร้าง Prompt สำหรับ AI
//!
//! บังคับให้ AI ตอบเป็น JSON object อย่างเดียว
//! (แต่ Extractor ก็ยังไม่เชื่อ — ดู `engine::extractor::find_json_object`)

/// Instruction sent to the LLM for one user description.
pub fn build_extraction_prompt(user_prompt: &str) -> String {
    let user_prompt = user_prompt.trim();

    format!(r#"Extract the trading parameters from this prompt: {user_prompt}

Please respond with ONLY a JSON object in this format:
{{
    "duration": <number of ticks>,
    "stake": <stake amount in dollars>,
    "initial_stake": <stake amount in dollars>,
    "profit_threshold": <profit target in dollars>,
    "loss_threshold": <stop loss in dollars>
}}

Optional keys, include them only if the prompt mentions them:
- "market", "submarket", "symbol": instrument identifiers (e.g. "synthetic_index", "random_index", "1HZ10V")
- "contract_type": "CALL" for rise / "PUT" for fall

Use plain numbers (no currency symbols, no quotes). Give the stop loss as a positive amount.
Respond with JSON only:"#)
}
