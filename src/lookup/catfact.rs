use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CatFact {
    pub fact: String,
    #[serde(default)]
    pub length: usize,
}

impl CatFact {
    pub fn render(&self) -> String {
        format!("🐱 *Cat fact:* {}", self.fact.trim())
    }
}
