//! Keyword-driven sentiment primitive: Fast, no model files.
//!
//! Segments text by forward maximum matching against a small built-in
//! vocabulary, scores polarity from positive/negative keyword hits and ranks
//! keywords by frequency. Good enough to drive the tuning pipeline end to
//! end; swap in a real model behind [`SentimentPrimitive`] for production use.

use std::collections::{HashMap, HashSet};

use super::SentimentPrimitive;
use crate::error::PrimitiveError;

// ── Keyword sets ───────────────────────────────────────────

const POSITIVE_KW: &[&str] = &[
    // Traditional
    "讚", "超讚", "好棒", "太棒了", "棒", "推薦", "推爆", "神器", "救星", "喜歡", "愛",
    "開心", "高興", "快樂", "滿意", "完美", "優秀", "厲害", "好用", "太香了", "香", "穩穩",
    "無敵", "吹爆", "期待", "謝謝", "感謝", "有趣", "好玩", "幸福", "太好了", "沒問題",
    "很可以", "愛上", "離不開", "超乎期待", "沒話說", "太強了",
    // Simplified
    "赞", "推荐", "喜欢", "爱", "开心", "高兴", "快乐", "满意", "优秀", "厉害", "无敌",
    "谢谢", "感谢", "没问题",
    // English
    "good", "great", "love", "nice", "awesome", "perfect", "amazing", "excellent",
];

const NEGATIVE_KW: &[&str] = &[
    // Traditional
    "爛", "爛透了", "爛東西", "垃圾", "雷", "超大雷", "超級雷", "踩雷", "雷包", "詐騙",
    "退錢", "難用", "浪費", "糟糕", "有夠糟糕", "扯", "太扯了", "智障", "氣死", "討厭",
    "難過", "傷心", "不開心", "煩", "失望", "生氣", "痛苦", "鬱悶", "差", "不行", "不好",
    "不推", "唉", "誇張",
    // Simplified
    "烂", "诈骗", "退钱", "难用", "浪费", "讨厌", "难过", "伤心", "不开心", "烦", "生气",
    "郁闷",
    // English
    "bad", "terrible", "awful", "hate", "horrible", "worst", "disappointed",
];

/// Words the segmenter should keep whole but that carry no polarity.
const NEUTRAL_VOCAB: &[&str] = &[
    "還可以", "還行", "還好", "還算", "普普通通", "普通", "一般般", "也就這樣", "看情況",
    "可以考慮", "優點", "缺點", "見仁見智", "待觀察", "馬馬虎虎", "湊合", "將就", "看你",
    "隨便", "這樣", "覺得", "真是", "水準", "專業", "特別", "傑作", "高手", "就醬子",
    "还可以", "还行", "还好", "一般", "随便",
];

const SUBJECT_VOCAB: &[&str] = &[
    "這款", "這個", "這家", "這支", "APP", "遊戲", "直播", "影片", "商品", "店", "外送",
    "服務", "課程", "平台", "功能", "設計", "更新", "介面", "手機", "系統", "老師", "客服",
    "主播", "博主", "配送", "餐廳", "社群", "版本", "产品", "服务", "質", "品質",
];

/// Tokens never reported as keywords.
const STOPWORDS: &[&str] = &[
    "這個", "這款", "這家", "這支", "这个", "的", "了", "啦", "吧", "呢", "啊", "哦", "喔",
    "是", "我", "你", "他", "就", "也", "很", "都", "太", "超", "真的", "根本", "完全",
    "簡直", "整個", "直接", "der", "嗯哼",
];

/// Tokens that flip the polarity of the keyword directly after them.
const NEGATORS: &[&str] = &["不", "沒", "没", "別", "别"];

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '，' | '。' | '！' | '？' | '、' | '；' | '：' | '「' | '」' | '『' | '』' | '（'
                | '）' | '…' | '～' | '“' | '”' | '‘' | '’' | '《' | '》'
        )
}

pub struct KeywordPrimitive {
    vocab: HashSet<&'static str>,
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    stopwords: HashSet<&'static str>,
    max_word_chars: usize,
}

impl Default for KeywordPrimitive {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordPrimitive {
    pub fn new() -> Self {
        let positive: HashSet<&'static str> = POSITIVE_KW.iter().copied().collect();
        let negative: HashSet<&'static str> = NEGATIVE_KW.iter().copied().collect();
        let vocab: HashSet<&'static str> = POSITIVE_KW
            .iter()
            .chain(NEGATIVE_KW)
            .chain(NEUTRAL_VOCAB)
            .chain(SUBJECT_VOCAB)
            .chain(STOPWORDS)
            .copied()
            .collect();
        let max_word_chars = vocab.iter().map(|w| w.chars().count()).max().unwrap_or(1);

        Self {
            vocab,
            positive,
            negative,
            stopwords: STOPWORDS.iter().copied().collect(),
            max_word_chars,
        }
    }

    /// Forward maximum matching. ASCII alphanumeric runs stay whole,
    /// whitespace and punctuation are dropped, unknown CJK characters
    /// become single-character tokens.
    fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() || is_punctuation(c) {
                i += 1;
                continue;
            }

            if c.is_ascii_alphanumeric() {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                tokens.push(chars[start..i].iter().collect());
                continue;
            }

            let longest = self.max_word_chars.min(chars.len() - i);
            let mut take = 1;
            for len in (2..=longest).rev() {
                let candidate: String = chars[i..i + len].iter().collect();
                if self.vocab.contains(candidate.as_str()) {
                    take = len;
                    break;
                }
            }
            tokens.push(chars[i..i + take].iter().collect());
            i += take;
        }

        tokens
    }

    fn polarity_of(&self, token: &str) -> Option<bool> {
        let lower = token.to_lowercase();
        if self.positive.contains(lower.as_str()) {
            Some(true)
        } else if self.negative.contains(lower.as_str()) {
            Some(false)
        } else {
            None
        }
    }
}

impl SentimentPrimitive for KeywordPrimitive {
    fn id(&self) -> &str {
        "keyword"
    }

    fn segment(&self, text: &str) -> Result<Vec<String>, PrimitiveError> {
        Ok(self.split(text))
    }

    fn score(&self, text: &str) -> Result<f64, PrimitiveError> {
        let tokens = self.split(text);
        let mut pos = 0usize;
        let mut neg = 0usize;

        for (idx, token) in tokens.iter().enumerate() {
            let Some(positive) = self.polarity_of(token) else {
                continue;
            };
            let negated = idx > 0 && NEGATORS.contains(&tokens[idx - 1].as_str());
            if positive != negated {
                pos += 1;
            } else {
                neg += 1;
            }
        }

        // No signals → 0.5; mixed signals pull toward neutral.
        Ok((pos as f64 + 0.5) / ((pos + neg) as f64 + 1.0))
    }

    fn keywords(&self, text: &str, k: usize) -> Result<Vec<String>, PrimitiveError> {
        let tokens = self.split(text);
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

        for (idx, token) in tokens.iter().enumerate() {
            if self.stopwords.contains(token.as_str()) {
                continue;
            }
            // Single characters only qualify when they carry polarity.
            if token.chars().count() < 2 && self.polarity_of(token).is_none() {
                continue;
            }
            counts.entry(token.as_str()).or_insert((0, idx)).0 += 1;
        }

        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

        Ok(ranked
            .into_iter()
            .take(k)
            .map(|(word, _)| word.to_string())
            .collect())
    }
}
