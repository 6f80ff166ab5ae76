//! Phrase banks for the synthetic corpus (Taiwanese-Mandarin review slang).

pub(super) const POSITIVE: &[&str] = &[
    "真的超讚der",
    "整個無敵神",
    "太強了吧",
    "這個真心推薦",
    "簡直是神器",
    "太香了",
    "真的很可以",
    "根本就是救星",
    "完全看不出有什麼缺點",
    "我直接吹爆",
    "超級無敵讚",
    "根本離不開了",
    "用了就愛上",
    "推爆這個",
    "品質穩穩的",
    "完全沒話說",
    "超級棒的啦",
    "好用到哭",
    "讚到爆炸",
    "超乎期待",
];

pub(super) const NEGATIVE: &[&str] = &[
    "這什麼爛東西",
    "根本是智障設計",
    "完全不推好吧",
    "這也太扯了吧",
    "爛透了啦",
    "退錢啦",
    "真的是浪費時間",
    "超大雷",
    "這不行啊",
    "根本是詐騙",
    "難用死了",
    "超級雷",
    "踩雷了啦",
    "爛透了",
    "氣死人了",
    "根本垃圾",
    "不推不推",
    "超級雷包",
    "有夠糟糕",
    "太誇張了吧",
];

pub(super) const SARCASTIC: &[&str] = &[
    "那你很厲害哦",
    "好啦隨便你",
    "反正你最厲害",
    "是是是你說得對",
    "哇塞厲害了",
    "真是太棒了呢",
    "好棒棒哦",
    "你最棒了啦",
    "真是太有水準了",
    "沒錯就是這樣呢",
    "誰理你啊",
    "隨便啦",
    "我也是這樣覺得呢",
    "真是特別呢",
    "好厲害喔",
    "你最厲害了",
    "我覺得很ok呢",
    "真是傑作啊",
    "高手高手",
    "太專業了吧",
    "厲害了我的哥",
    "就醬子吧",
    "可不就是這樣",
    "whatever啦",
    "嗯哼",
];

pub(super) const NEUTRAL: &[&str] = &[
    "還行吧",
    "普普通通",
    "一般般",
    "也就這樣",
    "不算差但也不算好",
    "看情況吧",
    "可以考慮",
    "有優點也有缺點",
    "見仁見智吧",
    "待觀察",
    "還可以啦",
    "馬馬虎虎",
    "湊合著用",
    "將就了",
    "還算ok",
    "還行啦",
    "凱子啦",
    "還好啦",
    "普通啦",
    "看你要怎麼想",
];

pub(super) const SUBJECTS: &[&str] = &[
    "這款APP",
    "這個遊戲",
    "這個直播",
    "這支影片",
    "這個商品",
    "這家店",
    "這個外送",
    "這個服務",
    "這個課程",
    "這個平台",
    "這個功能",
    "這個設計",
    "這個更新",
    "這個介面",
    "這款手機",
    "這個系統",
    "這個老師",
    "這個客服",
    "這個主播",
    "這個博主",
    "這個配送",
    "這家餐廳",
    "這個社群",
    "這個版本",
];
