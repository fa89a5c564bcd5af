use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language. Chinese is the default the catalog ships with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
    Ja,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Zh, Locale::En, Locale::Ja];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::Zh => &ZH,
            Locale::En => &EN,
            Locale::Ja => &JA,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" => Ok(Locale::Zh),
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            other => Err(anyhow!("Unsupported locale '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusStrings {
    pub releasing: &'static str,
    pub finished: &'static str,
    pub not_yet_released: &'static str,
    pub unknown: &'static str,
}

/// The per-locale strings the view models need. Templates use `{number}`.
#[derive(Debug, Serialize)]
pub struct Strings {
    pub latest_anime: &'static str,
    pub popular_anime: &'static str,
    pub weekly_updates: &'static str,
    pub episodes: &'static str,
    pub status: StatusStrings,
    pub episode: &'static str,
    pub video_placeholder: &'static str,
    pub video_placeholder_desc: &'static str,
    pub search_results: &'static str,
    pub no_results: &'static str,
    pub no_data: &'static str,
    pub not_found: &'static str,
    pub not_found_desc: &'static str,
}

static ZH: Strings = Strings {
    latest_anime: "最新动漫",
    popular_anime: "最受欢迎",
    weekly_updates: "同步每周更新",
    episodes: "集数",
    status: StatusStrings {
        releasing: "连载中",
        finished: "已完结",
        not_yet_released: "即将上映",
        unknown: "未知状态",
    },
    episode: "第 {number} 集",
    video_placeholder: "视频播放器占位符",
    video_placeholder_desc: "由于版权限制，此处仅作为示例展示",
    search_results: "搜索结果",
    no_results: "未找到相关动漫",
    no_data: "暂无数据",
    not_found: "页面未找到",
    not_found_desc: "您访问的页面不存在或已被移除",
};

static EN: Strings = Strings {
    latest_anime: "Latest Anime",
    popular_anime: "Popular Anime",
    weekly_updates: "Weekly Updates",
    episodes: "Episodes",
    status: StatusStrings {
        releasing: "Releasing",
        finished: "Finished",
        not_yet_released: "Coming Soon",
        unknown: "Unknown",
    },
    episode: "Episode {number}",
    video_placeholder: "Video Player Placeholder",
    video_placeholder_desc: "This is just a demo due to copyright restrictions",
    search_results: "Search Results",
    no_results: "No anime found",
    no_data: "No data available",
    not_found: "Page Not Found",
    not_found_desc: "The page you are looking for does not exist or has been removed",
};

static JA: Strings = Strings {
    latest_anime: "最新アニメ",
    popular_anime: "人気アニメ",
    weekly_updates: "週間更新",
    episodes: "エピソード",
    status: StatusStrings {
        releasing: "放送中",
        finished: "完結",
        not_yet_released: "近日公開",
        unknown: "不明",
    },
    episode: "第{number}話",
    video_placeholder: "動画プレーヤーのプレースホルダー",
    video_placeholder_desc: "著作権の制限により、これはデモ表示のみです",
    search_results: "検索結果",
    no_results: "アニメが見つかりません",
    no_data: "データがありません",
    not_found: "ページが見つかりません",
    not_found_desc: "お探しのページは存在しないか、削除されました",
};

/// Replaces the first `{key}` placeholder in `template`.
pub fn format_template(template: &str, key: &str, value: impl fmt::Display) -> String {
    template.replacen(&format!("{{{}}}", key), &value.to_string(), 1)
}
