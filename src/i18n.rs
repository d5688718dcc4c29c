use serde::{Deserialize, Serialize};

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    #[default]
    Chinese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ru")]
    Russian,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Japanese => write!(f, "ja"),
            TargetLanguage::Korean => write!(f, "ko"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::French => write!(f, "fr"),
            TargetLanguage::Russian => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "ja" | "japanese" | "日本語" | "日文" => Ok(TargetLanguage::Japanese),
            "ko" | "korean" | "한국어" | "韩文" => Ok(TargetLanguage::Korean),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            "ru" | "russian" | "русский" | "俄文" => Ok(TargetLanguage::Russian),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "English",
            TargetLanguage::Japanese => "日本語",
            TargetLanguage::Korean => "한국어",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::French => "Français",
            TargetLanguage::Russian => "Русский",
        }
    }

    /// 获取语言的提示词指令，约束LLM产出的叙述性内容（备注、评估理由等）的语言
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => {
                "对于备注、评估理由等叙述性文字，请使用中文表达，确保语言准确、专业、易于理解。人名、公司名、职位、邮箱、URL等事实字段保留原文。"
            }
            TargetLanguage::English => {
                "Write narrative text (notes, assessment reasoning) in English, ensuring accurate and professional language. Keep factual fields such as names, companies, roles, emails and URLs verbatim."
            }
            TargetLanguage::Japanese => {
                "備考や評価理由などの叙述的な文章は日本語で記述してください。氏名・会社名・役職・メールアドレス・URLなどの事実フィールドは原文のままにしてください。"
            }
            TargetLanguage::Korean => {
                "비고 및 평가 사유 등 서술형 텍스트는 한국어로 작성해 주세요. 이름, 회사명, 직책, 이메일, URL 등 사실 필드는 원문 그대로 유지해 주세요."
            }
            TargetLanguage::German => {
                "Verfassen Sie erzählende Texte (Notizen, Bewertungsbegründungen) auf Deutsch, präzise und professionell. Faktenfelder wie Namen, Firmen, Rollen, E-Mails und URLs bleiben unverändert."
            }
            TargetLanguage::French => {
                "Rédigez les textes narratifs (notes, justifications d'évaluation) en français, de manière précise et professionnelle. Les champs factuels tels que noms, entreprises, rôles, e-mails et URL restent inchangés."
            }
            TargetLanguage::Russian => {
                "Пишите повествовательный текст (заметки, обоснования оценки) на русском языке, точно и профессионально. Фактические поля — имена, компании, должности, почта и URL — оставляйте без изменений."
            }
        }
    }

    /// 获取档案报告的文件名
    pub fn get_report_filename(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "人物档案.md",
            TargetLanguage::English => "Dossier.md",
            TargetLanguage::Japanese => "人物プロファイル.md",
            TargetLanguage::Korean => "인물-프로필.md",
            TargetLanguage::German => "Personendossier.md",
            TargetLanguage::French => "Dossier-Personnel.md",
            TargetLanguage::Russian => "Досье.md",
        }
    }
}
