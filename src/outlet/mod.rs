use anyhow::Result;
use std::fs;

use crate::config::Config;
use crate::researcher::runner::ResearchOutcome;

/// 保存研究产出
pub async fn save(config: &Config, outcome: &ResearchOutcome) -> Result<()> {
    let outlet = DiskOutlet;
    outlet.save(config, outcome).await
}

pub trait Outlet {
    async fn save(&self, config: &Config, outcome: &ResearchOutcome) -> Result<()>;
}

/// 落盘输出：结构化画像JSON + 渲染后的人物档案
pub struct DiskOutlet;

impl Outlet for DiskOutlet {
    async fn save(&self, config: &Config, outcome: &ResearchOutcome) -> Result<()> {
        println!("\n🖊️ 研究产出存储中...");
        let output_dir = &config.output_path;
        fs::create_dir_all(output_dir)?;

        // 结构化画像（含出处与评估结论）
        let profile_path = output_dir.join("profile.json");
        fs::write(&profile_path, serde_json::to_string_pretty(outcome)?)?;
        println!("💾 已保存画像: {}", profile_path.display());

        // 渲染后的人物档案
        let report_path = output_dir.join(config.target_language.get_report_filename());
        fs::write(&report_path, render_report(outcome))?;
        println!("💾 已保存档案: {}", report_path.display());

        println!("💾 研究产出保存完成，输出目录: {}", output_dir.display());
        Ok(())
    }
}

/// 将研究产出渲染为Markdown档案
pub fn render_report(outcome: &ResearchOutcome) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "# 人物档案\n\n> 生成时间: {} | 运行ID: {} | 循环数: {}\n\n",
        outcome.generated_at.format("%Y-%m-%d %H:%M:%S (UTC)"),
        outcome.run_id,
        outcome.cycles_used + 1
    ));

    report.push_str("## 输入线索\n\n");
    report.push_str(&format!("{}\n\n", outcome.seed.descriptor()));

    report.push_str("## 画像字段\n\n");
    if outcome.profile.is_empty() {
        report.push_str("（未能收集到任何字段）\n\n");
    } else {
        for (field, record) in outcome.profile.iter() {
            let confirmed_mark = if record.is_confirmed() { " ✓" } else { "" };
            report.push_str(&format!(
                "- **{}**: {} （置信度: {}{}）\n",
                field, record.value, record.confidence, confirmed_mark
            ));
            for source in &record.sources {
                report.push_str(&format!("  - 来源: {} （第{}轮）\n", source.url, source.cycle + 1));
            }
            for alternate in &record.alternates {
                report.push_str(&format!(
                    "  - 备选值: {} （置信度: {}）\n",
                    alternate.value, alternate.confidence
                ));
            }
        }
        report.push('\n');
    }

    report.push_str("## 完整性评估\n\n");
    if outcome.verdict.complete {
        report.push_str("画像已达到完整性要求。\n");
    } else {
        report.push_str(&format!(
            "画像尚不完整，缺失字段: {}\n",
            outcome.verdict.missing_fields.join(", ")
        ));
    }
    if !outcome.verdict.reasoning.is_empty() {
        report.push_str(&format!("\n{}\n", outcome.verdict.reasoning));
    }
    if outcome.cancelled {
        report.push_str("\n⚠️ 本次研究被中途取消，以上为尽力而为的部分结果。\n");
    }

    report
}
