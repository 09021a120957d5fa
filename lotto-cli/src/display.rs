use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use lotto_core::models::{NumberTag, PredictionResult, Strategy};
use lotto_predictor::dream::DREAM_LEXICON;
use lotto_predictor::features::FeatureTable;
use lotto_predictor::report::PredictionReport;
use crate::Generated;

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn display_grids(generated: &[Generated], strategy: Strategy) {
    println!("\n🎲 Grilles ({strategy})\n");

    let mut table = new_table();
    table.set_header(vec!["#", "Tirage", "Numéros", "Source"]);

    for (i, g) in generated.iter().enumerate() {
        let (draw, source) = match g {
            Generated::Predicted(r) => (r.draw_no.to_string(), Cell::new("modèle").fg(Color::Green)),
            Generated::Fallback(_) => ("—".to_string(), Cell::new("aléatoire").fg(Color::Yellow)),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(draw),
            Cell::new(join_numbers(g.numbers())),
            source,
        ]);
    }
    println!("{table}");
}

pub fn display_ranking(result: &PredictionResult, top: usize) {
    println!("\n🎯 Classement ensemble (top {top})\n");

    let mut table = new_table();
    table.set_header(vec!["Rang", "Numéro", "Ensemble", "RF", "XGB", "Tag"]);

    for (rank, prob) in result.ranked().iter().take(top).enumerate() {
        let idx = (prob.number - 1) as usize;
        let color = match prob.tag {
            NumberTag::Hot => Color::Red,
            NumberTag::Cold => Color::Blue,
            NumberTag::Normal => Color::White,
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{:2}", prob.number)),
            Cell::new(format!("{:.4}", prob.probability)),
            Cell::new(format!("{:.4}", result.rf_probabilities[idx])),
            Cell::new(format!("{:.4}", result.xgb_probabilities[idx])),
            Cell::new(prob.tag.to_string()).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_report(report: &PredictionReport) {
    println!("\n── Analyse ──");
    println!("  Confiance        : {}%", report.confidence);
    println!("  Modèle           : {}", report.dominant_model);
    println!("  Impair:Pair      : {}:{}", report.odd, report.even);
    println!("  Suites           : {}", report.consecutive_pairs);
    println!("  Chaud/Froid/Neutre : {}/{}/{}", report.hot, report.cold, report.neutral);
    for remark in &report.remarks {
        println!("  --> {}", remark);
    }
}

pub fn display_dream(keywords: &[&str], numbers: &[u8]) {
    if keywords.is_empty() {
        println!("Aucun mot-clé reconnu.");
        return;
    }
    println!("Mots-clés : {}", keywords.join(", "));
    println!("Numéros   : {}", join_numbers(numbers));
}

pub fn display_lexicon() {
    let mut table = new_table();
    table.set_header(vec!["Mot-clé", "Numéros"]);
    for (keyword, numbers) in DREAM_LEXICON {
        table.add_row(vec![keyword.to_string(), join_numbers(numbers)]);
    }
    println!("{table}");
}

pub fn display_features(table: &FeatureTable, threshold: f64) {
    println!("Prochain tirage : {}", table.next_draw_no);
    println!("Dimensions      : {} × {}", table.len(), table.width());
    println!(
        "Entrées         : rf={}, xgb={}",
        table.model_metadata.rf.input_name, table.model_metadata.xgb.input_name
    );
    println!("Chauds (≥{threshold}) : {}", join_numbers(&table.hot_numbers(threshold)));
    println!("Froids (≥{threshold}) : {}", join_numbers(&table.cold_numbers(threshold)));
}
