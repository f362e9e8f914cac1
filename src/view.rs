//! Terminal rendering. `render` is a pure function of the state snapshot.

use std::fmt::Write;

use crate::api::types::{DocumentContent, SearchResult};
use crate::api::ApiStatus;
use crate::app::state::{AppState, Tab, EXAMPLE_QUERIES};

const WIDTH: usize = 76;

pub fn render(state: &AppState) -> String {
    let mut out = String::new();
    header(&mut out, state);
    match state.tab {
        Tab::Search => search_tab(&mut out, state),
        Tab::Penalty => penalty_tab(&mut out, state),
        Tab::Interest => interest_tab(&mut out, state),
    }
    if let Some(notice) = &state.notice {
        out.push('\n');
        out.push_str(notice);
        out.push('\n');
    }
    out.push_str("\n> ");
    out
}

fn header(out: &mut String, state: &AppState) {
    let badge = match state.api_status {
        ApiStatus::Live => "● CANLI",
        ApiStatus::Checking | ApiStatus::Offline => "● BEKLIYOR",
    };
    let _ = writeln!(out, "⚖️  Hukuk Asistanı · Yargıtay Karar Arama    [{}]", badge);
    if state.api_status == ApiStatus::Offline {
        out.push_str("⏳ Free Tier: İlk istek 30-50sn sürebilir. Arama yapınca uyanır!\n");
    }

    let tabs = [
        (Tab::Search, "🔍 Karar Ara"),
        (Tab::Penalty, "⚖️ Ceza"),
        (Tab::Interest, "💰 Faiz"),
    ];
    let line: Vec<String> = tabs
        .iter()
        .map(|(tab, label)| {
            if *tab == state.tab {
                format!("[{}]", label)
            } else {
                format!(" {} ", label)
            }
        })
        .collect();
    let _ = writeln!(out, "{}\n", line.join("  "));
}

fn search_tab(out: &mut String, state: &AppState) {
    let search = &state.search;
    let input = if search.input.is_empty() {
        "Anahtar kelime girin..."
    } else {
        search.input.as_str()
    };
    let _ = writeln!(out, "Arama: {}    Mahkeme: {}", input, search.court.label());
    let examples: Vec<String> = EXAMPLE_QUERIES
        .iter()
        .enumerate()
        .map(|(i, ex)| format!("{}) {}", i + 1, ex))
        .collect();
    let _ = writeln!(out, "Örnekler: {}", examples.join("  "));

    if search.loading {
        out.push_str("\n⏳ Yargıtay aranıyor...\n");
    } else if let Some(results) = &search.results {
        out.push('\n');
        match results {
            SearchResult::Found { total, decisions } => {
                let total = total.map(|t| format_tr(t as f64)).unwrap_or_default();
                let page = search.active_query.as_ref().map_or(1, |q| q.page);
                let _ = writeln!(out, "📚 SONUÇLAR    {} karar · sayfa {}", total, page);
                for (i, d) in decisions.iter().enumerate() {
                    let marker = if search.selected_doc.as_deref() == Some(d.id.as_str()) {
                        '▶'
                    } else {
                        ' '
                    };
                    let _ = writeln!(out, "{} {:>2}. {}    {}", marker, i + 1, d.daire, d.tarih);
                    let _ = writeln!(out, "      E: {} • K: {}", d.esas_no, d.karar_no);
                    if let Some(ozet) = d.ozet.as_deref().filter(|s| !s.is_empty()) {
                        for line in wrap(ozet, WIDTH - 6) {
                            let _ = writeln!(out, "      {}", line);
                        }
                    }
                }
            }
            _ => {
                let _ = writeln!(out, "✗ {}", results.error().unwrap_or_default());
            }
        }
    }

    if let Some(document) = &search.document {
        out.push_str("\n📄 KARAR METNİ  (kapat ile kapatın)\n");
        match document {
            DocumentContent::Loading => out.push_str("Yükleniyor...\n"),
            DocumentContent::Ready(content) => {
                for line in wrap(content, WIDTH) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            DocumentContent::Failed(error) => {
                let _ = writeln!(out, "✗ {}", error);
            }
        }
    }
}

fn penalty_tab(out: &mut String, state: &AppState) {
    let penalty = &state.penalty;
    let _ = writeln!(out, "TEMEL CEZA (AY): {} ay\n", penalty.base_months);
    out.push_str("İNDİRİMLER\n");
    for (i, rule) in penalty.rules.iter().enumerate() {
        let check = if rule.active { "[✓]" } else { "[ ]" };
        let _ = writeln!(
            out,
            "  {}. {} {:<20} -{}%",
            i + 1,
            check,
            rule.label,
            rule.percent()
        );
    }

    let outcome = penalty.outcome();
    let _ = writeln!(out, "\nSONUÇ: {:.1} ay", outcome.months);
    if outcome.deferral_eligible {
        out.push_str("✓ HAGB Uygulanabilir\n");
    }
}

fn interest_tab(out: &mut String, state: &AppState) {
    let input = &state.interest;
    let _ = writeln!(
        out,
        "Anapara (₺): {}    Faiz (%): {}    Gün: {}\n",
        format_tr(input.principal),
        format_tr(input.annual_rate_percent),
        input.days
    );
    let _ = writeln!(out, "ANAPARA  {} ₺", format_tr(input.principal));
    let _ = writeln!(out, "FAİZ     +{} ₺", format_tr(input.interest()));
    let _ = writeln!(out, "TOPLAM   {} ₺", format_tr(input.total_due()));
}

/// Turkish number formatting: `.` groups thousands, `,` marks decimals,
/// at most three fraction digits.
pub fn format_tr(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let fixed = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, frac)
    }
}

/// Greedy word wrap on character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
